//! The declaration store port.

use std::future::Future;

use thiserror::Error;
use vatdesk_shared::types::{DeclarationId, Nip};

use super::types::{Confirmation, DeclarationMetadata, NewDeclarationRecord};
use crate::period::PeriodKey;

/// Failures reported by the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the statement.
    #[error("declaration store unavailable: {0}")]
    Unavailable(String),

    /// A stored row cannot be interpreted.
    #[error("corrupt declaration record: {0}")]
    Corrupt(String),
}

/// Metadata plus the stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDeclaration {
    /// Record metadata.
    pub metadata: DeclarationMetadata,
    /// Serialized XML exactly as persisted.
    pub content: Vec<u8>,
}

/// Durable storage of declarations, scoped by tenant.
///
/// `confirm` and `delete` must be single atomic conditional updates guarded
/// by "not yet confirmed"; they return `false` when no record matched,
/// whether the id is unknown, belongs to another tenant or is confirmed.
pub trait DeclarationStore: Send + Sync {
    /// Stores a new draft and returns its id.
    fn insert(
        &self,
        record: NewDeclarationRecord,
    ) -> impl Future<Output = Result<DeclarationId, StoreError>> + Send;

    /// Sets the confirmation on a draft.
    fn confirm(
        &self,
        tenant: &Nip,
        id: DeclarationId,
        confirmation: &Confirmation,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Removes a draft.
    fn delete(
        &self,
        tenant: &Nip,
        id: DeclarationId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Fetches one record with its content.
    fn find(
        &self,
        tenant: &Nip,
        id: DeclarationId,
    ) -> impl Future<Output = Result<Option<StoredDeclaration>, StoreError>> + Send;

    /// All records of a tenant in insertion order.
    fn list(
        &self,
        tenant: &Nip,
    ) -> impl Future<Output = Result<Vec<DeclarationMetadata>, StoreError>> + Send;

    /// Carry-forward of the most recently confirmed declaration for `key`,
    /// `None` if no declaration for that period is confirmed.
    fn confirmed_carry_forward(
        &self,
        key: &PeriodKey,
    ) -> impl Future<Output = Result<Option<i64>, StoreError>> + Send;
}
