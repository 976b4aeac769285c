//! The invoice ledger collaborator.

use std::future::Future;

use thiserror::Error;
use vatdesk_shared::types::Nip;

use super::types::Invoice;
use crate::period::YearMonth;

/// Failures reported by the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger could not be reached or returned an error.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The ledger returned data that cannot be interpreted.
    #[error("corrupt ledger data: {0}")]
    Corrupt(String),
}

/// Source of invoices and counterparty names.
///
/// Implemented by the db crate; tests use in-memory fakes.
pub trait InvoiceLedger: Send + Sync {
    /// All invoices of `tenant` dated within `period`, in ledger order.
    fn invoices_for_period(
        &self,
        tenant: &Nip,
        period: YearMonth,
    ) -> impl Future<Output = Result<Vec<Invoice>, LedgerError>> + Send;

    /// Registered display name for a counterparty, `None` if unknown.
    fn company_name(
        &self,
        nip: &Nip,
    ) -> impl Future<Output = Result<Option<String>, LedgerError>> + Send;
}
