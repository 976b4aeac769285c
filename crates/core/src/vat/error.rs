//! Aggregation error types.

use thiserror::Error;
use vatdesk_shared::types::Nip;

/// Errors that abort an aggregation. No partial result is ever returned.
#[derive(Debug, Error)]
pub enum VatError {
    /// An invoice references a counterparty with no registered name.
    #[error("No company registered for NIP {0}")]
    CounterpartyNotFound(Nip),

    /// The carried-forward balance is negative.
    #[error("Carried-forward VAT must not be negative, got {0}")]
    NegativeCarryForward(i64),
}
