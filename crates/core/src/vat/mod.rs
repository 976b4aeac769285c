//! VAT aggregation for one declaration period.
//!
//! Reduces a period's invoices plus the balance carried forward from the
//! previous confirmed period into settlement totals and numbered ledger rows.
//!
//! # Modules
//!
//! - `types` - Settlement totals, ledger rows, counterparty directory
//! - `error` - Aggregation errors
//! - `aggregator` - The reduction and the settlement rule

pub mod aggregator;
pub mod error;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{VatAggregator, settle};
pub use error::VatError;
pub use types::{Aggregation, CounterpartyDirectory, LedgerRow, Settlement, SettlementTotals};
