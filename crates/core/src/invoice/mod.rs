//! Invoices as supplied by the ledger.
//!
//! # Modules
//!
//! - `types` - Invoice facts and direction
//! - `validation` - Pure validation of new invoice input
//! - `ledger` - The ledger collaborator the declaration engine reads from

pub mod ledger;
pub mod types;
pub mod validation;

pub use ledger::{InvoiceLedger, LedgerError};
pub use types::{Invoice, InvoiceDirection, NewInvoice, NewInvoiceInput};
pub use validation::validate_new_invoice;
