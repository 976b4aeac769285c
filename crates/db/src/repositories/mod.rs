//! Repository implementations for database access.
//!
//! Each repository wraps a `DatabaseConnection` and implements the matching
//! port from `vatdesk-core`.

pub mod declaration;
pub mod invoice;

pub use declaration::DeclarationRepository;
pub use invoice::InvoiceRepository;
