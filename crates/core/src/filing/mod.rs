//! Declaration filing: generate, persist, confirm, delete, fetch.
//!
//! `FilingService` wires the invoice ledger and the declaration store to the
//! pure aggregation, building and serialization steps.
//!
//! # Modules
//!
//! - `error` - Failure taxonomy of filing operations
//! - `service` - The orchestrating service

pub mod error;
pub mod service;


pub use error::{FailureKind, FilingError};
pub use service::{FilingService, GeneratedDeclaration};
