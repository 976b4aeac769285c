//! Declaration lifecycle: draft, confirmed, deleted.
//!
//! A persisted declaration starts as a draft. A draft can be confirmed once,
//! with a reference code from the tax authority, or deleted. A confirmed
//! declaration is immutable.
//!
//! # Modules
//!
//! - `types` - Status, confirmation and record metadata
//! - `error` - Lifecycle rule violations
//! - `store` - The persistence port

pub mod error;
pub mod store;
pub mod types;

pub use error::LifecycleError;
pub use store::{DeclarationStore, StoreError, StoredDeclaration};
pub use types::{
    Confirmation, DeclarationMetadata, DeclarationStatus, NewDeclarationRecord,
    validate_reference_code,
};
