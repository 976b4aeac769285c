//! Lifecycle rule violations.

use thiserror::Error;

use super::types::DeclarationStatus;

/// A transition the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The declaration already carries a confirmation.
    #[error("Declaration is already confirmed")]
    AlreadyConfirmed,

    /// Only drafts can be deleted.
    #[error("Cannot delete a declaration in status {0}")]
    CannotDelete(DeclarationStatus),
}

impl LifecycleError {
    /// Returns the error code logged when a transition is refused.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyConfirmed => "ALREADY_CONFIRMED",
            Self::CannotDelete(_) => "CANNOT_DELETE",
        }
    }
}
