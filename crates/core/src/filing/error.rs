//! Filing error types.

use thiserror::Error;
use vatdesk_shared::error::AppError;
use vatdesk_shared::types::DeclarationId;

use crate::invoice::LedgerError;
use crate::lifecycle::StoreError;
use crate::validation::FieldErrors;
use crate::vat::VatError;
use crate::xml::XmlError;

/// Broad class of a filing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A collaborator failed; nothing was persisted.
    Dependency,
    /// The record is missing or not in a state that allows the operation.
    NotFound,
    /// Input was rejected before touching the store.
    Validation,
    /// The document could not be encoded or decoded.
    Serialization,
}

/// Errors returned by [`FilingService`](super::FilingService).
#[derive(Debug, Error)]
pub enum FilingError {
    /// The invoice ledger failed.
    #[error("Invoice ledger failed: {0}")]
    Ledger(#[from] LedgerError),

    /// The declaration store failed.
    #[error("Declaration store failed: {0}")]
    Store(#[from] StoreError),

    /// Aggregation could not complete, e.g. an unknown counterparty.
    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] VatError),

    /// No matching record, or the record is in the wrong state.
    #[error("Declaration {0} not found")]
    NotFound(DeclarationId),

    /// Input failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Encoding or decoding the XML failed.
    #[error("Declaration XML error: {0}")]
    Serialization(#[from] XmlError),
}

impl FilingError {
    /// Returns the failure class.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Ledger(_) | Self::Store(_) | Self::Aggregation(_) => FailureKind::Dependency,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Validation(_) => FailureKind::Validation,
            Self::Serialization(_) => FailureKind::Serialization,
        }
    }

    /// Returns true if the caller can act on the error (re-prompt, 404).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            FailureKind::NotFound | FailureKind::Validation
        )
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self.kind() {
            FailureKind::Validation => 400,
            FailureKind::NotFound => 404,
            FailureKind::Dependency | FailureKind::Serialization => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(_) => "LEDGER_UNAVAILABLE",
            Self::Store(_) => "STORE_UNAVAILABLE",
            Self::Aggregation(VatError::CounterpartyNotFound(_)) => "COUNTERPARTY_NOT_FOUND",
            Self::Aggregation(VatError::NegativeCarryForward(_)) => "INVALID_CARRY_FORWARD",
            Self::NotFound(_) => "DECLARATION_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<FilingError> for AppError {
    fn from(err: FilingError) -> Self {
        match err.kind() {
            FailureKind::NotFound => Self::NotFound(err.to_string()),
            FailureKind::Validation => Self::Validation(err.to_string()),
            FailureKind::Dependency => Self::Dependency(err.to_string()),
            FailureKind::Serialization => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vatdesk_shared::types::Nip;

    #[test]
    fn test_not_found_is_recoverable() {
        let err = FilingError::NotFound(DeclarationId::from_uuid(Uuid::nil()));
        assert_eq!(err.kind(), FailureKind::NotFound);
        assert!(err.is_recoverable());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "DECLARATION_NOT_FOUND");
    }

    #[test]
    fn test_validation_is_recoverable() {
        let mut errors = FieldErrors::new();
        errors.add("reference_code", "Reference code must not be blank.");
        let err = FilingError::Validation(errors);
        assert!(err.is_recoverable());
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("reference_code"));
    }

    #[test]
    fn test_dependency_failures_are_fatal() {
        let ledger = FilingError::from(LedgerError::Unavailable("timeout".into()));
        let company = FilingError::from(VatError::CounterpartyNotFound(
            Nip::parse("5260250274").unwrap(),
        ));
        for err in [ledger, company] {
            assert_eq!(err.kind(), FailureKind::Dependency);
            assert!(!err.is_recoverable());
            assert_eq!(err.status_code(), 500);
        }
    }

    #[test]
    fn test_serialization_is_fatal() {
        let err = FilingError::from(XmlError::Write("broken".into()));
        assert_eq!(err.kind(), FailureKind::Serialization);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_maps_to_app_error() {
        let err: AppError = FilingError::NotFound(DeclarationId::from_uuid(Uuid::nil())).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = FilingError::from(StoreError::Unavailable("down".into())).into();
        assert_eq!(err.error_code(), "DEPENDENCY_FAILURE");
    }
}
