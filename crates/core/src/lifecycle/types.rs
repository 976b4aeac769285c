//! Lifecycle domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use vatdesk_shared::types::{DeclarationId, Nip};

use super::error::LifecycleError;
use crate::period::{PeriodKey, YearMonth};
use crate::validation::{FieldErrors, Validated, not_blank};

/// Status of a persisted declaration.
///
/// The only transitions are Draft → Confirmed and Draft → deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationStatus {
    /// Generated, not yet acknowledged by the tax authority.
    Draft,
    /// Acknowledged; immutable.
    Confirmed,
}

impl DeclarationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Confirmed => "confirmed",
        }
    }

    /// Applies a confirmation.
    pub const fn confirm(self) -> Result<Self, LifecycleError> {
        match self {
            Self::Draft => Ok(Self::Confirmed),
            Self::Confirmed => Err(LifecycleError::AlreadyConfirmed),
        }
    }

    /// Checks that a record in this status may be deleted.
    pub const fn delete(self) -> Result<(), LifecycleError> {
        match self {
            Self::Draft => Ok(()),
            Self::Confirmed => Err(LifecycleError::CannotDelete(self)),
        }
    }

    /// Returns true if the record can no longer change.
    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl fmt::Display for DeclarationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates a confirmation reference code; surrounding whitespace is dropped.
pub fn validate_reference_code(raw: &str) -> Validated<String> {
    let mut errors = FieldErrors::new();
    errors.check(
        not_blank(raw),
        "reference_code",
        "Reference code must not be blank.",
    );
    errors.into_result(raw.trim().to_string())
}

/// Timestamp and reference code set together when a declaration is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Acknowledgment code issued by the tax authority (UPO).
    pub reference_code: String,
    /// When the confirmation was recorded.
    pub confirmed_at: DateTime<Utc>,
}

impl Confirmation {
    /// Builds a confirmation after validating the reference code.
    pub fn new(reference_code: &str, confirmed_at: DateTime<Utc>) -> Validated<Self> {
        validate_reference_code(reference_code).map(|reference_code| Self {
            reference_code,
            confirmed_at,
        })
    }
}

/// Metadata of a persisted declaration, without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationMetadata {
    /// Record identifier.
    pub id: DeclarationId,
    /// Filing company.
    pub tenant: Nip,
    /// Declared period.
    pub period: YearMonth,
    /// When the declaration was generated.
    pub generated_at: DateTime<Utc>,
    /// VAT payable (`P_51`).
    pub amount_due: i64,
    /// Surplus carried to the next period (`P_62`).
    pub carry_forward: i64,
    /// Set once, when confirmed.
    pub confirmation: Option<Confirmation>,
}

impl DeclarationMetadata {
    /// Current status.
    #[must_use]
    pub const fn status(&self) -> DeclarationStatus {
        if self.confirmation.is_some() {
            DeclarationStatus::Confirmed
        } else {
            DeclarationStatus::Draft
        }
    }

    /// Confirmation timestamp, if confirmed.
    #[must_use]
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmation.as_ref().map(|c| c.confirmed_at)
    }

    /// Confirmation reference code, if confirmed.
    #[must_use]
    pub fn reference_code(&self) -> Option<&str> {
        self.confirmation.as_ref().map(|c| c.reference_code.as_str())
    }

    /// The tenant and period this declaration covers.
    #[must_use]
    pub fn period_key(&self) -> PeriodKey {
        PeriodKey::new(self.tenant.clone(), self.period)
    }

    /// Download file name, e.g. `jpk_v7m_2024_05_<id>.xml`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "jpk_v7m_{}_{:02}_{}.xml",
            self.period.year(),
            self.period.month(),
            self.id
        )
    }
}

/// A freshly generated declaration ready to be stored as a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeclarationRecord {
    /// Filing company.
    pub tenant: Nip,
    /// Declared period.
    pub period: YearMonth,
    /// Serialized XML.
    pub content: Vec<u8>,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// VAT payable.
    pub amount_due: i64,
    /// Surplus carried to the next period.
    pub carry_forward: i64,
}
