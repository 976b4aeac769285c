//! The declaration document tree.
//!
//! Field names follow their meaning; the XML tag each one maps to is noted
//! on the field.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vatdesk_shared::config::FilerConfig;

use super::constants;
use crate::period::YearMonth;
use crate::vat::{LedgerRow, SettlementTotals};

/// A complete JPK_V7M declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// `Naglowek`.
    pub header: Header,
    /// `Podmiot1`.
    pub filer: Filer,
    /// `Deklaracja`.
    pub form: DeclarationForm,
    /// `Ewidencja`.
    pub ledger: Ledger,
}

impl Declaration {
    /// Declared period.
    #[must_use]
    pub const fn period(&self) -> YearMonth {
        self.header.period
    }

    /// Generation timestamp.
    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.header.generated_at
    }

    /// VAT payable (`P_51`).
    #[must_use]
    pub const fn amount_due(&self) -> i64 {
        self.form.fields.p_51
    }

    /// Surplus carried to the next period (`P_62`).
    #[must_use]
    pub const fn carry_forward(&self) -> i64 {
        self.form.fields.p_62
    }
}

/// `KodFormularza`: attributes plus character data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormCode {
    /// `kodSystemowy` attribute.
    pub system_code: String,
    /// `wersjaSchemy` attribute.
    pub schema_version: String,
    /// Element text.
    pub code: String,
}

impl Default for FormCode {
    fn default() -> Self {
        Self {
            system_code: constants::FORM_SYSTEM_CODE.to_string(),
            schema_version: constants::SCHEMA_VERSION.to_string(),
            code: constants::FORM_CODE.to_string(),
        }
    }
}

/// `CelZlozenia`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPurpose {
    /// `poz` attribute.
    pub position: String,
    /// Element text.
    pub code: u8,
}

impl Default for SubmissionPurpose {
    fn default() -> Self {
        Self {
            position: constants::PURPOSE_POSITION.to_string(),
            code: constants::PURPOSE_ORIGINAL,
        }
    }
}

/// File header (`Naglowek`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// `KodFormularza`.
    pub form_code: FormCode,
    /// `WariantFormularza`.
    pub form_variant: u8,
    /// `DataWytworzeniaJPK`.
    pub generated_at: DateTime<Utc>,
    /// `NazwaSystemu`.
    pub system_name: String,
    /// `CelZlozenia`.
    pub purpose: SubmissionPurpose,
    /// `KodUrzedu`.
    pub tax_office_code: u16,
    /// `Rok` and `Miesiac`.
    pub period: YearMonth,
}

/// `OsobaNiefizyczna`: the filing company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilerIdentity {
    /// `NIP`.
    pub nip: String,
    /// `PelnaNazwa`.
    pub full_name: String,
    /// `Email`.
    pub email: String,
    /// `Telefon`.
    pub phone: String,
}

impl From<&FilerConfig> for FilerIdentity {
    fn from(config: &FilerConfig) -> Self {
        Self {
            nip: config.nip.trim().to_string(),
            full_name: config.full_name.trim().to_string(),
            email: config.email.trim().to_string(),
            phone: config.phone.trim().to_string(),
        }
    }
}

/// `Podmiot1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filer {
    /// `rola` attribute.
    pub role: String,
    /// `OsobaNiefizyczna`.
    pub identity: FilerIdentity,
}

/// `KodFormularzaDekl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationFormCode {
    /// `kodSystemowy` attribute.
    pub system_code: String,
    /// `kodPodatku` attribute.
    pub tax_code: String,
    /// `rodzajZobowiazania` attribute.
    pub obligation_kind: String,
    /// `wersjaSchemy` attribute.
    pub schema_version: String,
    /// Element text.
    pub code: String,
}

impl Default for DeclarationFormCode {
    fn default() -> Self {
        Self {
            system_code: constants::DECLARATION_SYSTEM_CODE.to_string(),
            tax_code: constants::TAX_CODE.to_string(),
            obligation_kind: constants::OBLIGATION_KIND.to_string(),
            schema_version: constants::SCHEMA_VERSION.to_string(),
            code: constants::DECLARATION_FORM_CODE.to_string(),
        }
    }
}

/// `PozycjeSzczegolowe`: the numbered VAT-7 fields, in whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    /// Net base of domestic sales.
    pub p_37: i64,
    /// Output VAT.
    pub p_38: i64,
    /// Surplus carried in from the previous period.
    pub p_39: i64,
    /// Net base of purchases.
    pub p_42: i64,
    /// Input VAT on purchases.
    pub p_43: i64,
    /// Total deductible input VAT (`P_39 + P_43`).
    pub p_48: i64,
    /// VAT payable.
    pub p_51: i64,
    /// Surplus of input over output VAT.
    pub p_53: i64,
    /// Surplus carried to the next period.
    pub p_62: i64,
    /// Correction of tax base.
    pub p_68: i64,
    /// Correction of tax.
    pub p_69: i64,
}

impl FormFields {
    /// Maps aggregator totals onto the form. Every value is already rounded.
    #[must_use]
    pub fn from_totals(totals: &SettlementTotals) -> Self {
        let input_tax = totals.rounded_purchases_tax();
        Self {
            p_37: totals.rounded_sales_net(),
            p_38: totals.rounded_sales_tax(),
            p_39: totals.carried_forward_in,
            p_42: totals.rounded_purchases_net(),
            p_43: input_tax,
            p_48: totals.carried_forward_in.saturating_add(input_tax),
            p_51: totals.amount_due,
            p_53: totals.carry_forward_out,
            p_62: totals.carry_forward_out,
            p_68: 0,
            p_69: 0,
        }
    }
}

/// `Deklaracja`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationForm {
    /// `Naglowek/KodFormularzaDekl`.
    pub form_code: DeclarationFormCode,
    /// `Naglowek/WariantFormularzaDekl`.
    pub form_variant: u8,
    /// `PozycjeSzczegolowe`.
    pub fields: FormFields,
    /// `Pouczenia`.
    pub instructions: u8,
}

/// `SprzedazCtrl` / `ZakupCtrl`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlTotals {
    /// Number of rows in the section.
    pub row_count: usize,
    /// Exact (unrounded) tax sum of the section.
    pub tax_total: Decimal,
}

/// `Ewidencja`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// `SprzedazWiersz` rows.
    pub sales: Vec<LedgerRow>,
    /// `SprzedazCtrl`.
    pub sales_control: ControlTotals,
    /// `ZakupWiersz` rows.
    pub purchases: Vec<LedgerRow>,
    /// `ZakupCtrl`.
    pub purchases_control: ControlTotals,
}
