//! Invoice domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use vatdesk_shared::types::{InvoiceId, Nip};

/// Whether an invoice records a sale or a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceDirection {
    /// Issued by the tenant; carries output VAT.
    Sale,
    /// Received by the tenant; carries deductible input VAT.
    #[serde(rename = "PURC")]
    Purchase,
}

impl InvoiceDirection {
    /// Returns the storage code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "SALE",
            Self::Purchase => "PURC",
        }
    }

    /// Parses a storage code, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SALE" => Some(Self::Sale),
            "PURC" | "PURCHASE" => Some(Self::Purchase),
            _ => None,
        }
    }
}

impl fmt::Display for InvoiceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invoice fact. Owned by the ledger and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Ledger identifier.
    pub id: InvoiceId,
    /// Tax ID of the other party.
    pub counterparty_nip: Nip,
    /// Invoice number as printed on the document.
    pub number: String,
    /// Net amount.
    pub net_amount: Decimal,
    /// VAT amount.
    pub tax_amount: Decimal,
    /// Issue (sale) or purchase date.
    pub issue_date: NaiveDate,
    /// Sale or purchase.
    pub direction: InvoiceDirection,
}

/// Raw input for registering an invoice, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewInvoiceInput {
    /// Invoice number.
    pub number: String,
    /// Counterparty NIP, separators allowed.
    pub counterparty_nip: String,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Net amount.
    pub net_amount: Decimal,
    /// VAT amount.
    pub tax_amount: Decimal,
    /// Issue date; `None` when the caller could not parse one.
    pub issue_date: Option<NaiveDate>,
    /// Sale or purchase; `None` defaults to sale.
    pub direction: Option<InvoiceDirection>,
}

/// A validated invoice ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    /// Invoice number, trimmed.
    pub number: String,
    /// Counterparty NIP.
    pub counterparty_nip: Nip,
    /// Counterparty display name, trimmed.
    pub counterparty_name: String,
    /// Net amount.
    pub net_amount: Decimal,
    /// VAT amount.
    pub tax_amount: Decimal,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Sale or purchase.
    pub direction: InvoiceDirection,
}
