//! Aggregation data types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vatdesk_shared::types::{Nip, round_to_units};

use super::error::VatError;

/// Country code written for every counterparty.
pub const DOMESTIC_COUNTRY_CODE: &str = "PL";

/// Outcome of netting output VAT against input VAT plus carry-forward.
///
/// At most one side is non-zero and both are never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// VAT payable for the period.
    pub amount_due: i64,
    /// Input VAT surplus carried to the next period.
    pub carry_forward_out: i64,
}

/// Period totals produced by the aggregator.
///
/// Net and tax sums are exact (unrounded); the settlement fields are whole units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTotals {
    /// Sum of net amounts of sale invoices.
    pub sales_net: Decimal,
    /// Sum of VAT on sale invoices (output VAT).
    pub sales_tax: Decimal,
    /// Sum of net amounts of purchase invoices.
    pub purchases_net: Decimal,
    /// Sum of VAT on purchase invoices (input VAT).
    pub purchases_tax: Decimal,
    /// Number of sale rows.
    pub sale_count: usize,
    /// Number of purchase rows.
    pub purchase_count: usize,
    /// Surplus carried in from the previous confirmed period (0 if none).
    pub carried_forward_in: i64,
    /// VAT payable.
    pub amount_due: i64,
    /// Surplus carried to the next period.
    pub carry_forward_out: i64,
}

impl SettlementTotals {
    /// Output VAT rounded to whole units.
    #[must_use]
    pub fn rounded_sales_tax(&self) -> i64 {
        round_to_units(self.sales_tax)
    }

    /// Input VAT rounded to whole units.
    #[must_use]
    pub fn rounded_purchases_tax(&self) -> i64 {
        round_to_units(self.purchases_tax)
    }

    /// Sales net base rounded to whole units.
    #[must_use]
    pub fn rounded_sales_net(&self) -> i64 {
        round_to_units(self.sales_net)
    }

    /// Purchases net base rounded to whole units.
    #[must_use]
    pub fn rounded_purchases_net(&self) -> i64 {
        round_to_units(self.purchases_net)
    }

    /// The settlement part of the totals.
    #[must_use]
    pub const fn settlement(&self) -> Settlement {
        Settlement {
            amount_due: self.amount_due,
            carry_forward_out: self.carry_forward_out,
        }
    }
}

/// One invoice in the declaration's detail section.
///
/// `sequence` is 1-based and numbered separately for sales and purchases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Position within its direction, starting at 1.
    pub sequence: u32,
    /// Counterparty country code.
    pub country_code: String,
    /// Counterparty tax ID.
    pub counterparty_nip: String,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Source document number.
    pub document_number: String,
    /// Issue or purchase date.
    pub date: NaiveDate,
    /// Net amount.
    pub net_amount: Decimal,
    /// VAT amount.
    pub tax_amount: Decimal,
}

/// Aggregator output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Period totals and settlement.
    pub totals: SettlementTotals,
    /// Sale rows, numbered 1..n.
    pub sales: Vec<LedgerRow>,
    /// Purchase rows, numbered 1..n.
    pub purchases: Vec<LedgerRow>,
}

/// Resolved counterparty names keyed by NIP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterpartyDirectory(BTreeMap<Nip, String>);

impl CounterpartyDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a name.
    pub fn insert(&mut self, nip: Nip, name: impl Into<String>) {
        self.0.insert(nip, name.into());
    }

    /// Returns true if a name is registered for `nip`.
    #[must_use]
    pub fn contains(&self, nip: &Nip) -> bool {
        self.0.contains_key(nip)
    }

    /// Looks up a name; a missing entry fails the aggregation.
    pub fn name(&self, nip: &Nip) -> Result<&str, VatError> {
        self.0
            .get(nip)
            .map(String::as_str)
            .ok_or_else(|| VatError::CounterpartyNotFound(nip.clone()))
    }
}

impl FromIterator<(Nip, String)> for CounterpartyDirectory {
    fn from_iter<I: IntoIterator<Item = (Nip, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
