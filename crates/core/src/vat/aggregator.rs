//! Reduction of a period's invoices into settlement totals and ledger rows.

use rust_decimal::Decimal;
use tracing::debug;

use super::error::VatError;
use super::types::{
    Aggregation, CounterpartyDirectory, DOMESTIC_COUNTRY_CODE, LedgerRow, Settlement,
    SettlementTotals,
};
use crate::invoice::{Invoice, InvoiceDirection};

/// Nets rounded output VAT against rounded input VAT plus the carried-forward
/// surplus.
///
/// If output VAT is strictly greater, the difference is due and nothing is
/// carried forward. Otherwise nothing is due and the surplus is carried
/// forward; when both sides are equal both results are zero.
#[must_use]
pub fn settle(sales_tax: i64, purchases_tax: i64, carried_forward_in: i64) -> Settlement {
    let deductible = purchases_tax.saturating_add(carried_forward_in);
    if sales_tax > deductible {
        Settlement {
            amount_due: sales_tax.saturating_sub(deductible),
            carry_forward_out: 0,
        }
    } else {
        Settlement {
            amount_due: 0,
            carry_forward_out: deductible.saturating_sub(sales_tax),
        }
    }
}

/// Stateless VAT aggregator.
pub struct VatAggregator;

impl VatAggregator {
    /// Aggregates one period's invoices.
    ///
    /// Invoices are partitioned by direction and numbered in encounter order,
    /// separately per direction, starting at 1. Net and tax sums are exact;
    /// only the settlement works on rounded tax. Every counterparty must be
    /// present in `directory`.
    ///
    /// # Errors
    ///
    /// - `VatError::CounterpartyNotFound` if any counterparty has no name
    /// - `VatError::NegativeCarryForward` if `carried_forward_in` is negative
    pub fn aggregate(
        invoices: &[Invoice],
        directory: &CounterpartyDirectory,
        carried_forward_in: i64,
    ) -> Result<Aggregation, VatError> {
        if carried_forward_in < 0 {
            return Err(VatError::NegativeCarryForward(carried_forward_in));
        }

        let mut sales: Vec<LedgerRow> = Vec::new();
        let mut purchases: Vec<LedgerRow> = Vec::new();
        let mut sales_net = Decimal::ZERO;
        let mut sales_tax = Decimal::ZERO;
        let mut purchases_net = Decimal::ZERO;
        let mut purchases_tax = Decimal::ZERO;

        for invoice in invoices {
            let name = directory.name(&invoice.counterparty_nip)?;
            let rows = match invoice.direction {
                InvoiceDirection::Sale => {
                    sales_net += invoice.net_amount;
                    sales_tax += invoice.tax_amount;
                    &mut sales
                }
                InvoiceDirection::Purchase => {
                    purchases_net += invoice.net_amount;
                    purchases_tax += invoice.tax_amount;
                    &mut purchases
                }
            };
            rows.push(LedgerRow {
                sequence: u32::try_from(rows.len() + 1).unwrap_or(u32::MAX),
                country_code: DOMESTIC_COUNTRY_CODE.to_string(),
                counterparty_nip: invoice.counterparty_nip.to_string(),
                counterparty_name: name.trim().to_string(),
                document_number: invoice.number.trim().to_string(),
                date: invoice.issue_date,
                net_amount: invoice.net_amount,
                tax_amount: invoice.tax_amount,
            });
        }

        let mut totals = SettlementTotals {
            sales_net,
            sales_tax,
            purchases_net,
            purchases_tax,
            sale_count: sales.len(),
            purchase_count: purchases.len(),
            carried_forward_in,
            amount_due: 0,
            carry_forward_out: 0,
        };
        let settlement = settle(
            totals.rounded_sales_tax(),
            totals.rounded_purchases_tax(),
            carried_forward_in,
        );
        totals.amount_due = settlement.amount_due;
        totals.carry_forward_out = settlement.carry_forward_out;

        debug!(
            sales = totals.sale_count,
            purchases = totals.purchase_count,
            amount_due = totals.amount_due,
            carry_forward_out = totals.carry_forward_out,
            "Aggregated period invoices"
        );

        Ok(Aggregation {
            totals,
            sales,
            purchases,
        })
    }
}
