//! Property-based tests for the VAT aggregator.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use vatdesk_shared::types::{InvoiceId, Nip};

use crate::invoice::{Invoice, InvoiceDirection};
use crate::vat::aggregator::{VatAggregator, settle};
use crate::vat::types::CounterpartyDirectory;

const COUNTERPARTY: &str = "5260250274";

/// Amounts with two decimal places between 0.01 and 100000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_direction() -> impl Strategy<Value = InvoiceDirection> {
    prop_oneof![Just(InvoiceDirection::Sale), Just(InvoiceDirection::Purchase)]
}

fn arb_invoice() -> impl Strategy<Value = Invoice> {
    (arb_direction(), arb_amount(), arb_amount(), 1u32..=28).prop_map(
        |(direction, net, tax, day)| Invoice {
            id: InvoiceId::new(),
            counterparty_nip: Nip::parse(COUNTERPARTY).unwrap(),
            number: format!("DOC/{day}"),
            net_amount: net,
            tax_amount: tax,
            issue_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            direction,
        },
    )
}

fn directory() -> CounterpartyDirectory {
    let mut directory = CounterpartyDirectory::new();
    directory.insert(Nip::parse(COUNTERPARTY).unwrap(), "Acme S.A.");
    directory
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// At most one of amount due and carry-forward is non-zero, neither negative.
    #[test]
    fn prop_settlement_is_one_sided(
        sales in 0i64..1_000_000,
        purchases in 0i64..1_000_000,
        carry in 0i64..1_000_000,
    ) {
        let s = settle(sales, purchases, carry);
        prop_assert!(s.amount_due >= 0);
        prop_assert!(s.carry_forward_out >= 0);
        prop_assert!(s.amount_due == 0 || s.carry_forward_out == 0);
        prop_assert_eq!(s.amount_due - s.carry_forward_out, sales - purchases - carry);
    }

    /// Rows are numbered 1..n per direction and every invoice lands in exactly one list.
    #[test]
    fn prop_rows_numbered_per_direction(
        invoices in prop::collection::vec(arb_invoice(), 0..40),
        carry in 0i64..10_000,
    ) {
        let result = VatAggregator::aggregate(&invoices, &directory(), carry).unwrap();

        prop_assert_eq!(result.sales.len() + result.purchases.len(), invoices.len());
        for (i, row) in result.sales.iter().enumerate() {
            prop_assert_eq!(row.sequence as usize, i + 1);
        }
        for (i, row) in result.purchases.iter().enumerate() {
            prop_assert_eq!(row.sequence as usize, i + 1);
        }
        prop_assert_eq!(result.totals.sale_count, result.sales.len());
        prop_assert_eq!(result.totals.purchase_count, result.purchases.len());
    }

    /// Totals equal the exact sums of the rows.
    #[test]
    fn prop_totals_are_exact_sums(
        invoices in prop::collection::vec(arb_invoice(), 0..40),
    ) {
        let result = VatAggregator::aggregate(&invoices, &directory(), 0).unwrap();

        let sales_tax: Decimal = result.sales.iter().map(|r| r.tax_amount).sum();
        let purchases_net: Decimal = result.purchases.iter().map(|r| r.net_amount).sum();
        prop_assert_eq!(result.totals.sales_tax, sales_tax);
        prop_assert_eq!(result.totals.purchases_net, purchases_net);
        prop_assert!(result.totals.amount_due == 0 || result.totals.carry_forward_out == 0);
    }
}
