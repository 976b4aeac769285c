//! Property-based tests for the XML encoding.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use vatdesk_shared::config::FilerConfig;
use vatdesk_shared::types::{InvoiceId, Nip};

use crate::declaration::{Declaration, DeclarationBuilder};
use crate::invoice::{Invoice, InvoiceDirection};
use crate::period::YearMonth;
use crate::vat::{CounterpartyDirectory, VatAggregator};
use crate::xml::{from_bytes, to_bytes};

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Ledger text as users type it, edge whitespace included.
fn arb_name() -> impl Strategy<Value = String> {
    "[ \t]{0,2}[A-Za-z&<>.]([A-Za-z&<> '.]{0,28}[A-Za-z.])?[ \t\n]{0,2}"
}

fn arb_invoices() -> impl Strategy<Value = Vec<(Invoice, String)>> {
    prop::collection::vec(
        (
            "[ ]?[A-Z]{2}/[0-9]{1,4}[ \t]?",
            arb_name(),
            arb_amount(),
            arb_amount(),
            1u32..=28,
            any::<bool>(),
        ),
        0..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (number, name, net, tax, day, sale))| {
                let nip = format!("{:010}", 5_260_250_000 + u64::try_from(i).unwrap());
                let invoice = Invoice {
                    id: InvoiceId::new(),
                    counterparty_nip: Nip::parse(&nip).unwrap(),
                    number,
                    net_amount: net,
                    tax_amount: tax,
                    issue_date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
                    direction: if sale {
                        InvoiceDirection::Sale
                    } else {
                        InvoiceDirection::Purchase
                    },
                };
                (invoice, name)
            })
            .collect()
    })
}

fn arb_declaration() -> impl Strategy<Value = Declaration> {
    (arb_invoices(), 0i64..100_000, 0u32..1_000_000_000).prop_map(|(rows, carry, nanos)| {
        let directory: CounterpartyDirectory = rows
            .iter()
            .map(|(invoice, name)| (invoice.counterparty_nip.clone(), name.clone()))
            .collect();
        let invoices: Vec<Invoice> = rows.into_iter().map(|(invoice, _)| invoice).collect();
        let aggregation = VatAggregator::aggregate(&invoices, &directory, carry).unwrap();

        let generated_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(i64::from(nanos));
        DeclarationBuilder::from_config(&FilerConfig::default()).build(
            YearMonth::new(2024, 2).unwrap(),
            aggregation,
            generated_at,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Serializing the same declaration twice yields identical bytes.
    #[test]
    fn prop_serialization_is_deterministic(declaration in arb_declaration()) {
        let first = to_bytes(&declaration).unwrap();
        let second = to_bytes(&declaration.clone()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Reading back a written declaration restores it.
    #[test]
    fn prop_read_restores_written(declaration in arb_declaration()) {
        let parsed = from_bytes(&to_bytes(&declaration).unwrap()).unwrap();
        prop_assert_eq!(parsed, declaration);
    }

    /// Any counterparty name either reads back unchanged or is refused.
    #[test]
    fn prop_written_text_reads_back_unchanged(name in any::<String>()) {
        let mut declaration = crate::xml::writer::tests::sample();
        declaration.ledger.sales[0].counterparty_name = name;
        if let Ok(bytes) = to_bytes(&declaration) {
            prop_assert_eq!(from_bytes(&bytes).unwrap(), declaration);
        }
    }
}
