//! Database seeder for Vatdesk development and testing.
//!
//! Seeds a handful of counterparties and sales/purchase invoices dated in the
//! previous calendar month for the configured filer, so that a declaration
//! can be generated straight away.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use vatdesk_core::invoice::{InvoiceDirection, NewInvoice};
use vatdesk_core::period::YearMonth;
use vatdesk_db::InvoiceRepository;
use vatdesk_shared::AppConfig;
use vatdesk_shared::types::Nip;

/// Counterparties: (NIP, name).
const COMPANIES: [(&str, &str); 3] = [
    ("5260250274", "Acme Dystrybucja S.A."),
    ("7740001454", "Orlen Paliwa sp. z o.o."),
    ("5213017228", "Biuro Rachunkowe Kowalski"),
];

/// Invoices: (direction, counterparty index, number, net, tax, day of month).
const INVOICES: [(InvoiceDirection, usize, &str, &str, &str, u32); 5] = [
    (InvoiceDirection::Sale, 0, "FV/1", "1000.00", "230.00", 3),
    (InvoiceDirection::Sale, 0, "FV/2", "2450.50", "563.62", 12),
    (InvoiceDirection::Purchase, 1, "ZK/77/2024", "800.00", "184.00", 7),
    (InvoiceDirection::Purchase, 2, "RK/05", "1200.00", "276.00", 15),
    (InvoiceDirection::Sale, 1, "FV/3", "500.00", "115.00", 21),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");
    let tenant = Nip::parse(&config.filer.nip).expect("Configured filer NIP is invalid");

    println!("Connecting to database...");
    let db = vatdesk_db::connect(&config.database)
        .await
        .expect("Failed to connect to database");
    let repo = InvoiceRepository::new(db);

    let period = YearMonth::preceding(Utc::now());
    if !repo
        .list_for_period(&tenant, period)
        .await
        .expect("Failed to read invoices")
        .is_empty()
    {
        println!("  Invoices for {period} already exist, skipping...");
        return;
    }

    println!("Seeding invoices for {period}...");
    for (direction, company, number, net, tax, day) in INVOICES {
        let (company_nip, company_name) = COMPANIES[company];
        let invoice = NewInvoice {
            number: number.to_string(),
            counterparty_nip: Nip::parse(company_nip).expect("Seed NIP is invalid"),
            counterparty_name: company_name.to_string(),
            net_amount: Decimal::from_str(net).expect("Seed amount is invalid"),
            tax_amount: Decimal::from_str(tax).expect("Seed amount is invalid"),
            issue_date: period
                .first_day()
                .with_day(day)
                .expect("Seed day is invalid"),
            direction,
        };

        match repo.insert(&tenant, invoice).await {
            Ok(stored) => println!("  Created {direction} invoice {}", stored.number),
            Err(e) => eprintln!("Failed to insert invoice {number}: {e}"),
        }
    }

    println!("Seeding complete!");
}
