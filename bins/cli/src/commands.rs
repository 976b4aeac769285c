//! Subcommand definitions and handlers.

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use chrono::{NaiveDate, SecondsFormat, Utc};
use clap::{Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::info;

use vatdesk_core::declaration::Declaration;
use vatdesk_core::invoice::{Invoice, InvoiceDirection, NewInvoiceInput, validate_new_invoice};
use vatdesk_core::lifecycle::DeclarationMetadata;
use vatdesk_core::period::YearMonth;
use vatdesk_db::InvoiceRepository;
use vatdesk_shared::types::{DeclarationId, InvoiceId, Nip, format_amount};

use crate::Filing;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Direction {
    Sale,
    Purchase,
}

impl From<Direction> for InvoiceDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Sale => Self::Sale,
            Direction::Purchase => Self::Purchase,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum InvoiceCommand {
    /// Record an invoice
    Add {
        #[arg(long)]
        number: String,
        /// Counterparty NIP
        #[arg(long)]
        nip: String,
        /// Counterparty name, used only if the company is new
        #[arg(long)]
        name: String,
        #[arg(long)]
        net: Decimal,
        #[arg(long)]
        tax: Decimal,
        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, value_enum)]
        direction: Direction,
    },
    /// List invoices of a month (YYYY-MM), the previous month by default
    List {
        #[arg(long)]
        period: Option<YearMonth>,
        /// Show invoices dated before the month instead
        #[arg(long)]
        older: bool,
    },
    /// Show one invoice
    Show { id: InvoiceId },
    /// Delete an invoice
    Delete { id: InvoiceId },
}

#[derive(Subcommand, Debug)]
pub enum DeclarationCommand {
    /// Generate and store a draft, for the previous month by default
    Generate {
        #[arg(long)]
        period: Option<YearMonth>,
    },
    /// Generate without storing and print the XML
    Preview {
        #[arg(long)]
        period: Option<YearMonth>,
    },
    /// List stored declarations
    List,
    /// Show one declaration
    Show { id: DeclarationId },
    /// Record the tax authority's reference code (UPO)
    Confirm {
        id: DeclarationId,
        #[arg(long)]
        reference: String,
    },
    /// Delete a draft
    Delete { id: DeclarationId },
    /// Write the stored file into a directory
    Download {
        id: DeclarationId,
        #[arg(short = 'o', long = "output", default_value = ".")]
        output: PathBuf,
    },
}

pub async fn run_invoice(
    repo: &InvoiceRepository,
    tenant: &Nip,
    command: InvoiceCommand,
) -> anyhow::Result<()> {
    match command {
        InvoiceCommand::Add {
            number,
            nip,
            name,
            net,
            tax,
            date,
            direction,
        } => {
            let invoice = validate_new_invoice(NewInvoiceInput {
                number,
                counterparty_nip: nip,
                counterparty_name: name,
                net_amount: net,
                tax_amount: tax,
                issue_date: Some(date),
                direction: Some(direction.into()),
            })
            .map_err(|e| anyhow!("Invalid invoice: {e}"))?;

            let stored = repo.insert(tenant, invoice).await?;
            info!(invoice_id = %stored.id, "Invoice recorded");
            println!("{}", stored.id);
        }
        InvoiceCommand::List { period, older } => {
            let period = period.unwrap_or_else(|| YearMonth::preceding(Utc::now()));
            let invoices = if older {
                repo.list_before(tenant, period).await?
            } else {
                repo.list_for_period(tenant, period).await?
            };
            for invoice in &invoices {
                println!("{}", invoice_line(invoice));
            }
        }
        InvoiceCommand::Show { id } => {
            let invoice = repo
                .find_by_id(tenant, id)
                .await?
                .ok_or_else(|| anyhow!("Invoice {id} not found"))?;
            println!("{}", invoice_line(&invoice));
        }
        InvoiceCommand::Delete { id } => {
            if !repo.delete(tenant, id).await? {
                return Err(anyhow!("Invoice {id} not found"));
            }
        }
    }
    Ok(())
}

pub async fn run_declaration(
    filing: &Filing,
    tenant: &Nip,
    command: DeclarationCommand,
) -> anyhow::Result<()> {
    match command {
        DeclarationCommand::Generate { period } => {
            let period = period.unwrap_or_else(|| YearMonth::preceding(Utc::now()));
            let (id, generated) = filing.generate_and_persist(tenant, period).await?;
            println!("{id}");
            print_fields(&generated.declaration);
        }
        DeclarationCommand::Preview { period } => {
            let generated = match period {
                Some(period) => filing.generate(tenant, period).await?,
                None => filing.generate_for_previous_month(tenant).await?,
            };
            let xml = String::from_utf8(generated.content).context("Generated XML is not UTF-8")?;
            println!("{xml}");
        }
        DeclarationCommand::List => {
            for metadata in filing.list(tenant).await? {
                println!("{}", metadata_line(&metadata));
            }
        }
        DeclarationCommand::Show { id } => {
            let (declaration, metadata) = filing.get(tenant, id).await?;
            println!("{}", metadata_line(&metadata));
            print_fields(&declaration);
        }
        DeclarationCommand::Confirm { id, reference } => {
            let confirmation = filing.confirm(tenant, id, &reference).await?;
            println!(
                "{id} confirmed at {}",
                confirmation
                    .confirmed_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
            );
        }
        DeclarationCommand::Delete { id } => {
            filing.delete(tenant, id).await?;
        }
        DeclarationCommand::Download { id, output } => {
            let (name, content) = filing.download(tenant, id).await?;
            let path = output.join(name);
            tokio::fs::write(&path, content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn invoice_line(invoice: &Invoice) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        invoice.id,
        invoice.issue_date,
        invoice.direction,
        invoice.number,
        invoice.counterparty_nip,
        format_amount(invoice.net_amount),
        format_amount(invoice.tax_amount),
    )
}

fn metadata_line(metadata: &DeclarationMetadata) -> String {
    format!(
        "{}\t{}\t{}\tdue={}\tcarry={}\t{}",
        metadata.id,
        metadata.period,
        metadata.status(),
        metadata.amount_due,
        metadata.carry_forward,
        metadata.reference_code().unwrap_or("-"),
    )
}

fn print_fields(declaration: &Declaration) {
    let f = &declaration.form.fields;
    println!(
        "sales={} purchases={}",
        declaration.ledger.sales.len(),
        declaration.ledger.purchases.len()
    );
    println!("P_37={} P_38={} P_39={}", f.p_37, f.p_38, f.p_39);
    println!("P_42={} P_43={} P_48={}", f.p_42, f.p_43, f.p_48);
    println!("P_51={} P_53={} P_62={}", f.p_51, f.p_53, f.p_62);
}
