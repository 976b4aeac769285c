//! Vatdesk command line.
//!
//! Records invoices and drives the JPK_V7M declaration lifecycle: generate,
//! inspect, confirm with the tax authority's reference code, delete drafts
//! and download the stored file.

mod commands;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vatdesk_core::declaration::DeclarationBuilder;
use vatdesk_core::filing::{FilingError, FilingService};
use vatdesk_core::period::SystemClock;
use vatdesk_db::{DeclarationRepository, InvoiceRepository, connect};
use vatdesk_shared::{AppConfig, AppError};
use vatdesk_shared::config::LoggingConfig;
use vatdesk_shared::types::Nip;

use commands::{DeclarationCommand, InvoiceCommand};

/// Service wired to the database repositories.
pub type Filing = FilingService<InvoiceRepository, DeclarationRepository, SystemClock>;

#[derive(Parser, Debug)]
#[command(name = "vatdesk", version, about = "JPK_V7M VAT declarations")]
struct Cli {
    /// Tenant NIP; defaults to the configured filer
    #[arg(long, global = true)]
    tenant: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record, list and remove invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),

    /// Generate and manage declarations
    #[command(subcommand)]
    Declaration(DeclarationCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let tenant = Nip::parse(cli.tenant.as_deref().unwrap_or(&config.filer.nip))
        .context("Invalid tenant NIP")?;

    let db = connect(&config.database)
        .await
        .inspect_err(|e| error!(code = e.error_code(), "Failed to connect: {e}"))?;
    info!("Connected to database");

    let invoices = InvoiceRepository::new(db.clone());
    let filing = FilingService::new(
        Arc::new(invoices.clone()),
        Arc::new(DeclarationRepository::new(db)),
        SystemClock,
        DeclarationBuilder::from_config(&config.filer),
    );

    let result = match cli.command {
        Command::Invoice(command) => commands::run_invoice(&invoices, &tenant, command).await,
        Command::Declaration(command) => {
            commands::run_declaration(&filing, &tenant, command).await
        }
    };

    result.map_err(|e| match e.downcast::<FilingError>() {
        Ok(failure) => {
            let app = AppError::from(failure);
            error!(code = app.error_code(), status = app.status_code(), "Command failed");
            anyhow::Error::new(app)
        }
        Err(other) => other,
    })
}

/// Logs go to stderr so command output can be piped.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
