//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for companies, invoices and declarations
//! - Repositories implementing the ledger and declaration store ports
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{DeclarationRepository, InvoiceRepository};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use vatdesk_shared::config::DatabaseConfig;
use vatdesk_shared::{AppError, AppResult};

/// Establishes a connection pool sized from configuration.
///
/// # Errors
///
/// Returns `AppError::Database` if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
