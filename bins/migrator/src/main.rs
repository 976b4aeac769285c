//! Database migration runner for Vatdesk.
//!
//! Usage:
//!   migrator up      - Apply pending migrations (companies, invoices, declarations)
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The target database is read from `DATABASE_URL`; both `postgres://` and
//! `sqlite://` URLs are accepted.

use sea_orm_migration::prelude::*;
use vatdesk_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
