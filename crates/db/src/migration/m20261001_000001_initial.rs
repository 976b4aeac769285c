//! Initial database migration.
//!
//! Creates the companies, invoices and declarations tables.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // ============================================================
        // COMPANIES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Nip)
                            .string_len(10)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .col(
                        ColumnDef::new(Companies::CountryCode)
                            .string_len(2)
                            .not_null()
                            .default("PL"),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // INVOICES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Invoices::TenantNip).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Invoices::CounterpartyNip)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::Number).string().not_null())
                    .col(&mut money(backend, Invoices::NetAmount))
                    .col(&mut money(backend, Invoices::TaxAmount))
                    .col(ColumnDef::new(Invoices::IssueDate).date().not_null())
                    .col(ColumnDef::new(Invoices::Direction).string_len(4).not_null())
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(Invoices::Direction).is_in(["SALE", "PURC"]))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_counterparty")
                            .from(Invoices::Table, Invoices::CounterpartyNip)
                            .to(Companies::Table, Companies::Nip),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_tenant_issue_date")
                    .table(Invoices::Table)
                    .col(Invoices::TenantNip)
                    .col(Invoices::IssueDate)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // DECLARATIONS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Declarations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Declarations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Declarations::TenantNip)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Declarations::Year).integer().not_null())
                    .col(ColumnDef::new(Declarations::Month).integer().not_null())
                    .col(ColumnDef::new(Declarations::XmlContent).blob().not_null())
                    .col(
                        ColumnDef::new(Declarations::AmountDue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Declarations::CarryForward)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Declarations::GeneratedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Declarations::ConfirmedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Declarations::ReferenceCode).string())
                    .col(
                        ColumnDef::new(Declarations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(Declarations::Month).between(1, 12))
                    .check(Expr::col(Declarations::AmountDue).gte(0))
                    .check(Expr::col(Declarations::CarryForward).gte(0))
                    // Confirmation timestamp and reference are set together or not at all.
                    .check(
                        Expr::col(Declarations::ConfirmedAt)
                            .is_null()
                            .and(Expr::col(Declarations::ReferenceCode).is_null())
                            .or(Expr::col(Declarations::ConfirmedAt)
                                .is_not_null()
                                .and(Expr::col(Declarations::ReferenceCode).is_not_null())),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_declarations_tenant_period")
                    .table(Declarations::Table)
                    .col(Declarations::TenantNip)
                    .col(Declarations::Year)
                    .col(Declarations::Month)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Declarations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

/// Money column: exact NUMERIC on PostgreSQL, REAL affinity on SQLite where
/// the driver exchanges decimals as floating point.
fn money<T: IntoIden>(backend: DbBackend, column: T) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    if backend == DbBackend::Sqlite {
        def.double();
    } else {
        def.decimal_len(15, 2);
    }
    def.not_null().to_owned()
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Nip,
    Name,
    CountryCode,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    TenantNip,
    CounterpartyNip,
    Number,
    NetAmount,
    TaxAmount,
    IssueDate,
    Direction,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Declarations {
    Table,
    Id,
    TenantNip,
    Year,
    Month,
    XmlContent,
    AmountDue,
    CarryForward,
    GeneratedAt,
    ConfirmedAt,
    ReferenceCode,
    CreatedAt,
}
