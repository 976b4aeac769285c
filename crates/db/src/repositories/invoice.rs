//! Invoice repository for database operations.
//!
//! Serves as the invoice ledger: stores invoices with their counterparty
//! and answers period and company-name queries.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, instrument};
use vatdesk_core::invoice::{Invoice, InvoiceDirection, InvoiceLedger, LedgerError, NewInvoice};
use vatdesk_core::period::YearMonth;
use vatdesk_core::vat::types::DOMESTIC_COUNTRY_CODE;
use vatdesk_shared::types::{InvoiceId, Nip};

use crate::entities::{
    companies, invoices, sea_orm_active_enums::InvoiceDirection as DbInvoiceDirection,
};

/// Invoice repository implementation.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores an invoice for `tenant`.
    ///
    /// The counterparty is registered in the same transaction; a company
    /// that already exists keeps its name. Number and name are stored
    /// trimmed.
    #[instrument(skip(self, invoice), fields(tenant = %tenant, number = %invoice.number))]
    pub async fn insert(&self, tenant: &Nip, invoice: NewInvoice) -> Result<Invoice, LedgerError> {
        let txn = self.db.begin().await.map_err(unavailable)?;

        companies::Entity::insert(companies::ActiveModel {
            nip: Set(invoice.counterparty_nip.to_string()),
            name: Set(invoice.counterparty_name.trim().to_string()),
            country_code: Set(DOMESTIC_COUNTRY_CODE.to_string()),
        })
        .on_conflict(
            OnConflict::column(companies::Column::Nip)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
        .map_err(unavailable)?;

        let model = invoices::ActiveModel {
            id: Set(InvoiceId::new().into_inner()),
            tenant_nip: Set(tenant.to_string()),
            counterparty_nip: Set(invoice.counterparty_nip.to_string()),
            number: Set(invoice.number.trim().to_string()),
            net_amount: Set(invoice.net_amount),
            tax_amount: Set(invoice.tax_amount),
            issue_date: Set(invoice.issue_date),
            direction: Set(to_db_direction(invoice.direction)),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(unavailable)?;

        txn.commit().await.map_err(unavailable)?;
        debug!(invoice_id = %model.id, "Stored invoice");
        to_domain(model)
    }

    /// Finds an invoice by ID within a tenant.
    pub async fn find_by_id(
        &self,
        tenant: &Nip,
        id: InvoiceId,
    ) -> Result<Option<Invoice>, LedgerError> {
        invoices::Entity::find_by_id(id.into_inner())
            .filter(invoices::Column::TenantNip.eq(tenant.as_str()))
            .one(&self.db)
            .await
            .map_err(unavailable)?
            .map(to_domain)
            .transpose()
    }

    /// Invoices dated within `period`, in insertion order.
    pub async fn list_for_period(
        &self,
        tenant: &Nip,
        period: YearMonth,
    ) -> Result<Vec<Invoice>, LedgerError> {
        let models = invoices::Entity::find()
            .filter(invoices::Column::TenantNip.eq(tenant.as_str()))
            .filter(invoices::Column::IssueDate.gte(period.first_day()))
            .filter(invoices::Column::IssueDate.lt(period.end_exclusive()))
            .order_by_asc(invoices::Column::CreatedAt)
            .order_by_asc(invoices::Column::Id)
            .all(&self.db)
            .await
            .map_err(unavailable)?;

        models.into_iter().map(to_domain).collect()
    }

    /// Invoices dated before `period`, newest first.
    pub async fn list_before(
        &self,
        tenant: &Nip,
        period: YearMonth,
    ) -> Result<Vec<Invoice>, LedgerError> {
        let models = invoices::Entity::find()
            .filter(invoices::Column::TenantNip.eq(tenant.as_str()))
            .filter(invoices::Column::IssueDate.lt(period.first_day()))
            .order_by_desc(invoices::Column::IssueDate)
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(unavailable)?;

        models.into_iter().map(to_domain).collect()
    }

    /// Deletes an invoice. Returns false if nothing matched.
    #[instrument(skip(self), fields(tenant = %tenant, invoice_id = %id))]
    pub async fn delete(&self, tenant: &Nip, id: InvoiceId) -> Result<bool, LedgerError> {
        let result = invoices::Entity::delete_many()
            .filter(invoices::Column::Id.eq(id.into_inner()))
            .filter(invoices::Column::TenantNip.eq(tenant.as_str()))
            .exec(&self.db)
            .await
            .map_err(unavailable)?;

        Ok(result.rows_affected > 0)
    }
}

impl InvoiceLedger for InvoiceRepository {
    async fn invoices_for_period(
        &self,
        tenant: &Nip,
        period: YearMonth,
    ) -> Result<Vec<Invoice>, LedgerError> {
        self.list_for_period(tenant, period).await
    }

    async fn company_name(&self, nip: &Nip) -> Result<Option<String>, LedgerError> {
        let company = companies::Entity::find_by_id(nip.to_string())
            .one(&self.db)
            .await
            .map_err(unavailable)?;

        Ok(company.map(|c| c.name))
    }
}

#[allow(clippy::needless_pass_by_value)]
fn unavailable(e: DbErr) -> LedgerError {
    LedgerError::Unavailable(e.to_string())
}

/// Convert domain direction to database enum.
const fn to_db_direction(direction: InvoiceDirection) -> DbInvoiceDirection {
    match direction {
        InvoiceDirection::Sale => DbInvoiceDirection::Sale,
        InvoiceDirection::Purchase => DbInvoiceDirection::Purchase,
    }
}

/// Convert database direction to domain enum.
const fn from_db_direction(direction: DbInvoiceDirection) -> InvoiceDirection {
    match direction {
        DbInvoiceDirection::Sale => InvoiceDirection::Sale,
        DbInvoiceDirection::Purchase => InvoiceDirection::Purchase,
    }
}

fn to_domain(model: invoices::Model) -> Result<Invoice, LedgerError> {
    let counterparty_nip = Nip::parse(&model.counterparty_nip).map_err(|e| {
        LedgerError::Corrupt(format!("invoice {} has invalid NIP: {e}", model.id))
    })?;

    Ok(Invoice {
        id: InvoiceId::from_uuid(model.id),
        counterparty_nip,
        number: model.number,
        net_amount: model.net_amount,
        tax_amount: model.tax_amount,
        issue_date: model.issue_date,
        direction: from_db_direction(model.direction),
    })
}
