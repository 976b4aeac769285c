//! Declaration repository for database operations.
//!
//! Confirmation and deletion are single conditional statements guarded by
//! `confirmed_at IS NULL`, so a confirmed row can never change again no
//! matter how many callers race on it.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{info, instrument, warn};
use vatdesk_core::lifecycle::{
    Confirmation, DeclarationMetadata, DeclarationStore, NewDeclarationRecord, StoreError,
    StoredDeclaration,
};
use vatdesk_core::period::{PeriodKey, YearMonth};
use vatdesk_shared::types::{DeclarationId, Nip};

use crate::entities::declarations;

/// Declaration repository implementation.
#[derive(Debug, Clone)]
pub struct DeclarationRepository {
    db: DatabaseConnection,
}

impl DeclarationRepository {
    /// Creates a new declaration repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl DeclarationStore for DeclarationRepository {
    #[instrument(skip_all, fields(tenant = %record.tenant, period = %record.period))]
    async fn insert(&self, record: NewDeclarationRecord) -> Result<DeclarationId, StoreError> {
        let id = DeclarationId::new();
        let now = Utc::now();

        declarations::ActiveModel {
            id: Set(id.into_inner()),
            tenant_nip: Set(record.tenant.to_string()),
            year: Set(record.period.year()),
            month: Set(month_column(record.period)?),
            xml_content: Set(record.content),
            amount_due: Set(record.amount_due),
            carry_forward: Set(record.carry_forward),
            generated_at: Set(record.generated_at),
            confirmed_at: Set(None),
            reference_code: Set(None),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(unavailable)?;

        info!(declaration_id = %id, "Stored declaration draft");
        Ok(id)
    }

    #[instrument(skip(self, confirmation), fields(tenant = %tenant, declaration_id = %id))]
    async fn confirm(
        &self,
        tenant: &Nip,
        id: DeclarationId,
        confirmation: &Confirmation,
    ) -> Result<bool, StoreError> {
        let result = declarations::Entity::update_many()
            .col_expr(
                declarations::Column::ConfirmedAt,
                Expr::value(confirmation.confirmed_at),
            )
            .col_expr(
                declarations::Column::ReferenceCode,
                Expr::value(confirmation.reference_code.clone()),
            )
            .filter(declarations::Column::Id.eq(id.into_inner()))
            .filter(declarations::Column::TenantNip.eq(tenant.as_str()))
            .filter(declarations::Column::ConfirmedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(unavailable)?;

        if result.rows_affected == 0 {
            warn!("No draft matched confirmation");
            return Ok(false);
        }

        info!("Declaration confirmed");
        Ok(true)
    }

    #[instrument(skip(self), fields(tenant = %tenant, declaration_id = %id))]
    async fn delete(&self, tenant: &Nip, id: DeclarationId) -> Result<bool, StoreError> {
        let result = declarations::Entity::delete_many()
            .filter(declarations::Column::Id.eq(id.into_inner()))
            .filter(declarations::Column::TenantNip.eq(tenant.as_str()))
            .filter(declarations::Column::ConfirmedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(unavailable)?;

        Ok(result.rows_affected > 0)
    }

    async fn find(
        &self,
        tenant: &Nip,
        id: DeclarationId,
    ) -> Result<Option<StoredDeclaration>, StoreError> {
        let Some(model) = declarations::Entity::find_by_id(id.into_inner())
            .filter(declarations::Column::TenantNip.eq(tenant.as_str()))
            .one(&self.db)
            .await
            .map_err(unavailable)?
        else {
            return Ok(None);
        };

        let metadata = to_metadata(&model)?;
        Ok(Some(StoredDeclaration {
            metadata,
            content: model.xml_content,
        }))
    }

    async fn list(&self, tenant: &Nip) -> Result<Vec<DeclarationMetadata>, StoreError> {
        let models = declarations::Entity::find()
            .filter(declarations::Column::TenantNip.eq(tenant.as_str()))
            .order_by_asc(declarations::Column::CreatedAt)
            .order_by_asc(declarations::Column::Id)
            .all(&self.db)
            .await
            .map_err(unavailable)?;

        models.iter().map(to_metadata).collect()
    }

    async fn confirmed_carry_forward(&self, key: &PeriodKey) -> Result<Option<i64>, StoreError> {
        let latest = declarations::Entity::find()
            .filter(declarations::Column::TenantNip.eq(key.tenant.as_str()))
            .filter(declarations::Column::Year.eq(key.period.year()))
            .filter(declarations::Column::Month.eq(month_column(key.period)?))
            .filter(declarations::Column::ConfirmedAt.is_not_null())
            .order_by_desc(declarations::Column::ConfirmedAt)
            .one(&self.db)
            .await
            .map_err(unavailable)?;

        Ok(latest.map(|m| m.carry_forward))
    }
}

#[allow(clippy::needless_pass_by_value)]
fn unavailable(e: DbErr) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn month_column(period: YearMonth) -> Result<i32, StoreError> {
    i32::try_from(period.month())
        .map_err(|_| StoreError::Corrupt(format!("month out of range: {period}")))
}

fn to_metadata(model: &declarations::Model) -> Result<DeclarationMetadata, StoreError> {
    let tenant = Nip::parse(&model.tenant_nip).map_err(|e| {
        StoreError::Corrupt(format!("declaration {} has invalid tenant: {e}", model.id))
    })?;

    let period = u32::try_from(model.month)
        .ok()
        .and_then(|month| YearMonth::new(model.year, month).ok())
        .ok_or_else(|| {
            StoreError::Corrupt(format!(
                "declaration {} has invalid period {}-{}",
                model.id, model.year, model.month
            ))
        })?;

    let confirmation = match (&model.confirmed_at, &model.reference_code) {
        (Some(confirmed_at), Some(reference_code)) => Some(Confirmation {
            reference_code: reference_code.clone(),
            confirmed_at: *confirmed_at,
        }),
        (None, None) => None,
        _ => {
            return Err(StoreError::Corrupt(format!(
                "declaration {} is partially confirmed",
                model.id
            )));
        }
    };

    Ok(DeclarationMetadata {
        id: DeclarationId::from_uuid(model.id),
        tenant,
        period,
        generated_at: model.generated_at,
        amount_due: model.amount_due,
        carry_forward: model.carry_forward,
        confirmation,
    })
}
