//! `SeaORM` Entity for invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::InvoiceDirection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_nip: String,
    pub counterparty_nip: String,
    pub number: String,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub net_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub tax_amount: Decimal,
    pub issue_date: Date,
    pub direction: InvoiceDirection,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CounterpartyNip",
        to = "super::companies::Column::Nip"
    )]
    Companies,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
