//! `SeaORM` Entity for declarations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "declarations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_nip: String,
    pub year: i32,
    pub month: i32,
    #[sea_orm(column_type = "Blob")]
    pub xml_content: Vec<u8>,
    pub amount_due: i64,
    pub carry_forward: i64,
    pub generated_at: DateTimeUtc,
    pub confirmed_at: Option<DateTimeUtc>,
    pub reference_code: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
