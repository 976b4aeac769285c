//! `SeaORM` active enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored invoice direction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(4))")]
pub enum InvoiceDirection {
    /// Sale invoice.
    #[sea_orm(string_value = "SALE")]
    Sale,
    /// Purchase invoice.
    #[sea_orm(string_value = "PURC")]
    Purchase,
}
