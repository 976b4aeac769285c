//! `SeaORM` entity definitions.

pub mod companies;
pub mod declarations;
pub mod invoices;
pub mod sea_orm_active_enums;
