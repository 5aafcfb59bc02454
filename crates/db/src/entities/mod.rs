//! `SeaORM` entity definitions.

pub mod accounts;
pub mod charts;
pub mod entries;
pub mod fx_rates;
pub mod journals;
pub mod sea_orm_active_enums;
