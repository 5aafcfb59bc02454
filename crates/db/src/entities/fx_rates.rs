//! `SeaORM` Entity for the fx_rates table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One stored exchange rate: units of `currency` per 100 units of the
/// reference currency on `rate_date`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fx_rates")]
pub struct Model {
    /// ISO 4217 code of the priced currency.
    #[sea_orm(primary_key, auto_increment = false)]
    pub currency: String,
    /// Quote date.
    #[sea_orm(primary_key, auto_increment = false)]
    pub rate_date: Date,
    /// Units per 100 reference units, 4dp, always positive.
    pub rate: Decimal,
    /// Row creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Last row update time.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations (none).
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
