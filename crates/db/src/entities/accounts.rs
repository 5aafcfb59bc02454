//! `SeaORM` Entity for the accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountType;

/// One ledger account. Balance-sheet accounts carry a currency;
/// income and expense accounts never do (enforced by a table CHECK).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Account id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Chart node the account hangs under.
    pub chart_id: Uuid,
    /// Account name, unique across the book.
    pub name: String,
    /// Statement type, always equal to the chart node's.
    pub account_type: AccountType,
    /// ISO 4217 code; present exactly for balance-sheet accounts.
    pub currency: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Row creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Last row update time.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning chart node.
    #[sea_orm(
        belongs_to = "super::charts::Entity",
        from = "Column::ChartId",
        to = "super::charts::Column::Id"
    )]
    Charts,
    /// Entries posted against this account.
    #[sea_orm(has_many = "super::entries::Entity")]
    Entries,
}

impl Related<super::charts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Charts.def()
    }
}

impl Related<super::entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
