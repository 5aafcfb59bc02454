//! `SeaORM` Entity for the entries table (ledger lines).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryDirection;

/// One ledger line. `amount` is in `currency`; `amount_base` is the
/// same movement restated in the book's base currency at the journal
/// date. `position` preserves entry order within the journal.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    /// Entry id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning journal.
    pub journal_id: Uuid,
    /// Account the line posts to.
    pub account_id: Uuid,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// ISO 4217 code of `amount`.
    pub currency: String,
    /// Amount in `currency`, always positive.
    pub amount: Decimal,
    /// Amount restated in base currency, always positive.
    pub amount_base: Decimal,
    /// Free-form line description.
    pub description: Option<String>,
    /// Free-form tag for ad-hoc grouping.
    pub tag: Option<String>,
    /// Order within the journal.
    pub position: i32,
    /// Row creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Last row update time.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning journal header.
    #[sea_orm(
        belongs_to = "super::journals::Entity",
        from = "Column::JournalId",
        to = "super::journals::Column::Id"
    )]
    Journals,
    /// Account posted to.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journals.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
