//! `SeaORM` Entity for the journals table (entry group headers).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::JournalSource;

/// One journal header. Entries live in their own table and are only
/// ever written together with the header, inside one transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journals")]
pub struct Model {
    /// Journal id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Accounting date of every entry in the group.
    pub journal_date: Date,
    /// Business origin of the journal.
    pub source: JournalSource,
    /// Free-form note.
    pub note: Option<String>,
    /// Row creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Last row update time.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Entries owned by this journal.
    #[sea_orm(has_many = "super::entries::Entity")]
    Entries,
}

impl Related<super::entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
