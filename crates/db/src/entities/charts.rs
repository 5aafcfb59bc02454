//! `SeaORM` Entity for the charts table (chart-of-accounts nodes).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountType;

/// One chart-of-accounts node. `position` orders siblings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "charts")]
pub struct Model {
    /// Node id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Node name, unique within its statement type.
    pub name: String,
    /// Statement type of the whole subtree.
    pub account_type: AccountType,
    /// Parent node; roots have none.
    pub parent_id: Option<Uuid>,
    /// Sibling order.
    pub position: i32,
    /// Row creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Last row update time.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Self-referencing parent link.
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    /// Accounts attached to this node.
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
