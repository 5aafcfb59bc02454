//! Chart repository for chart-of-accounts persistence.
//!
//! The in-memory [`ChartTree`] is the unit of editing; the repository
//! persists a whole forest per statement type in one transaction,
//! reconciling rows against the tree (insert new, update surviving,
//! delete removed).

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use ledgerbook_core::chart::{AccountType, ChartError, ChartNode, ChartTree};
use ledgerbook_shared::types::ChartNodeId;

use crate::entities::{accounts, charts, sea_orm_active_enums};

/// Error types for chart persistence.
#[derive(Debug, thiserror::Error)]
pub enum ChartRepoError {
    /// No stored chart for the statement type.
    #[error("No chart stored for type '{0}'")]
    NotFound(AccountType),

    /// Stored rows do not form a valid forest, or the supplied tree is
    /// inconsistent with the statement type.
    #[error("Chart structure error: {0}")]
    Structure(#[from] ChartError),

    /// Deleting nodes that still have accounts attached.
    #[error("{count} account(s) still attached to removed chart nodes")]
    AccountsAttached {
        /// Number of accounts blocking the deletion.
        count: usize,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One row the save reconciliation wants in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DesiredNode {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub position: i32,
}

/// Flattens a forest into rows, parents before children, with sibling
/// positions. Pure; exercised directly by unit tests.
pub(crate) fn desired_rows(tree: &ChartTree) -> Vec<DesiredNode> {
    let mut positions: HashMap<ChartNodeId, i32> = HashMap::new();
    for (i, root) in tree.roots().iter().enumerate() {
        positions.insert(*root, i32::try_from(i).unwrap_or(i32::MAX));
    }
    for node in tree.preorder() {
        for (i, child) in tree.children_of(node.id).iter().enumerate() {
            positions.insert(*child, i32::try_from(i).unwrap_or(i32::MAX));
        }
    }

    tree.preorder()
        .into_iter()
        .map(|node| DesiredNode {
            id: node.id.into_inner(),
            name: node.name.clone(),
            parent_id: node.parent_id.map(ChartNodeId::into_inner),
            position: positions.get(&node.id).copied().unwrap_or(0),
        })
        .collect()
}

/// Chart repository: one stored forest per statement type.
#[derive(Debug, Clone)]
pub struct ChartRepository {
    db: DatabaseConnection,
}

impl ChartRepository {
    /// Creates a new chart repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the stored forest for a statement type. An empty table is
    /// a valid empty forest, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure or if the stored rows do
    /// not reassemble into a forest.
    pub async fn load(&self, account_type: AccountType) -> Result<ChartTree, ChartRepoError> {
        let rows = charts::Entity::find()
            .filter(charts::Column::AccountType.eq(sea_orm_active_enums::AccountType::from(
                account_type,
            )))
            .order_by_asc(charts::Column::ParentId)
            .order_by_asc(charts::Column::Position)
            .all(&self.db)
            .await?;

        let nodes = rows
            .into_iter()
            .map(|row| ChartNode {
                id: ChartNodeId::from_uuid(row.id),
                name: row.name,
                account_type: row.account_type.into(),
                parent_id: row.parent_id.map(ChartNodeId::from_uuid),
            })
            .collect();

        Ok(ChartTree::from_nodes(account_type, nodes)?)
    }

    /// Replaces the stored forest for the tree's statement type with
    /// `tree`, atomically.
    ///
    /// Surviving nodes are updated in place (renames and moves keep
    /// their id, so attached accounts follow). Nodes absent from the
    /// tree are deleted, unless accounts still hang under them.
    ///
    /// # Errors
    ///
    /// Returns [`ChartRepoError::AccountsAttached`] when a removed
    /// node still has accounts, or a database error.
    pub async fn save(&self, tree: &ChartTree) -> Result<(), ChartRepoError> {
        let account_type = sea_orm_active_enums::AccountType::from(tree.account_type());
        let desired = desired_rows(tree);
        let desired_ids: HashSet<Uuid> = desired.iter().map(|n| n.id).collect();

        let txn = self.db.begin().await?;

        let existing_ids: HashSet<Uuid> = charts::Entity::find()
            .filter(charts::Column::AccountType.eq(account_type))
            .select_only()
            .column(charts::Column::Id)
            .into_tuple::<Uuid>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        let removed: Vec<Uuid> = existing_ids.difference(&desired_ids).copied().collect();

        if !removed.is_empty() {
            let attached = accounts::Entity::find()
                .filter(accounts::Column::ChartId.is_in(removed.clone()))
                .count(&txn)
                .await?;
            if attached > 0 {
                return Err(ChartRepoError::AccountsAttached {
                    count: usize::try_from(attached).unwrap_or(usize::MAX),
                });
            }
        }

        let now = chrono::Utc::now().into();

        // Parents come before children in `desired`, so a new child
        // never references a not-yet-inserted parent.
        for row in desired {
            if existing_ids.contains(&row.id) {
                let active = charts::ActiveModel {
                    id: Set(row.id),
                    name: Set(row.name),
                    account_type: Set(account_type),
                    parent_id: Set(row.parent_id),
                    position: Set(row.position),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.update(&txn).await?;
            } else {
                let active = charts::ActiveModel {
                    id: Set(row.id),
                    name: Set(row.name),
                    account_type: Set(account_type),
                    parent_id: Set(row.parent_id),
                    position: Set(row.position),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(&txn).await?;
            }
        }

        if !removed.is_empty() {
            // One statement, so self-referencing rows inside the
            // removed set do not trip the FK check mid-delete.
            charts::Entity::delete_many()
                .filter(charts::Column::Id.is_in(removed))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Deletes the whole stored forest for a statement type.
    /// Idempotent: removing an absent forest is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ChartRepoError::AccountsAttached`] while any account
    /// references a node of the forest, or a database error.
    pub async fn remove(&self, account_type: AccountType) -> Result<(), ChartRepoError> {
        let db_type = sea_orm_active_enums::AccountType::from(account_type);
        let txn = self.db.begin().await?;

        let node_ids: Vec<Uuid> = charts::Entity::find()
            .filter(charts::Column::AccountType.eq(db_type))
            .select_only()
            .column(charts::Column::Id)
            .into_tuple::<Uuid>()
            .all(&txn)
            .await?;

        if node_ids.is_empty() {
            return Ok(());
        }

        let attached = accounts::Entity::find()
            .filter(accounts::Column::ChartId.is_in(node_ids.clone()))
            .count(&txn)
            .await?;
        if attached > 0 {
            return Err(ChartRepoError::AccountsAttached {
                count: usize::try_from(attached).unwrap_or(usize::MAX),
            });
        }

        charts::Entity::delete_many()
            .filter(charts::Column::Id.is_in(node_ids))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ChartTree {
        let mut tree = ChartTree::new(AccountType::Asset);
        let root = ChartNode::root("Assets", AccountType::Asset);
        let root_id = root.id;
        tree.attach(root, None).unwrap();

        let current = ChartNode::root("Current Assets", AccountType::Asset);
        let current_id = current.id;
        tree.attach(current, Some(root_id)).unwrap();

        let fixed = ChartNode::root("Fixed Assets", AccountType::Asset);
        tree.attach(fixed, Some(root_id)).unwrap();

        let bank = ChartNode::root("Bank", AccountType::Asset);
        tree.attach(bank, Some(current_id)).unwrap();

        tree
    }

    #[test]
    fn test_desired_rows_parents_first() {
        let tree = sample_tree();
        let rows = desired_rows(&tree);
        assert_eq!(rows.len(), 4);

        // Every parent id appears earlier in the list.
        for (i, row) in rows.iter().enumerate() {
            if let Some(parent) = row.parent_id {
                let parent_pos = rows.iter().position(|r| r.id == parent).unwrap();
                assert!(parent_pos < i, "{} before its parent", row.name);
            }
        }
    }

    #[test]
    fn test_desired_rows_sibling_positions() {
        let tree = sample_tree();
        let rows = desired_rows(&tree);

        let current = rows.iter().find(|r| r.name == "Current Assets").unwrap();
        let fixed = rows.iter().find(|r| r.name == "Fixed Assets").unwrap();
        assert_eq!(current.position, 0);
        assert_eq!(fixed.position, 1);

        let root = rows.iter().find(|r| r.name == "Assets").unwrap();
        assert_eq!(root.position, 0);
        assert_eq!(root.parent_id, None);
    }

    #[test]
    fn test_desired_rows_empty_forest() {
        let tree = ChartTree::new(AccountType::Equity);
        assert!(desired_rows(&tree).is_empty());
    }
}
