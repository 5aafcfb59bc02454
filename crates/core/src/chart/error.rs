//! Chart tree error types.

use thiserror::Error;

use ledgerbook_shared::types::ChartNodeId;

use super::types::AccountType;

/// Errors raised by in-memory chart tree operations.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A node may only attach under a parent of the same statement type.
    #[error("Type mismatch: cannot attach {child} node under {parent} parent")]
    TypeMismatch {
        /// Statement type of the would-be parent.
        parent: AccountType,
        /// Statement type of the node being attached.
        child: AccountType,
    },

    /// Node id already present in the tree.
    #[error("Chart node already exists: {0}")]
    DuplicateNode(ChartNodeId),

    /// Node id not present in the tree.
    #[error("Chart node not found: {0}")]
    NodeNotFound(ChartNodeId),

    /// Attaching a node under one of its own descendants.
    #[error("Attach would create a cycle at node {0}")]
    WouldCycle(ChartNodeId),
}
