//! Hierarchical chart of accounts.
//!
//! The chart of accounts is a forest of typed nodes: every node carries
//! one of the five statement types, and a node may only attach under a
//! parent of the same type. The tree is held as an arena keyed by node
//! id with explicit parent links, so traversal and re-parenting are
//! id-indexed operations with no ownership cycles.

pub mod error;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tree_props;

pub use error::ChartError;
pub use tree::ChartTree;
pub use types::{AccountType, BalanceSide, ChartNode};
