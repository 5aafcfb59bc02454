//! Arena-based chart forest.
//!
//! Nodes are stored in a map keyed by id with explicit `parent_id`
//! links; sibling order is the order of insertion. All listing and
//! printing operations traverse pre-order: parent before children,
//! children in insertion order.

use std::collections::HashMap;

use ledgerbook_shared::types::ChartNodeId;

use super::error::ChartError;
use super::types::{AccountType, ChartNode};

/// A forest of chart nodes sharing one statement type.
#[derive(Debug, Clone)]
pub struct ChartTree {
    account_type: AccountType,
    nodes: HashMap<ChartNodeId, ChartNode>,
    children: HashMap<ChartNodeId, Vec<ChartNodeId>>,
    roots: Vec<ChartNodeId>,
}

impl ChartTree {
    /// Creates an empty forest for the given statement type.
    #[must_use]
    pub fn new(account_type: AccountType) -> Self {
        Self {
            account_type,
            nodes: HashMap::new(),
            children: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Rebuilds a forest from adjacency rows in one pass.
    ///
    /// Rows must already be in sibling order (the repository orders by
    /// position). Parent rows do not need to precede child rows.
    ///
    /// # Errors
    ///
    /// Returns an error if a row's type differs from `account_type`, an
    /// id appears twice, or a `parent_id` references a missing row.
    pub fn from_nodes(
        account_type: AccountType,
        rows: Vec<ChartNode>,
    ) -> Result<Self, ChartError> {
        let mut tree = Self::new(account_type);

        for row in &rows {
            if row.account_type != account_type {
                return Err(ChartError::TypeMismatch {
                    parent: account_type,
                    child: row.account_type,
                });
            }
            if tree.nodes.insert(row.id, row.clone()).is_some() {
                return Err(ChartError::DuplicateNode(row.id));
            }
        }

        // Children lists in row order, after all ids are known.
        for row in rows {
            match row.parent_id {
                Some(parent_id) => {
                    if !tree.nodes.contains_key(&parent_id) {
                        return Err(ChartError::NodeNotFound(parent_id));
                    }
                    tree.children.entry(parent_id).or_default().push(row.id);
                }
                None => tree.roots.push(row.id),
            }
        }

        Ok(tree)
    }

    /// Statement type of every node in this forest.
    #[must_use]
    pub const fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the forest has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root node ids in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[ChartNodeId] {
        &self.roots
    }

    /// Child node ids of `id` in insertion order.
    #[must_use]
    pub fn children_of(&self, id: ChartNodeId) -> &[ChartNodeId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Attaches a new node to the forest.
    ///
    /// With `parent_id = None` the node becomes a new root; any
    /// statement type may form a root, hence a forest rather than a
    /// single tree.
    ///
    /// # Errors
    ///
    /// Fails with `TypeMismatch` if the node's type differs from the
    /// forest's (and therefore from any parent's), `DuplicateNode` if
    /// the id is already present, or `NodeNotFound` if the parent is
    /// missing.
    pub fn attach(
        &mut self,
        mut node: ChartNode,
        parent_id: Option<ChartNodeId>,
    ) -> Result<(), ChartError> {
        if node.account_type != self.account_type {
            return Err(ChartError::TypeMismatch {
                parent: self.account_type,
                child: node.account_type,
            });
        }
        if self.nodes.contains_key(&node.id) {
            return Err(ChartError::DuplicateNode(node.id));
        }
        if let Some(parent) = parent_id {
            if !self.nodes.contains_key(&parent) {
                return Err(ChartError::NodeNotFound(parent));
            }
            self.children.entry(parent).or_default().push(node.id);
        } else {
            self.roots.push(node.id);
        }

        node.parent_id = parent_id;
        self.nodes.insert(node.id, node);
        Ok(())
    }

    /// Moves an existing node under a new parent (or to a root with
    /// `None`).
    ///
    /// # Errors
    ///
    /// Fails with `NodeNotFound` if either node is missing, or
    /// `WouldCycle` if the new parent lies inside the node's own
    /// subtree.
    pub fn reattach(
        &mut self,
        id: ChartNodeId,
        new_parent: Option<ChartNodeId>,
    ) -> Result<(), ChartError> {
        if !self.nodes.contains_key(&id) {
            return Err(ChartError::NodeNotFound(id));
        }
        if let Some(parent) = new_parent {
            if !self.nodes.contains_key(&parent) {
                return Err(ChartError::NodeNotFound(parent));
            }
            if parent == id || self.is_descendant(parent, id) {
                return Err(ChartError::WouldCycle(id));
            }
        }

        self.unlink(id);
        match new_parent {
            Some(parent) => self.children.entry(parent).or_default().push(id),
            None => self.roots.push(id),
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent_id = new_parent;
        }
        Ok(())
    }

    /// Detaches a node from its parent, making it a root.
    ///
    /// Children remain attached to the detached subtree root; nothing
    /// cascades.
    ///
    /// # Errors
    ///
    /// Fails with `NodeNotFound` if the node is missing.
    pub fn detach(&mut self, id: ChartNodeId) -> Result<(), ChartError> {
        self.reattach(id, None)
    }

    /// Looks up a node by id. Never fails; absent ids yield `None`.
    #[must_use]
    pub fn find_by_id(&self, id: ChartNodeId) -> Option<&ChartNode> {
        self.nodes.get(&id)
    }

    /// Looks up the first node with the given name in pre-order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&ChartNode> {
        self.preorder().into_iter().find(|n| n.name == name)
    }

    /// All nodes in pre-order: parent before children, siblings in
    /// insertion order, roots in insertion order.
    #[must_use]
    pub fn preorder(&self) -> Vec<&ChartNode> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.preorder_into(*root, &mut out);
        }
        out
    }

    fn preorder_into<'a>(&'a self, id: ChartNodeId, out: &mut Vec<&'a ChartNode>) {
        if let Some(node) = self.nodes.get(&id) {
            out.push(node);
            for child in self.children_of(id) {
                self.preorder_into(*child, out);
            }
        }
    }

    /// True if `candidate` lies strictly inside the subtree rooted at
    /// `root`. Walks parent links upward from `candidate`.
    fn is_descendant(&self, candidate: ChartNodeId, root: ChartNodeId) -> bool {
        let mut cursor = self.nodes.get(&candidate).and_then(|n| n.parent_id);
        while let Some(id) = cursor {
            if id == root {
                return true;
            }
            cursor = self.nodes.get(&id).and_then(|n| n.parent_id);
        }
        false
    }

    fn unlink(&mut self, id: ChartNodeId) {
        let parent = self.nodes.get(&id).and_then(|n| n.parent_id);
        match parent {
            Some(parent_id) => {
                if let Some(siblings) = self.children.get_mut(&parent_id) {
                    siblings.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, account_type: AccountType) -> ChartNode {
        ChartNode::root(name, account_type)
    }

    fn asset_tree() -> (ChartTree, ChartNodeId, ChartNodeId, ChartNodeId) {
        let mut tree = ChartTree::new(AccountType::Asset);
        let root = node("Assets", AccountType::Asset);
        let current = node("Current Assets", AccountType::Asset);
        let fixed = node("Fixed Assets", AccountType::Asset);
        let (root_id, current_id, fixed_id) = (root.id, current.id, fixed.id);

        tree.attach(root, None).unwrap();
        tree.attach(current, Some(root_id)).unwrap();
        tree.attach(fixed, Some(root_id)).unwrap();
        (tree, root_id, current_id, fixed_id)
    }

    #[test]
    fn test_attach_type_mismatch_rejected() {
        let mut tree = ChartTree::new(AccountType::Asset);
        let bad = node("Loans", AccountType::Liability);

        let result = tree.attach(bad, None);
        assert!(matches!(result, Err(ChartError::TypeMismatch { .. })));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_attach_missing_parent_rejected() {
        let mut tree = ChartTree::new(AccountType::Asset);
        let orphan = node("Cash", AccountType::Asset);
        let ghost = ChartNodeId::new();

        let result = tree.attach(orphan, Some(ghost));
        assert!(matches!(result, Err(ChartError::NodeNotFound(id)) if id == ghost));
    }

    #[test]
    fn test_attach_duplicate_rejected() {
        let mut tree = ChartTree::new(AccountType::Asset);
        let n = node("Assets", AccountType::Asset);
        let dup = n.clone();

        tree.attach(n, None).unwrap();
        assert!(matches!(
            tree.attach(dup, None),
            Err(ChartError::DuplicateNode(_))
        ));
    }

    #[test]
    fn test_preorder_parent_before_children() {
        let (tree, root_id, current_id, fixed_id) = asset_tree();

        let order: Vec<ChartNodeId> = tree.preorder().iter().map(|n| n.id).collect();
        assert_eq!(order, vec![root_id, current_id, fixed_id]);
    }

    #[test]
    fn test_detach_keeps_children() {
        let (mut tree, root_id, current_id, _) = asset_tree();
        let cash = node("Cash", AccountType::Asset);
        let cash_id = cash.id;
        tree.attach(cash, Some(current_id)).unwrap();

        tree.detach(current_id).unwrap();

        let detached = tree.find_by_id(current_id).unwrap();
        assert_eq!(detached.parent_id, None);
        // Grandchild still hangs off the detached subtree root.
        assert_eq!(tree.children_of(current_id), &[cash_id]);
        assert_eq!(tree.children_of(root_id).len(), 1);
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn test_reattach_cycle_rejected() {
        let (mut tree, root_id, current_id, _) = asset_tree();

        // Root under its own child
        let result = tree.reattach(root_id, Some(current_id));
        assert!(matches!(result, Err(ChartError::WouldCycle(_))));

        // Node under itself
        let result = tree.reattach(current_id, Some(current_id));
        assert!(matches!(result, Err(ChartError::WouldCycle(_))));
    }

    #[test]
    fn test_reattach_moves_subtree() {
        let (mut tree, root_id, current_id, fixed_id) = asset_tree();

        tree.reattach(fixed_id, Some(current_id)).unwrap();

        assert_eq!(tree.children_of(root_id), &[current_id]);
        assert_eq!(tree.children_of(current_id), &[fixed_id]);
        assert_eq!(tree.find_by_id(fixed_id).unwrap().parent_id, Some(current_id));
    }

    #[test]
    fn test_find_by_name_preorder_first_match() {
        let (mut tree, _, current_id, fixed_id) = asset_tree();
        let a = node("Cash", AccountType::Asset);
        let b = node("Cash", AccountType::Asset);
        let first = a.id;
        tree.attach(a, Some(current_id)).unwrap();
        tree.attach(b, Some(fixed_id)).unwrap();

        assert_eq!(tree.find_by_name("Cash").unwrap().id, first);
        assert!(tree.find_by_name("Goodwill").is_none());
    }

    #[test]
    fn test_from_nodes_round_trip() {
        let (tree, ..) = asset_tree();
        let rows: Vec<ChartNode> = tree.preorder().into_iter().cloned().collect();

        let rebuilt = ChartTree::from_nodes(AccountType::Asset, rows).unwrap();

        let original: Vec<ChartNodeId> = tree.preorder().iter().map(|n| n.id).collect();
        let restored: Vec<ChartNodeId> = rebuilt.preorder().iter().map(|n| n.id).collect();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_from_nodes_missing_parent_rejected() {
        let mut orphan = node("Cash", AccountType::Asset);
        orphan.parent_id = Some(ChartNodeId::new());

        let result = ChartTree::from_nodes(AccountType::Asset, vec![orphan]);
        assert!(matches!(result, Err(ChartError::NodeNotFound(_))));
    }

    #[test]
    fn test_multiple_roots_form_forest() {
        let mut tree = ChartTree::new(AccountType::Expense);
        let a = node("Operating", AccountType::Expense);
        let b = node("Other", AccountType::Expense);
        let (a_id, b_id) = (a.id, b.id);

        tree.attach(a, None).unwrap();
        tree.attach(b, None).unwrap();

        assert_eq!(tree.roots(), &[a_id, b_id]);
    }
}
