//! Property-based tests for the chart forest.

use proptest::prelude::*;

use ledgerbook_shared::types::ChartNodeId;

use super::tree::ChartTree;
use super::types::{AccountType, ChartNode};

/// Strategy for node names.
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,15}"
}

/// Builds a random forest by attaching each node under a previously
/// attached node or as a root. `picks[i]` selects the parent for node
/// i+1 among the first i nodes (or root when the pick is i).
fn forest_strategy(account_type: AccountType) -> impl Strategy<Value = ChartTree> {
    (
        prop::collection::vec(name_strategy(), 1..20),
        prop::collection::vec(any::<prop::sample::Index>(), 0..19),
    )
        .prop_map(move |(names, picks)| {
            let mut tree = ChartTree::new(account_type);
            let mut ids: Vec<ChartNodeId> = Vec::new();

            for (i, name) in names.into_iter().enumerate() {
                let node = ChartNode::root(name, account_type);
                let id = node.id;
                let parent = if i == 0 {
                    None
                } else {
                    // Half the picks land on "root" by indexing one past
                    // the attached set.
                    let slot = picks
                        .get(i - 1)
                        .map_or(0, |p| p.index(ids.len() + 1));
                    ids.get(slot).copied()
                };
                tree.attach(node, parent).expect("attach valid node");
                ids.push(id);
            }
            tree
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Pre-order visits every node exactly once.
    #[test]
    fn prop_preorder_is_a_permutation(tree in forest_strategy(AccountType::Asset)) {
        let visited = tree.preorder();
        prop_assert_eq!(visited.len(), tree.len());

        let mut ids: Vec<ChartNodeId> = visited.iter().map(|n| n.id).collect();
        ids.sort_unstable_by_key(|id| ChartNodeId::into_inner(*id));
        ids.dedup();
        prop_assert_eq!(ids.len(), tree.len(), "no node visited twice");
    }

    /// Every parent appears before its children in pre-order.
    #[test]
    fn prop_preorder_parent_first(tree in forest_strategy(AccountType::Liability)) {
        let order: Vec<ChartNodeId> = tree.preorder().iter().map(|n| n.id).collect();
        let position = |id: ChartNodeId| order.iter().position(|o| *o == id).unwrap();

        for node in tree.preorder() {
            if let Some(parent) = node.parent_id {
                prop_assert!(position(parent) < position(node.id));
            }
        }
    }

    /// Type consistency: every non-root node shares its parent's type.
    #[test]
    fn prop_type_consistency(tree in forest_strategy(AccountType::Equity)) {
        for node in tree.preorder() {
            if let Some(parent_id) = node.parent_id {
                let parent = tree.find_by_id(parent_id).unwrap();
                prop_assert_eq!(parent.account_type, node.account_type);
            }
        }
    }

    /// Rebuilding from pre-order rows reproduces the same
    /// (id, name, type, parent) tuples in the same traversal order.
    #[test]
    fn prop_from_nodes_round_trip(tree in forest_strategy(AccountType::Income)) {
        let rows: Vec<ChartNode> = tree.preorder().into_iter().cloned().collect();
        let rebuilt = ChartTree::from_nodes(AccountType::Income, rows).unwrap();

        let original: Vec<ChartNode> = tree.preorder().into_iter().cloned().collect();
        let restored: Vec<ChartNode> = rebuilt.preorder().into_iter().cloned().collect();
        prop_assert_eq!(original, restored);
    }

    /// Detaching any node never changes the total node count and leaves
    /// the detached node as a root.
    #[test]
    fn prop_detach_preserves_nodes(
        tree in forest_strategy(AccountType::Expense),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut tree = tree;
        let ids: Vec<ChartNodeId> = tree.preorder().iter().map(|n| n.id).collect();
        let target = ids[pick.index(ids.len())];
        let before = tree.len();

        tree.detach(target).unwrap();

        prop_assert_eq!(tree.len(), before);
        prop_assert_eq!(tree.find_by_id(target).unwrap().parent_id, None);
        prop_assert!(tree.roots().contains(&target));
    }
}
