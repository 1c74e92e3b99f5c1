//! Read-only queries over a product tree.
//!
//! All functions borrow the tree they are given and never mutate it.
//! Traversal order is depth-first pre-order, siblings left to right.

use tracing::instrument;

use crate::domain::entities::{Category, TreeNode};

/// Pre-order iterator over every node of a tree.
pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> PreOrder<'a> {
    fn new(roots: &'a [TreeNode]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.sub_branches.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// Iterate all nodes of `tree` in pre-order.
pub fn iter(tree: &[TreeNode]) -> PreOrder<'_> {
    PreOrder::new(tree)
}

/// Iterate `node` and all of its descendants in pre-order.
pub fn iter_subtree(node: &TreeNode) -> PreOrder<'_> {
    PreOrder::new(std::slice::from_ref(node))
}

/// First node with the given id, pre-order.
#[instrument(level = "trace", skip(tree))]
pub fn find_by_id<'a>(tree: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    iter(tree).find(|node| node.id == id)
}

/// A located node together with its borrowed ancestor chain.
///
/// The chain is a lookup aid; it borrows the tree and cannot be used to change it.
#[derive(Debug, Clone)]
pub struct NodeLocation<'a> {
    pub node: &'a TreeNode,
    /// Root first, immediate parent last
    ancestors: Vec<&'a TreeNode>,
}

impl<'a> NodeLocation<'a> {
    /// Location of the immediate parent, None for root-level nodes.
    pub fn parent(&self) -> Option<NodeLocation<'a>> {
        let (parent, rest) = self.ancestors.split_last()?;
        Some(NodeLocation {
            node: *parent,
            ancestors: rest.to_vec(),
        })
    }

    /// Number of ancestors (0 for roots).
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Root-to-node path including the node itself.
    pub fn path(&self) -> impl Iterator<Item = &'a TreeNode> + '_ {
        self.ancestors.iter().copied().chain(std::iter::once(self.node))
    }
}

/// Locate a node and record its ancestors on the way down.
#[instrument(level = "trace", skip(tree))]
pub fn find_with_ancestors<'a>(tree: &'a [TreeNode], id: &str) -> Option<NodeLocation<'a>> {
    let mut trail = Vec::new();
    locate(tree, id, &mut trail)
}

fn locate<'a>(
    branches: &'a [TreeNode],
    id: &str,
    trail: &mut Vec<&'a TreeNode>,
) -> Option<NodeLocation<'a>> {
    for node in branches {
        if node.id == id {
            return Some(NodeLocation {
                node,
                ancestors: trail.clone(),
            });
        }
        trail.push(node);
        let found = locate(&node.sub_branches, id, trail);
        trail.pop();
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Build a new tree keeping only nodes that satisfy `predicate`.
///
/// Children of kept nodes are filtered the same way. A node failing the
/// predicate is dropped with its whole subtree, even when descendants would
/// pass; ancestors of matches are not preserved.
pub fn filter<P>(tree: &[TreeNode], predicate: P) -> Vec<TreeNode>
where
    P: Fn(&TreeNode) -> bool,
{
    filter_branches(tree, &predicate)
}

fn filter_branches<P>(branches: &[TreeNode], predicate: &P) -> Vec<TreeNode>
where
    P: Fn(&TreeNode) -> bool,
{
    branches
        .iter()
        .filter(|node| predicate(*node))
        .map(|node| {
            let mut copy = node.detached();
            copy.sub_branches = filter_branches(&node.sub_branches, predicate);
            copy
        })
        .collect()
}

/// Flat pre-order list of every node with the given category.
#[instrument(level = "trace", skip(tree))]
pub fn select_by_category(tree: &[TreeNode], category: Category) -> Vec<&TreeNode> {
    iter(tree).filter(|node| node.category == category).collect()
}

/// All product versions of the tree, flattened.
pub fn select_leaf_versions(tree: &[TreeNode]) -> Vec<&TreeNode> {
    select_by_category(tree, Category::ProductVersion)
}

/// Ids of product versions in the subtree rooted at `node`, the node included.
pub fn collect_version_ids(node: &TreeNode) -> Vec<String> {
    iter_subtree(node)
        .filter(|n| n.is_version())
        .map(|n| n.id.clone())
        .collect()
}

/// Total number of nodes at any depth.
pub fn count(tree: &[TreeNode]) -> usize {
    iter(tree).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TreeNode> {
        vec![
            TreeNode::with_id("a", Category::Vendor)
                .with_child(TreeNode::with_id("b", Category::ProductName))
                .with_child(
                    TreeNode::with_id("c", Category::ProductName)
                        .with_child(TreeNode::with_id("d", Category::ProductVersion)),
                ),
            TreeNode::with_id("e", Category::Vendor),
        ]
    }

    #[test]
    fn given_tree_when_iterating_then_preorder() {
        let tree = sample();
        let ids: Vec<&str> = iter(&tree).map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn given_empty_tree_when_querying_then_nothing() {
        let tree: Vec<TreeNode> = Vec::new();
        assert!(find_by_id(&tree, "a").is_none());
        assert!(find_with_ancestors(&tree, "a").is_none());
        assert!(filter(&tree, |_| true).is_empty());
        assert_eq!(count(&tree), 0);
    }

    #[test]
    fn given_nested_node_when_locating_then_path_is_root_first() {
        let tree = sample();
        let location = find_with_ancestors(&tree, "d").unwrap();
        let path: Vec<&str> = location.path().map(|n| n.id.as_str()).collect();
        assert_eq!(path, vec!["a", "c", "d"]);
        assert_eq!(location.depth(), 2);
    }

    #[test]
    fn given_product_when_collecting_versions_then_includes_descendants_only() {
        let tree = sample();
        let product = find_by_id(&tree, "c").unwrap();
        assert_eq!(collect_version_ids(product), vec!["d".to_string()]);

        let vendor = find_by_id(&tree, "e").unwrap();
        assert!(collect_version_ids(vendor).is_empty());
    }
}
