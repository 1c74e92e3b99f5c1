//! Product tree service
//!
//! Adds, updates and deletes branches of the product tree. Every mutation
//! reads the whole tree from the [`TreeStore`], computes a new tree and
//! writes it back. Deleting a branch also deletes every relationship that
//! references a product version inside the removed subtree.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationResult, StoreResultExt};
use crate::domain::navigator;
use crate::domain::{
    Category, DomainError, Relationship, RelationshipCategory, TreeNode, TreeNodePatch,
};
use crate::infrastructure::traits::{RelationshipStore, TreeStore};

/// Outcome of [`ProductTreeService::delete`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Whether a node with the id existed
    pub found: bool,
    /// Product versions removed with the subtree, pre-order
    pub removed_version_ids: Vec<String>,
    /// Number of relationship delete calls issued
    pub relationships_deleted: usize,
}

/// Service for editing the product tree.
pub struct ProductTreeService {
    tree_store: Arc<dyn TreeStore>,
    relationships: Arc<dyn RelationshipStore>,
}

impl ProductTreeService {
    /// Create a new product tree service.
    pub fn new(tree_store: Arc<dyn TreeStore>, relationships: Arc<dyn RelationshipStore>) -> Self {
        Self {
            tree_store,
            relationships,
        }
    }

    // ============================================================
    // Queries (default to the store's current tree)
    // ============================================================

    /// Owned copy of the current tree.
    pub fn snapshot(&self) -> ApplicationResult<Vec<TreeNode>> {
        self.tree_store
            .current_tree()
            .with_store_context("read product tree")
    }

    pub fn find_by_id(&self, id: &str) -> ApplicationResult<Option<TreeNode>> {
        let tree = self.snapshot()?;
        Ok(navigator::find_by_id(&tree, id).cloned())
    }

    pub fn select_by_category(&self, category: Category) -> ApplicationResult<Vec<TreeNode>> {
        let tree = self.snapshot()?;
        Ok(navigator::select_by_category(&tree, category)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn select_leaf_versions(&self) -> ApplicationResult<Vec<TreeNode>> {
        self.select_by_category(Category::ProductVersion)
    }

    /// See [`navigator::filter`] for the pruning rule.
    pub fn filter<P>(&self, predicate: P) -> ApplicationResult<Vec<TreeNode>>
    where
        P: Fn(&TreeNode) -> bool,
    {
        let tree = self.snapshot()?;
        Ok(navigator::filter(&tree, predicate))
    }

    pub fn relationships(&self) -> ApplicationResult<Vec<Relationship>> {
        self.relationships
            .all()
            .with_store_context("read relationships")
    }

    // ============================================================
    // Mutations
    // ============================================================

    /// Append `node` (with its subtree) at the end of the root level.
    #[instrument(level = "debug", skip(self, node), fields(id = %node.id))]
    pub fn add(&self, node: TreeNode) -> ApplicationResult<()> {
        let mut tree = self.snapshot()?;
        ensure_fresh_ids(&tree, &node)?;
        tree.push(node);
        self.persist(tree)
    }

    /// Insert `node` as the last child of `parent_id`.
    #[instrument(level = "debug", skip(self, node), fields(id = %node.id))]
    pub fn add_under(&self, parent_id: &str, node: TreeNode) -> ApplicationResult<Vec<TreeNode>> {
        let tree = self.snapshot()?;
        let parent = navigator::find_by_id(&tree, parent_id)
            .ok_or_else(|| DomainError::NodeNotFound(parent_id.to_string()))?;
        ensure_fresh_ids(&tree, &node)?;

        let mut sub_branches = parent.sub_branches.clone();
        sub_branches.push(node);
        self.update(TreeNodePatch::new(parent_id).sub_branches(sub_branches))
    }

    /// Shallow-merge `patch` into the first node with the same id.
    ///
    /// An unknown id leaves the tree unchanged; it is still written back.
    #[instrument(level = "debug", skip(self, patch), fields(id = %patch.id))]
    pub fn update(&self, patch: TreeNodePatch) -> ApplicationResult<Vec<TreeNode>> {
        let (tree, merged) = merge_first(self.snapshot()?, &patch);
        if !merged {
            debug!("update: no node with id {}, tree unchanged", patch.id);
        }
        self.persist(tree.clone())?;
        Ok(tree)
    }

    /// Like [`update`](Self::update) but fails without writing when the id is unknown.
    #[instrument(level = "debug", skip(self, patch), fields(id = %patch.id))]
    pub fn try_update(&self, patch: TreeNodePatch) -> ApplicationResult<Vec<TreeNode>> {
        let (tree, merged) = merge_first(self.snapshot()?, &patch);
        if !merged {
            return Err(DomainError::NodeNotFound(patch.id).into());
        }
        self.persist(tree.clone())?;
        Ok(tree)
    }

    /// Remove a node with all descendants and the relationships of its versions.
    ///
    /// An unknown id logs a warning; the unchanged tree is still written back.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: &str) -> ApplicationResult<DeleteReport> {
        let tree = self.snapshot()?;
        let mut report = DeleteReport::default();

        match navigator::find_with_ancestors(&tree, id) {
            None => warn!("delete: no node with id {}", id),
            Some(location) => {
                report.found = true;
                report.removed_version_ids = navigator::collect_version_ids(location.node);
                debug!(
                    "delete: {} at depth {}, {} version(s) in subtree",
                    id,
                    location.depth(),
                    report.removed_version_ids.len()
                );
                for version_id in &report.removed_version_ids {
                    report.relationships_deleted += self.delete_relationships_of(version_id)?;
                }
            }
        }

        let remaining = navigator::filter(&tree, |node| node.id != id);
        self.persist(remaining)?;
        Ok(report)
    }

    /// Create a relationship between two existing product versions.
    #[instrument(level = "debug", skip(self, name))]
    pub fn relate(
        &self,
        category: RelationshipCategory,
        source_version_id: &str,
        target_version_id: &str,
        name: Option<String>,
    ) -> ApplicationResult<Relationship> {
        let tree = self.snapshot()?;
        for version_id in [source_version_id, target_version_id] {
            let node = navigator::find_by_id(&tree, version_id)
                .ok_or_else(|| DomainError::NodeNotFound(version_id.to_string()))?;
            if !node.is_version() {
                return Err(DomainError::NotAVersion(version_id.to_string()).into());
            }
        }

        let mut relationship = Relationship::new(category, source_version_id, target_version_id);
        relationship.name = name;
        self.relationships
            .add(relationship.clone())
            .with_store_context("add relationship")?;
        Ok(relationship)
    }

    // ============================================================
    // Helpers
    // ============================================================

    /// Source and target lookups are independent; a relationship returned by
    /// both is deleted twice.
    fn delete_relationships_of(&self, version_id: &str) -> ApplicationResult<usize> {
        let mut deleted = 0;
        let by_source = self
            .relationships
            .by_source_version(version_id)
            .with_store_context("find relationships by source version")?;
        let by_target = self
            .relationships
            .by_target_version(version_id)
            .with_store_context("find relationships by target version")?;

        for relationship in by_source.iter().chain(by_target.iter()) {
            debug!(
                "delete: relationship {} ({}) of version {}",
                relationship.id, relationship.category, version_id
            );
            self.relationships
                .delete(relationship)
                .with_store_context("delete relationship")?;
            deleted += 1;
        }
        Ok(deleted)
    }

    fn persist(&self, tree: Vec<TreeNode>) -> ApplicationResult<()> {
        self.tree_store
            .replace_tree(tree)
            .with_store_context("write product tree")
    }
}

/// Fail when any id of `node`'s subtree is already used in `tree` or repeated within it.
fn ensure_fresh_ids(tree: &[TreeNode], node: &TreeNode) -> ApplicationResult<()> {
    let mut used: HashSet<&str> = navigator::iter(tree).map(|n| n.id.as_str()).collect();
    for candidate in navigator::iter_subtree(node) {
        if !used.insert(candidate.id.as_str()) {
            return Err(DomainError::DuplicateId(candidate.id.clone()).into());
        }
    }
    Ok(())
}

/// Merge `patch` into the first matching node (pre-order). Returns the new tree
/// and whether a node matched.
fn merge_first(tree: Vec<TreeNode>, patch: &TreeNodePatch) -> (Vec<TreeNode>, bool) {
    let mut merged = false;
    let tree = merge_branches(tree, patch, &mut merged);
    (tree, merged)
}

fn merge_branches(branches: Vec<TreeNode>, patch: &TreeNodePatch, merged: &mut bool) -> Vec<TreeNode> {
    let mut result = Vec::with_capacity(branches.len());
    for mut node in branches {
        if !*merged {
            if node.id == patch.id {
                node.merge(patch);
                *merged = true;
            } else {
                let children = std::mem::take(&mut node.sub_branches);
                node.sub_branches = merge_branches(children, patch, merged);
            }
        }
        result.push(node);
    }
    result
}
