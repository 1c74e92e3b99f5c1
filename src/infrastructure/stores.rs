//! Store implementations: in-memory snapshots and a JSON document file.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, instrument};

use crate::domain::{ProductTreeDocument, Relationship, TreeNode};
use crate::infrastructure::traits::{FileSystem, RelationshipStore, TreeStore};

/// Tree store holding the snapshot in memory.
#[derive(Debug, Default)]
pub struct InMemoryTreeStore {
    tree: RwLock<Vec<TreeNode>>,
}

impl InMemoryTreeStore {
    pub fn new(tree: Vec<TreeNode>) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }
}

impl TreeStore for InMemoryTreeStore {
    fn current_tree(&self) -> io::Result<Vec<TreeNode>> {
        Ok(self.tree.read().clone())
    }

    fn replace_tree(&self, tree: Vec<TreeNode>) -> io::Result<()> {
        *self.tree.write() = tree;
        Ok(())
    }
}

/// Relationship store holding records in memory.
#[derive(Debug, Default)]
pub struct InMemoryRelationshipStore {
    relationships: RwLock<Vec<Relationship>>,
}

impl InMemoryRelationshipStore {
    pub fn new(relationships: Vec<Relationship>) -> Self {
        Self {
            relationships: RwLock::new(relationships),
        }
    }
}

impl RelationshipStore for InMemoryRelationshipStore {
    fn by_source_version(&self, version_id: &str) -> io::Result<Vec<Relationship>> {
        Ok(self
            .relationships
            .read()
            .iter()
            .filter(|r| r.product1_version_id == version_id)
            .cloned()
            .collect())
    }

    fn by_target_version(&self, version_id: &str) -> io::Result<Vec<Relationship>> {
        Ok(self
            .relationships
            .read()
            .iter()
            .filter(|r| r.product2_version_id == version_id)
            .cloned()
            .collect())
    }

    fn delete(&self, relationship: &Relationship) -> io::Result<()> {
        self.relationships
            .write()
            .retain(|r| r.id != relationship.id);
        Ok(())
    }

    fn add(&self, relationship: Relationship) -> io::Result<()> {
        self.relationships.write().push(relationship);
        Ok(())
    }

    fn all(&self) -> io::Result<Vec<Relationship>> {
        Ok(self.relationships.read().clone())
    }
}

/// Both stores backed by one JSON document on disk.
///
/// Every call re-reads the file; writes go through [`FileSystem::write`],
/// which replaces the file atomically. A missing file reads as empty.
pub struct JsonDocumentStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
    pretty: bool,
}

impl JsonDocumentStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
            write_lock: Mutex::new(()),
            pretty: true,
        }
    }

    /// Write compact JSON instead of indented.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full document.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> io::Result<ProductTreeDocument> {
        if !self.fs.exists(&self.path) {
            debug!("document missing, starting empty");
            return Ok(ProductTreeDocument::default());
        }
        let content = self.fs.read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ProductTreeDocument::default());
        }
        let document = serde_json::from_str(&content)?;
        Ok(document)
    }

    /// Write the full document.
    #[instrument(level = "debug", skip(self, document), fields(path = %self.path.display()))]
    pub fn save(&self, document: &ProductTreeDocument) -> io::Result<()> {
        let content = if self.pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };
        self.fs.write(&self.path, &content)
    }

    fn modify<F>(&self, change: F) -> io::Result<()>
    where
        F: FnOnce(&mut ProductTreeDocument),
    {
        let _guard = self.write_lock.lock();
        let mut document = self.load()?;
        change(&mut document);
        self.save(&document)
    }
}

impl TreeStore for JsonDocumentStore {
    fn current_tree(&self) -> io::Result<Vec<TreeNode>> {
        Ok(self.load()?.product_tree)
    }

    fn replace_tree(&self, tree: Vec<TreeNode>) -> io::Result<()> {
        self.modify(|document| document.product_tree = tree)
    }
}

impl RelationshipStore for JsonDocumentStore {
    fn by_source_version(&self, version_id: &str) -> io::Result<Vec<Relationship>> {
        Ok(self
            .load()?
            .relationships
            .into_iter()
            .filter(|r| r.product1_version_id == version_id)
            .collect())
    }

    fn by_target_version(&self, version_id: &str) -> io::Result<Vec<Relationship>> {
        Ok(self
            .load()?
            .relationships
            .into_iter()
            .filter(|r| r.product2_version_id == version_id)
            .collect())
    }

    fn delete(&self, relationship: &Relationship) -> io::Result<()> {
        self.modify(|document| document.relationships.retain(|r| r.id != relationship.id))
    }

    fn add(&self, relationship: Relationship) -> io::Result<()> {
        self.modify(|document| document.relationships.push(relationship))
    }

    fn all(&self) -> io::Result<Vec<Relationship>> {
        Ok(self.load()?.relationships)
    }
}
