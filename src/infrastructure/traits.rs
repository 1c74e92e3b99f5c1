//! I/O boundary traits for testability
//!
//! These traits abstract the document stores and the filesystem, allowing
//! services to be tested with in-memory or recording implementations.

use std::io;
use std::path::Path;

use crate::domain::{Relationship, TreeNode};

/// Holder of the canonical product tree snapshot.
///
/// Reads return an owned copy; writers replace the whole collection.
pub trait TreeStore: Send + Sync {
    /// Current root-level collection.
    fn current_tree(&self) -> io::Result<Vec<TreeNode>>;

    /// Replace the whole collection.
    fn replace_tree(&self, tree: Vec<TreeNode>) -> io::Result<()>;
}

/// Relationship collaborator consulted on cascading deletes.
pub trait RelationshipStore: Send + Sync {
    /// Relationships whose source (`product1`) is the given version.
    fn by_source_version(&self, version_id: &str) -> io::Result<Vec<Relationship>>;

    /// Relationships whose target (`product2`) is the given version.
    fn by_target_version(&self, version_id: &str) -> io::Result<Vec<Relationship>>;

    /// Delete a relationship. Deleting an already removed relationship is a no-op.
    fn delete(&self, relationship: &Relationship) -> io::Result<()>;

    /// Store a new relationship.
    fn add(&self, relationship: Relationship) -> io::Result<()>;

    /// All relationships in insertion order.
    fn all(&self) -> io::Result<Vec<Relationship>>;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file, replacing it atomically.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        use std::io::Write;

        self.ensure_parent(path)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // Temp file in the target directory so the rename stays on one device
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
