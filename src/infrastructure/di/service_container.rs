//! Service container for dependency injection
//!
//! Wires up services with their dependencies.

use std::sync::Arc;

use crate::application::services::ProductTreeService;
use crate::config::Settings;
use crate::infrastructure::stores::JsonDocumentStore;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, RelationshipStore, TreeStore};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Document backing both the tree and the relationship store
    pub document: Arc<JsonDocumentStore>,

    pub product_tree: ProductTreeService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with a custom filesystem (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        let mut store = JsonDocumentStore::new(Arc::clone(&fs), settings.data_file.clone());
        if !settings.pretty {
            store = store.compact();
        }
        let document = Arc::new(store);

        let tree_store: Arc<dyn TreeStore> = document.clone();
        let relationships: Arc<dyn RelationshipStore> = document.clone();
        let product_tree = ProductTreeService::new(tree_store, relationships);

        Self {
            settings,
            fs,
            document,
            product_tree,
        }
    }
}
