//! Error conversion helpers for store operations
//!
//! Provides extension traits for cleaner error handling with context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting store `io::Result` to `ApplicationResult` with context.
pub trait StoreResultExt<T> {
    /// Add context to a store error.
    ///
    /// # Example
    /// ```ignore
    /// self.tree_store.current_tree()
    ///     .with_store_context("read product tree")?;
    /// ```
    fn with_store_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> StoreResultExt<T> for io::Result<T> {
    fn with_store_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Store {
            context: action.to_string(),
            source: e,
        })
    }
}
