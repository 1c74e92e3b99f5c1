//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (TreeStore, RelationshipStore)
//! but are themselves concrete structs, not traits.

mod product_tree;

pub use product_tree::{DeleteReport, ProductTreeService};
