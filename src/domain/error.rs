//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent product tree rule violations.
/// These are independent of storage concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("node is not a product version: {0}")]
    NotAVersion(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown product type: {0}")]
    UnknownProductType(String),

    #[error("unknown relationship category: {0}")]
    UnknownRelationshipCategory(String),
}
