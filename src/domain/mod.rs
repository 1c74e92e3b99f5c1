//! Domain layer: entities and product tree logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod export;
pub mod navigator;
pub mod validation;

pub use entities::*;
pub use error::DomainError;
pub use navigator::NodeLocation;
pub use validation::{Severity, ValidationIssue};

/// Expand environment variables and `~` in a path string.
///
/// Falls back to the input unchanged when expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
