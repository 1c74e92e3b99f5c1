//! csaftree: product tree management for CSAF advisories.
//!
//! The product tree is a vendor → product_name → product_version hierarchy.
//! [`application::services::ProductTreeService`] edits it through an injected
//! [`infrastructure::traits::TreeStore`] and removes relationships of deleted
//! versions through an injected [`infrastructure::traits::RelationshipStore`].
//! Read-only queries live in [`domain::navigator`].
//!
//! # Module Structure
//!
//! - [`domain`]: entities, navigator, structural checks, CSAF export
//! - [`application`]: services and application errors
//! - [`infrastructure`]: store traits and implementations, DI container
//! - [`config`]: layered settings
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
