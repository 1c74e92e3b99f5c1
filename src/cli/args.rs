//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{Category, ProductType, RelationshipCategory};

/// Manage the product tree of a CSAF advisory: vendors, products, versions and relationships
#[derive(Parser, Debug)]
#[command(name = "csaftree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Product tree document (overrides config)
    #[arg(short, long, global = true, env = "CSAFTREE_FILE", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Directory searched for .csaftree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty document
    Init {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Add a branch (at root level unless --parent is given)
    Add {
        /// vendor | product_name | product_version
        category: Category,
        /// Display name
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Software | Hardware (product versions only)
        #[arg(long = "type")]
        product_type: Option<ProductType>,
        /// Insert below this branch
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Change fields of a branch
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long = "type")]
        product_type: Option<ProductType>,
        /// Remove the product type
        #[arg(long, conflicts_with = "product_type")]
        clear_type: bool,
        /// Fail when no branch has the id
        #[arg(long)]
        strict: bool,
    },

    /// Delete a branch, its descendants and their relationships
    Delete { id: String },

    /// Print the tree
    Show {
        /// Flat list of one category instead of the tree
        #[arg(long)]
        category: Option<Category>,
        /// Include ids
        #[arg(long)]
        ids: bool,
    },

    /// Show a branch and its ancestors
    Find { id: String },

    /// Print the tree pruned to branches whose name matches
    Filter {
        /// Regular expression matched against names
        pattern: String,
        /// Keep branches of this category regardless of name
        #[arg(long)]
        keep: Vec<Category>,
    },

    /// List all product versions
    Versions,

    /// Relate two product versions
    Relate {
        /// e.g. installed_on, default_component_of
        category: RelationshipCategory,
        /// Source version id
        source: String,
        /// Target version id
        target: String,
        #[arg(long)]
        name: Option<String>,
    },

    /// List relationships
    Relationships,

    /// Check ids, nesting and relationship references
    Check,

    /// Export as CSAF product_tree JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}
