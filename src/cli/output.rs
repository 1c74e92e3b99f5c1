//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::navigator::NodeLocation;
use crate::domain::{Category, TreeNode};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// One-line label of a branch: `[category] name (type) <id>`.
pub fn branch_label(node: &TreeNode, placeholder: &str, with_id: bool) -> String {
    let category = match node.category {
        Category::Vendor => node.category.as_str().magenta(),
        Category::ProductName => node.category.as_str().blue(),
        Category::ProductVersion => node.category.as_str().green(),
    };
    let mut label = format!("[{}] {}", category, node.display_name(placeholder));
    if let Some(product_type) = node.product_type {
        label.push_str(&format!(" ({product_type})"));
    }
    if with_id {
        label.push_str(&format!(" {}", node.id.dimmed()));
    }
    label
}

/// Render branches as a termtree forest.
pub fn render_tree(tree: &[TreeNode], placeholder: &str, with_id: bool) -> String {
    tree.iter()
        .map(|node| to_termtree(node, placeholder, with_id).to_string())
        .join("")
}

fn to_termtree(node: &TreeNode, placeholder: &str, with_id: bool) -> Tree<String> {
    Tree::new(branch_label(node, placeholder, with_id)).with_leaves(
        node.sub_branches
            .iter()
            .map(|child| to_termtree(child, placeholder, with_id)),
    )
}

/// Root-to-node path: `Acme > Widget > 1.0`.
pub fn location_path(location: &NodeLocation<'_>, placeholder: &str) -> String {
    location
        .path()
        .map(|node| node.display_name(placeholder))
        .join(" > ")
}
