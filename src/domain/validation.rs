//! Structural checks over a product tree and its relationships.

use std::collections::HashSet;
use std::fmt;

use crate::domain::entities::{Category, Relationship, TreeNode};
use crate::domain::navigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A single finding of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Same id used by more than one node
    DuplicateId { id: String },
    /// Child category is not the conventional successor of its parent's.
    /// `parent` is None for root-level nodes.
    UnexpectedNesting {
        id: String,
        category: Category,
        parent: Option<Category>,
    },
    ProductTypeOnNonVersion { id: String, category: Category },
    /// Relationship points at a version id missing from the tree
    DanglingRelationship {
        relationship_id: String,
        version_id: String,
    },
}

impl ValidationIssue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateId { .. } | Self::DanglingRelationship { .. } => Severity::Error,
            Self::UnexpectedNesting { .. } | Self::ProductTypeOnNonVersion { .. } => {
                Severity::Warning
            }
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "duplicate id {id}"),
            Self::UnexpectedNesting {
                id,
                category,
                parent: Some(parent),
            } => write!(f, "{category} {id} nested under {parent}"),
            Self::UnexpectedNesting {
                id,
                category,
                parent: None,
            } => write!(f, "{category} {id} at root level"),
            Self::ProductTypeOnNonVersion { id, category } => {
                write!(f, "product type set on {category} {id}")
            }
            Self::DanglingRelationship {
                relationship_id,
                version_id,
            } => write!(
                f,
                "relationship {relationship_id} references unknown version {version_id}"
            ),
        }
    }
}

/// Check tree invariants and conventions. Findings are in tree pre-order,
/// relationship findings last.
pub fn validate(tree: &[TreeNode], relationships: &[Relationship]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for node in navigator::iter(tree) {
        if !seen.insert(node.id.as_str()) {
            issues.push(ValidationIssue::DuplicateId {
                id: node.id.clone(),
            });
        }
        if node.product_type.is_some() && !node.is_version() {
            issues.push(ValidationIssue::ProductTypeOnNonVersion {
                id: node.id.clone(),
                category: node.category,
            });
        }
    }

    check_nesting(tree, None, &mut issues);

    let versions: HashSet<&str> = navigator::select_leaf_versions(tree)
        .into_iter()
        .map(|n| n.id.as_str())
        .collect();
    for relationship in relationships {
        for version_id in [
            &relationship.product1_version_id,
            &relationship.product2_version_id,
        ] {
            if !versions.contains(version_id.as_str()) {
                issues.push(ValidationIssue::DanglingRelationship {
                    relationship_id: relationship.id.clone(),
                    version_id: version_id.clone(),
                });
            }
        }
    }

    issues
}

fn check_nesting(branches: &[TreeNode], parent: Option<Category>, issues: &mut Vec<ValidationIssue>) {
    let expected = match parent {
        None => Some(Category::Vendor),
        Some(category) => category.child_category(),
    };
    for node in branches {
        if expected != Some(node.category) {
            issues.push(ValidationIssue::UnexpectedNesting {
                id: node.id.clone(),
                category: node.category,
                parent,
            });
        }
        check_nesting(&node.sub_branches, Some(node.category), issues);
    }
}

/// Number of issues with [`Severity::Error`].
pub fn error_count(issues: &[ValidationIssue]) -> usize {
    issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ProductType, RelationshipCategory};

    #[test]
    fn given_conventional_tree_when_validating_then_no_issues() {
        let tree = vec![TreeNode::with_id("v", Category::Vendor).with_child(
            TreeNode::with_id("p", Category::ProductName).with_child(
                TreeNode::with_id("x", Category::ProductVersion)
                    .with_product_type(ProductType::Software),
            ),
        )];
        assert!(validate(&tree, &[]).is_empty());
    }

    #[test]
    fn given_duplicate_ids_when_validating_then_error() {
        let tree = vec![
            TreeNode::with_id("v", Category::Vendor),
            TreeNode::with_id("v", Category::Vendor),
        ];
        let issues = validate(&tree, &[]);
        assert_eq!(
            issues,
            vec![ValidationIssue::DuplicateId { id: "v".into() }]
        );
        assert_eq!(error_count(&issues), 1);
    }

    #[test]
    fn given_version_at_root_when_validating_then_warning_only() {
        let tree = vec![TreeNode::with_id("x", Category::ProductVersion)];
        let issues = validate(&tree, &[]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Warning);
        assert_eq!(error_count(&issues), 0);
    }

    #[test]
    fn given_relationship_to_missing_version_when_validating_then_dangling() {
        let tree = vec![TreeNode::with_id("v", Category::Vendor)
            .with_child(TreeNode::with_id("p", Category::ProductName)
                .with_child(TreeNode::with_id("x", Category::ProductVersion)))];
        let mut rel = Relationship::new(RelationshipCategory::InstalledOn, "x", "gone");
        rel.id = "r1".into();

        let issues = validate(&tree, &[rel]);

        assert_eq!(
            issues,
            vec![ValidationIssue::DanglingRelationship {
                relationship_id: "r1".into(),
                version_id: "gone".into(),
            }]
        );
    }

    #[test]
    fn given_version_under_vendor_when_validating_then_nesting_warning_names_parent() {
        let tree = vec![TreeNode::with_id("v", Category::Vendor)
            .with_child(TreeNode::with_id("x", Category::ProductVersion))];

        let issues = validate(&tree, &[]);

        assert_eq!(
            issues,
            vec![ValidationIssue::UnexpectedNesting {
                id: "x".into(),
                category: Category::ProductVersion,
                parent: Some(Category::Vendor),
            }]
        );
        assert_eq!(issues[0].severity(), Severity::Warning);
        assert_eq!(
            issues[0].to_string(),
            "product_version x nested under vendor"
        );
    }

    #[test]
    fn given_type_on_product_name_when_validating_then_warning() {
        let tree = vec![TreeNode::with_id("v", Category::Vendor).with_child(
            TreeNode::with_id("p", Category::ProductName).with_product_type(ProductType::Hardware),
        )];

        let issues = validate(&tree, &[]);

        assert_eq!(
            issues,
            vec![ValidationIssue::ProductTypeOnNonVersion {
                id: "p".into(),
                category: Category::ProductName,
            }]
        );
        assert_eq!(issues[0].severity(), Severity::Warning);
        assert_eq!(issues[0].to_string(), "product type set on product_name p");
        assert_eq!(error_count(&issues), 0);
    }
}
