//! Domain entities: product tree branches and relationships

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Position of a branch in the product hierarchy.
///
/// Conventional nesting is vendor → product_name → product_version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Vendor,
    ProductName,
    ProductVersion,
}

impl Category {
    /// CSAF wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::ProductName => "product_name",
            Self::ProductVersion => "product_version",
        }
    }

    /// Category expected directly below this one, None for leaves.
    pub fn child_category(&self) -> Option<Category> {
        match self {
            Self::Vendor => Some(Self::ProductName),
            Self::ProductName => Some(Self::ProductVersion),
            Self::ProductVersion => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "vendor" => Ok(Self::Vendor),
            "product_name" | "product" => Ok(Self::ProductName),
            "product_version" | "version" => Ok(Self::ProductVersion),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

/// Kind of product a version describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    Software,
    Hardware,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Software => f.write_str("Software"),
            Self::Hardware => f.write_str("Hardware"),
        }
    }
}

impl FromStr for ProductType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "software" => Ok(Self::Software),
            "hardware" => Ok(Self::Hardware),
            _ => Err(DomainError::UnknownProductType(s.to_string())),
        }
    }
}

/// One vendor, product or version entry of the product tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Unique across the whole tree
    pub id: String,
    pub category: Category,
    /// May be empty, display code substitutes a placeholder
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ordered children
    #[serde(default)]
    pub sub_branches: Vec<TreeNode>,
    /// Only meaningful on product versions
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
}

impl TreeNode {
    /// Create an empty node with a freshly generated id.
    pub fn new(category: Category) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), category)
    }

    /// Create an empty node with a caller-supplied id.
    pub fn with_id(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
            name: String::new(),
            description: String::new(),
            sub_branches: Vec::new(),
            product_type: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = Some(product_type);
        self
    }

    /// Append a child branch, keeping insertion order.
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.sub_branches.push(child);
        self
    }

    pub fn is_version(&self) -> bool {
        self.category == Category::ProductVersion
    }

    /// Name for display, `placeholder` when the name is blank.
    pub fn display_name<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.name.trim().is_empty() {
            placeholder
        } else {
            &self.name
        }
    }

    /// Copy of this node without children.
    pub(crate) fn detached(&self) -> Self {
        Self {
            id: self.id.clone(),
            category: self.category,
            name: self.name.clone(),
            description: self.description.clone(),
            sub_branches: Vec::new(),
            product_type: self.product_type,
        }
    }

    /// Shallow merge: every field present in `patch` overwrites, absent fields are kept.
    pub fn merge(&mut self, patch: &TreeNodePatch) {
        self.id.clone_from(&patch.id);
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(sub_branches) = &patch.sub_branches {
            self.sub_branches.clone_from(sub_branches);
        }
        if let Some(product_type) = patch.product_type {
            self.product_type = product_type;
        }
    }
}

/// Partial update addressed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNodePatch {
    pub id: String,
    pub category: Option<Category>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub sub_branches: Option<Vec<TreeNode>>,
    /// `Some(None)` clears the type
    pub product_type: Option<Option<ProductType>>,
}

impl TreeNodePatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn sub_branches(mut self, sub_branches: Vec<TreeNode>) -> Self {
        self.sub_branches = Some(sub_branches);
        self
    }

    pub fn product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = Some(Some(product_type));
        self
    }

    pub fn clear_product_type(mut self) -> Self {
        self.product_type = Some(None);
        self
    }
}

impl From<TreeNode> for TreeNodePatch {
    fn from(node: TreeNode) -> Self {
        Self {
            id: node.id,
            category: Some(node.category),
            name: Some(node.name),
            description: Some(node.description),
            sub_branches: Some(node.sub_branches),
            product_type: Some(node.product_type),
        }
    }
}

/// CSAF relationship categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipCategory {
    DefaultComponentOf,
    ExternalComponentOf,
    InstalledOn,
    InstalledWith,
    OptionalComponentOf,
}

impl RelationshipCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultComponentOf => "default_component_of",
            Self::ExternalComponentOf => "external_component_of",
            Self::InstalledOn => "installed_on",
            Self::InstalledWith => "installed_with",
            Self::OptionalComponentOf => "optional_component_of",
        }
    }

    /// Human-readable form used in composed product names ("installed on").
    pub fn phrase(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for RelationshipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "default_component_of" => Ok(Self::DefaultComponentOf),
            "external_component_of" => Ok(Self::ExternalComponentOf),
            "installed_on" => Ok(Self::InstalledOn),
            "installed_with" => Ok(Self::InstalledWith),
            "optional_component_of" => Ok(Self::OptionalComponentOf),
            _ => Err(DomainError::UnknownRelationshipCategory(s.to_string())),
        }
    }
}

/// Link between two product versions (source `product1`, target `product2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub category: RelationshipCategory,
    pub product1_version_id: String,
    pub product2_version_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Relationship {
    /// Create a relationship with a freshly generated id.
    pub fn new(
        category: RelationshipCategory,
        source_version_id: impl Into<String>,
        target_version_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            product1_version_id: source_version_id.into(),
            product2_version_id: target_version_id.into(),
            name: None,
        }
    }
}

/// Persisted document: the product tree plus its relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTreeDocument {
    #[serde(default)]
    pub product_tree: Vec<TreeNode>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_patch_with_name_only_when_merging_then_other_fields_kept() {
        let mut node = TreeNode::with_id("v1", Category::ProductVersion)
            .named("1.0")
            .described("first")
            .with_product_type(ProductType::Software);

        node.merge(&TreeNodePatch::new("v1").name("1.1"));

        assert_eq!(node.name, "1.1");
        assert_eq!(node.description, "first");
        assert_eq!(node.category, Category::ProductVersion);
        assert_eq!(node.product_type, Some(ProductType::Software));
    }

    #[test]
    fn given_full_patch_of_same_node_when_merging_then_node_unchanged() {
        let original = TreeNode::with_id("p", Category::ProductName)
            .named("Widget")
            .with_child(TreeNode::with_id("v", Category::ProductVersion).named("2"));
        let mut node = original.clone();

        node.merge(&TreeNodePatch::from(original.clone()));

        assert_eq!(node, original);
    }

    #[test]
    fn given_full_patch_without_type_when_merging_then_type_cleared() {
        let mut node = TreeNode::with_id("x", Category::ProductVersion)
            .with_product_type(ProductType::Software);
        let mut replacement = node.clone();
        replacement.product_type = None;

        node.merge(&TreeNodePatch::from(replacement));

        assert_eq!(node.product_type, None);
    }

    #[test]
    fn given_clear_type_patch_when_merging_then_type_cleared() {
        let mut node = TreeNode::with_id("x", Category::ProductVersion)
            .with_product_type(ProductType::Hardware);

        node.merge(&TreeNodePatch::new("x").clear_product_type());

        assert_eq!(node.product_type, None);
    }

    #[rstest]
    #[case("vendor", Category::Vendor)]
    #[case("product_name", Category::ProductName)]
    #[case("product-version", Category::ProductVersion)]
    #[case("Version", Category::ProductVersion)]
    fn given_category_text_when_parsing_then_matches(#[case] input: &str, #[case] expected: Category) {
        assert_eq!(input.parse::<Category>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_category_when_parsing_then_error() {
        assert!(matches!(
            "platform".parse::<Category>(),
            Err(DomainError::UnknownCategory(_))
        ));
    }

    #[test]
    fn given_node_when_serializing_then_uses_wire_names() {
        let node = TreeNode::with_id("v", Category::ProductVersion)
            .named("1.0")
            .with_product_type(ProductType::Hardware);

        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["category"], "product_version");
        assert_eq!(json["type"], "Hardware");
        assert!(json["subBranches"].as_array().unwrap().is_empty());
    }

    #[test]
    fn given_blank_name_when_displaying_then_placeholder() {
        let node = TreeNode::with_id("x", Category::Vendor).named("  ");
        assert_eq!(node.display_name("(unnamed)"), "(unnamed)");
    }

    #[test]
    fn given_two_generated_nodes_then_ids_differ() {
        let a = TreeNode::new(Category::Vendor);
        let b = TreeNode::new(Category::Vendor);
        assert_ne!(a.id, b.id);
    }
}
