//! Conversion of the product tree into the CSAF `product_tree` shape.
//!
//! Version branches carry a `product` whose name is the space-joined names
//! from the root down to the version and whose id is the node id.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::entities::{Relationship, TreeNode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsafProductTree {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<CsafBranch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<CsafRelationship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsafBranch {
    pub category: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<CsafBranch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<FullProductName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullProductName {
    pub name: String,
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsafRelationship {
    pub category: String,
    pub product_reference: String,
    pub relates_to_product_reference: String,
    pub full_product_name: FullProductName,
}

/// Export the tree and relationships. Blank names are replaced by `placeholder`.
pub fn export_product_tree(
    tree: &[TreeNode],
    relationships: &[Relationship],
    placeholder: &str,
) -> CsafProductTree {
    let mut full_names = HashMap::new();
    let branches = tree
        .iter()
        .map(|node| export_branch(node, &[], placeholder, &mut full_names))
        .collect();

    let relationships = relationships
        .iter()
        .map(|rel| {
            let source = full_names
                .get(rel.product1_version_id.as_str())
                .cloned()
                .unwrap_or_else(|| rel.product1_version_id.clone());
            let target = full_names
                .get(rel.product2_version_id.as_str())
                .cloned()
                .unwrap_or_else(|| rel.product2_version_id.clone());
            let name = rel
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("{} {} {}", source, rel.category.phrase(), target));
            CsafRelationship {
                category: rel.category.as_str().to_string(),
                product_reference: rel.product1_version_id.clone(),
                relates_to_product_reference: rel.product2_version_id.clone(),
                full_product_name: FullProductName {
                    name,
                    product_id: rel.id.clone(),
                },
            }
        })
        .collect();

    CsafProductTree {
        branches,
        relationships,
    }
}

fn export_branch<'a>(
    node: &'a TreeNode,
    lineage: &[&'a str],
    placeholder: &'a str,
    full_names: &mut HashMap<&'a str, String>,
) -> CsafBranch {
    let name = node.display_name(placeholder);
    let mut path = lineage.to_vec();
    path.push(name);

    let product = if node.is_version() {
        let full_name = path.join(" ");
        full_names.insert(node.id.as_str(), full_name.clone());
        Some(FullProductName {
            name: full_name,
            product_id: node.id.clone(),
        })
    } else {
        None
    };

    CsafBranch {
        category: node.category.as_str().to_string(),
        name: name.to_string(),
        branches: node
            .sub_branches
            .iter()
            .map(|child| export_branch(child, &path, placeholder, full_names))
            .collect(),
        product,
    }
}
