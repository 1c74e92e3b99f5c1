//! Tests for JsonDocumentStore and the service container wiring

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tempfile::TempDir;

use csaftree::cli::{execute_command, Cli};
use csaftree::config::Settings;
use csaftree::domain::{
    navigator, Category, ProductType, Relationship, RelationshipCategory, TreeNode,
};
use csaftree::exitcode;
use csaftree::infrastructure::di::ServiceContainer;
use csaftree::infrastructure::traits::{RealFileSystem, RelationshipStore, TreeStore};
use csaftree::infrastructure::JsonDocumentStore;
use csaftree::util::testing::sample_tree;

fn store_in(dir: &TempDir) -> (JsonDocumentStore, PathBuf) {
    let path = dir.path().join("nested").join("tree.json");
    (
        JsonDocumentStore::new(Arc::new(RealFileSystem), path.clone()),
        path,
    )
}

#[test]
fn given_missing_file_when_reading_then_empty_tree() {
    let temp = TempDir::new().unwrap();
    let (store, path) = store_in(&temp);

    assert!(store.current_tree().unwrap().is_empty());
    assert!(store.all().unwrap().is_empty());
    assert!(!path.exists());
}

#[test]
fn given_replaced_tree_when_reading_back_then_identical() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let (store, path) = store_in(&temp);

    // Act
    store.replace_tree(sample_tree()).unwrap();

    // Assert
    assert!(path.exists(), "parent directories created on write");
    assert_eq!(store.current_tree().unwrap(), sample_tree());
}

#[test]
fn given_document_when_written_then_uses_camel_case_wire_names() {
    let temp = TempDir::new().unwrap();
    let (store, path) = store_in(&temp);

    store.replace_tree(sample_tree()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["productTree"][0]["category"], "vendor");
    assert_eq!(
        json["productTree"][0]["subBranches"][0]["subBranches"][0]["type"],
        "Software"
    );
    assert!(json["relationships"].as_array().unwrap().is_empty());
}

#[test]
fn given_relationships_when_deleting_twice_then_second_is_noop() {
    let temp = TempDir::new().unwrap();
    let (store, _) = store_in(&temp);
    let rel = Relationship::new(RelationshipCategory::InstalledWith, "X", "Z");
    store.add(rel.clone()).unwrap();
    store
        .add(Relationship::new(RelationshipCategory::InstalledOn, "Y", "X"))
        .unwrap();

    store.delete(&rel).unwrap();
    store.delete(&rel).unwrap();

    let remaining = store.all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(store.by_source_version("Y").unwrap().len(), 1);
    assert_eq!(store.by_target_version("X").unwrap().len(), 1);
    assert!(store.by_source_version("X").unwrap().is_empty());
}

#[test]
fn given_tree_and_relationships_when_replacing_tree_then_relationships_kept() {
    let temp = TempDir::new().unwrap();
    let (store, _) = store_in(&temp);
    store
        .add(Relationship::new(RelationshipCategory::InstalledOn, "X", "Z"))
        .unwrap();

    store.replace_tree(sample_tree()).unwrap();

    assert_eq!(store.all().unwrap().len(), 1);
}

#[test]
fn given_corrupt_file_when_reading_then_invalid_data_error() {
    let temp = TempDir::new().unwrap();
    let (store, path) = store_in(&temp);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let err = store.current_tree().unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn given_container_when_deleting_vendor_then_document_on_disk_updated() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let settings = Settings {
        data_file: temp.path().join("doc.json"),
        placeholder_name: "?".into(),
        pretty: false,
    };
    let container = ServiceContainer::new(settings);
    let service = &container.product_tree;
    for node in sample_tree() {
        service.add(node).unwrap();
    }
    service
        .relate(RelationshipCategory::InstalledOn, "X", "Z", None)
        .unwrap();

    // Act
    let report = service.delete("V1").unwrap();

    // Assert - a fresh store over the same file sees the result
    let reopened = JsonDocumentStore::new(Arc::new(RealFileSystem), temp.path().join("doc.json"));
    let document = reopened.load().unwrap();
    assert_eq!(document.product_tree.len(), 1);
    assert!(navigator::find_by_id(&document.product_tree, "X").is_none());
    assert!(document.relationships.is_empty());
    assert_eq!(report.relationships_deleted, 1);
}

#[test]
fn given_container_when_adding_under_then_persisted_nested() {
    let temp = TempDir::new().unwrap();
    let settings = Settings {
        data_file: temp.path().join("doc.json"),
        ..Settings::default()
    };
    let container = ServiceContainer::new(settings);
    let vendor = TreeNode::new(Category::Vendor).named("Acme");
    let vendor_id = vendor.id.clone();
    container.product_tree.add(vendor).unwrap();

    container
        .product_tree
        .add_under(&vendor_id, TreeNode::new(Category::ProductName).named("Widget"))
        .unwrap();

    let tree = container.document.current_tree().unwrap();
    assert_eq!(tree[0].sub_branches.len(), 1);
    assert_eq!(tree[0].sub_branches[0].name, "Widget");
}

fn container_in(temp: &TempDir) -> ServiceContainer {
    ServiceContainer::new(Settings {
        data_file: temp.path().join("doc.json"),
        ..Settings::default()
    })
}

#[rstest::rstest]
#[case(&["csaftree", "find", "missing"])]
#[case(&["csaftree", "update", "missing", "--name", "x", "--strict"])]
fn given_unknown_id_when_running_command_then_noinput_exit_code(#[case] args: &[&str]) {
    let temp = TempDir::new().unwrap();
    let container = container_in(&temp);
    let cli = Cli::try_parse_from(args).unwrap();

    let err = execute_command(&cli, &container).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_typed_version_when_updating_with_clear_type_then_type_removed_on_disk() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = container_in(&temp);
    let version = TreeNode::with_id("x", Category::ProductVersion)
        .named("1.0")
        .with_product_type(ProductType::Software);
    container.product_tree.add(version).unwrap();
    let cli = Cli::try_parse_from([
        "csaftree",
        "update",
        "x",
        "--category",
        "product_name",
        "--clear-type",
    ])
    .unwrap();

    // Act
    execute_command(&cli, &container).unwrap();

    // Assert
    let tree = container.document.current_tree().unwrap();
    assert_eq!(tree[0].category, Category::ProductName);
    assert_eq!(tree[0].product_type, None);
}

#[test]
fn given_type_and_clear_type_when_parsing_then_rejected() {
    let result = Cli::try_parse_from([
        "csaftree",
        "update",
        "x",
        "--type",
        "software",
        "--clear-type",
    ]);

    assert!(result.is_err());
}
