//! Command dispatch: maps parsed arguments onto services

use std::io;

use clap::CommandFactory;
use regex::Regex;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path};
use crate::domain::export::export_product_tree;
use crate::domain::navigator;
use crate::domain::validation::{self, Severity};
use crate::domain::{Category, DomainError, ProductTreeDocument, ProductType, TreeNode, TreeNodePatch};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Init { force }) => init(container, *force),
        Some(Commands::Add {
            category,
            name,
            description,
            product_type,
            parent,
        }) => add(
            container,
            *category,
            name,
            description,
            *product_type,
            parent.as_deref(),
        ),
        Some(Commands::Update {
            id,
            name,
            description,
            category,
            product_type,
            clear_type,
            strict,
        }) => {
            let product_type = if *clear_type {
                Some(None)
            } else {
                product_type.map(Some)
            };
            let patch = TreeNodePatch {
                id: id.clone(),
                category: *category,
                name: name.clone(),
                description: description.clone(),
                sub_branches: None,
                product_type,
            };
            update(container, patch, *strict)
        }
        Some(Commands::Delete { id }) => delete(container, id),
        Some(Commands::Show { category, ids }) => show(container, *category, *ids),
        Some(Commands::Find { id }) => find(container, id),
        Some(Commands::Filter { pattern, keep }) => filter(container, pattern, keep),
        Some(Commands::Versions) => versions(container),
        Some(Commands::Relate {
            category,
            source,
            target,
            name,
        }) => {
            let relationship =
                container
                    .product_tree
                    .relate(*category, source, target, name.clone())?;
            output::success(&format!("related {} {} {}", source, category, target));
            output::info(&relationship.id);
            Ok(())
        }
        Some(Commands::Relationships) => relationships(container),
        Some(Commands::Check) => check(container),
        Some(Commands::Export { output }) => export(container, output.as_deref()),
        Some(Commands::Config { command }) => config(container, command, cli),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

#[instrument(level = "debug", skip(container))]
fn init(container: &ServiceContainer, force: bool) -> CliResult<()> {
    let path = container.document.path();
    if container.fs.exists(path) && !force {
        return Err(CliError::Usage(format!(
            "document already exists: {} (use --force)",
            path.display()
        )));
    }
    container
        .document
        .save(&ProductTreeDocument::default())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::success(&format!("initialized {}", path.display()));
    Ok(())
}

#[instrument(level = "debug", skip(container, description))]
fn add(
    container: &ServiceContainer,
    category: Category,
    name: &str,
    description: &str,
    product_type: Option<ProductType>,
    parent: Option<&str>,
) -> CliResult<()> {
    if product_type.is_some() && category != Category::ProductVersion {
        return Err(CliError::InvalidArgs(
            "--type applies to product_version only".to_string(),
        ));
    }
    let mut node = TreeNode::new(category).named(name).described(description);
    node.product_type = product_type;
    let id = node.id.clone();

    match parent {
        Some(parent_id) => {
            container.product_tree.add_under(parent_id, node)?;
        }
        None => container.product_tree.add(node)?,
    }
    output::info(&id);
    Ok(())
}

fn update(container: &ServiceContainer, patch: TreeNodePatch, strict: bool) -> CliResult<()> {
    let id = patch.id.clone();
    if strict {
        container.product_tree.try_update(patch)?;
    } else {
        let tree = container.product_tree.update(patch)?;
        if navigator::find_by_id(&tree, &id).is_none() {
            output::warning(&format!("no branch with id {id}, nothing changed"));
            return Ok(());
        }
    }
    output::success(&format!("updated {id}"));
    Ok(())
}

fn delete(container: &ServiceContainer, id: &str) -> CliResult<()> {
    let report = container.product_tree.delete(id)?;
    if !report.found {
        output::warning(&format!("no branch with id {id}, nothing deleted"));
        return Ok(());
    }
    output::success(&format!(
        "deleted {} ({} version(s), {} relationship deletion(s))",
        id,
        report.removed_version_ids.len(),
        report.relationships_deleted
    ));
    Ok(())
}

fn show(container: &ServiceContainer, category: Option<Category>, ids: bool) -> CliResult<()> {
    let placeholder = &container.settings.placeholder_name;
    match category {
        Some(category) => {
            for node in container.product_tree.select_by_category(category)? {
                output::info(&output::branch_label(&node, placeholder, ids));
            }
        }
        None => {
            let tree = container.product_tree.snapshot()?;
            if tree.is_empty() {
                output::warning("product tree is empty");
            }
            print!("{}", output::render_tree(&tree, placeholder, ids));
        }
    }
    Ok(())
}

fn find(container: &ServiceContainer, id: &str) -> CliResult<()> {
    let placeholder = &container.settings.placeholder_name;
    let tree = container.product_tree.snapshot()?;
    let location = navigator::find_with_ancestors(&tree, id)
        .ok_or_else(|| ApplicationError::from(DomainError::NodeNotFound(id.to_string())))?;

    output::header(&output::location_path(&location, placeholder));
    output::detail(&output::branch_label(location.node, placeholder, true));
    if !location.node.description.is_empty() {
        output::detail(&location.node.description);
    }
    let mut parent = location.parent();
    while let Some(current) = parent {
        output::detail(&format!(
            "in {}",
            output::branch_label(current.node, placeholder, true)
        ));
        parent = current.parent();
    }
    Ok(())
}

fn filter(container: &ServiceContainer, pattern: &str, keep: &[Category]) -> CliResult<()> {
    let regex = Regex::new(pattern)
        .map_err(|e| CliError::InvalidArgs(format!("invalid pattern {pattern}: {e}")))?;
    debug!("filter: pattern={} keep={:?}", pattern, keep);

    let pruned = container
        .product_tree
        .filter(|node| keep.contains(&node.category) || regex.is_match(&node.name))?;
    print!(
        "{}",
        output::render_tree(&pruned, &container.settings.placeholder_name, true)
    );
    Ok(())
}

fn versions(container: &ServiceContainer) -> CliResult<()> {
    let placeholder = &container.settings.placeholder_name;
    let tree = container.product_tree.snapshot()?;
    for version in navigator::select_leaf_versions(&tree) {
        let path = navigator::find_with_ancestors(&tree, &version.id)
            .map(|location| output::location_path(&location, placeholder))
            .unwrap_or_else(|| version.display_name(placeholder).to_string());
        output::info(&format!("{}\t{}", version.id, path));
    }
    Ok(())
}

fn relationships(container: &ServiceContainer) -> CliResult<()> {
    for relationship in container.product_tree.relationships()? {
        output::info(&format!(
            "{}\t{}\t{} -> {}",
            relationship.id,
            relationship.category,
            relationship.product1_version_id,
            relationship.product2_version_id
        ));
    }
    Ok(())
}

fn check(container: &ServiceContainer) -> CliResult<()> {
    let tree = container.product_tree.snapshot()?;
    let relationships = container.product_tree.relationships()?;
    let issues = validation::validate(&tree, &relationships);

    for issue in &issues {
        match issue.severity() {
            Severity::Error => output::error(issue),
            Severity::Warning => output::warning(issue),
        }
    }
    let errors = validation::error_count(&issues);
    if errors > 0 {
        return Err(CliError::CheckFailed { errors });
    }
    output::success(&format!(
        "{} branch(es), {} relationship(s) ok",
        navigator::count(&tree),
        relationships.len()
    ));
    Ok(())
}

fn export(container: &ServiceContainer, target: Option<&std::path::Path>) -> CliResult<()> {
    let tree = container.product_tree.snapshot()?;
    let relationships = container.product_tree.relationships()?;
    let exported = export_product_tree(&tree, &relationships, &container.settings.placeholder_name);

    let json = if container.settings.pretty {
        serde_json::to_string_pretty(&exported)
    } else {
        serde_json::to_string(&exported)
    }
    .map_err(|e| InfraError::serialization("export product tree", e))?;

    match target {
        Some(path) => {
            container
                .fs
                .write(path, &json)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("exported to {}", path.display()));
        }
        None => output::info(&json),
    }
    Ok(())
}

fn config(container: &ServiceContainer, command: &ConfigCommands, cli: &Cli) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::warning("no global config directory on this platform"),
            }
            let project_dir = cli
                .project_dir
                .clone()
                .or_else(|| std::env::current_dir().ok());
            if let Some(dir) = project_dir {
                output::info(&format!("local:  {}", local_config_path(&dir).display()));
            }
            output::info(&format!(
                "data:   {}",
                container.settings.data_file.display()
            ));
        }
    }
    Ok(())
}
