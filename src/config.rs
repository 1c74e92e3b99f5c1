//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/csaftree/csaftree.toml`
//! 3. Local config: `<project_dir>/.csaftree.toml`
//! 4. Environment variables: `CSAFTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Unified configuration for csaftree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON document holding the product tree and relationships
    pub data_file: PathBuf,
    /// Shown in place of blank branch names
    pub placeholder_name: String,
    /// Indent exported and stored JSON
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            placeholder_name: "(unnamed)".into(),
            pretty: true,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub placeholder_name: Option<String>,
    pub pretty: Option<bool>,
}

/// Default document location: `<XDG data dir>/csaftree/product-tree.json`.
fn default_data_file() -> PathBuf {
    ProjectDirs::from("", "", "csaftree")
        .map(|dirs| dirs.data_dir().join("product-tree.json"))
        .unwrap_or_else(|| PathBuf::from("product-tree.json"))
}

/// Get the XDG config directory for csaftree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "csaftree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("csaftree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".csaftree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            placeholder_name: overlay
                .placeholder_name
                .clone()
                .unwrap_or_else(|| self.placeholder_name.clone()),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory searched for `.csaftree.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply CSAFTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("CSAFTREE").try_parsing(true))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("placeholder_name") {
            settings.placeholder_name = val;
        }
        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }

        Ok(settings)
    }

    /// Render as TOML for display.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let base = Settings {
            data_file: PathBuf::from("/data/tree.json"),
            placeholder_name: "?".into(),
            pretty: true,
        };
        let overlay = RawSettings {
            pretty: Some(false),
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.data_file, PathBuf::from("/data/tree.json"));
        assert_eq!(merged.placeholder_name, "?");
        assert!(!merged.pretty);
    }
}
