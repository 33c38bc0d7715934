use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NextVersionError, Result};

/// Represents the complete configuration for next-version.
///
/// Contains workflow defaults, branch-naming rules, and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_increment() -> String {
    "minor".to_string()
}

fn default_commit_message() -> String {
    "Version {version} [next-version]".to_string()
}

/// Configuration for workflow defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WorkflowConfig {
    #[serde(default = "default_increment")]
    pub default_increment: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            default_increment: default_increment(),
            commit_message: default_commit_message(),
        }
    }
}

fn default_release_label() -> String {
    "Release".to_string()
}

fn default_patch_label() -> String {
    "Patch".to_string()
}

/// Branch names that are never offered as base-branch candidates.
fn default_skip_pattern() -> String {
    "^(release|patch|feature|fix|hot-?fix|bug)".to_string()
}

/// Base branches offered first when selecting where to start the bump.
fn default_preferred_base() -> Vec<String> {
    vec![
        "main".to_string(),
        "master".to_string(),
        "production".to_string(),
    ]
}

/// Configuration for branch naming and base-branch selection.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    #[serde(default = "default_release_label")]
    pub release_label: String,

    #[serde(default = "default_patch_label")]
    pub patch_label: String,

    #[serde(default = "default_skip_pattern")]
    pub skip_pattern: String,

    #[serde(default = "default_preferred_base")]
    pub preferred_base: Vec<String>,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            release_label: default_release_label(),
            patch_label: default_patch_label(),
            skip_pattern: default_skip_pattern(),
            preferred_base: default_preferred_base(),
        }
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub skip_remote_selection: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workflow: WorkflowConfig::default(),
            branches: BranchesConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Config {
    /// Expand the commit message template for a bumped version.
    pub fn commit_message(&self, version: &str) -> String {
        self.workflow.commit_message.replace("{version}", version)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `nextversion.toml` in current directory
/// 3. `.nextversion.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./nextversion.toml").exists() {
        fs::read_to_string("./nextversion.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".nextversion.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config =
        toml::from_str(&config_str).map_err(|e| NextVersionError::config(e.to_string()))?;
    Ok(config)
}
