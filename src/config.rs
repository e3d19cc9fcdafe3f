use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "distpublish.toml";

/// Represents the complete configuration for dist-publish.
///
/// Contains registry settings, staging layout, git conventions and the
/// prepare commands run by `--prepare`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub staging: StagingConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub prepare: PrepareConfig,
}

fn default_registry_url() -> String {
    "https://registry.npmjs.org/".to_string()
}

fn default_registry_client() -> String {
    "npm".to_string()
}

/// Where and with which client packages are published.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_url")]
    pub url: String,

    #[serde(default = "default_registry_client")]
    pub client: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            url: default_registry_url(),
            client: default_registry_client(),
        }
    }
}

fn default_src() -> String {
    "dist".to_string()
}

fn default_dest() -> String {
    ".publish".to_string()
}

fn default_files() -> Vec<String> {
    vec!["README.md".to_string(), ".npmrc".to_string()]
}

fn default_license() -> String {
    "LICENSE".to_string()
}

/// Layout of the staged package tree.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StagingConfig {
    /// Directory whose contents become the package root
    #[serde(default = "default_src")]
    pub src: String,

    /// Staging directory, relative to the project root
    #[serde(default = "default_dest")]
    pub dest: String,

    /// Root-level files copied next to a build-output tree
    #[serde(default = "default_files")]
    pub files: Vec<String>,

    /// License file copied unless `--no-license`
    #[serde(default = "default_license")]
    pub license: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        StagingConfig {
            src: default_src(),
            dest: default_dest(),
            files: default_files(),
            license: default_license(),
        }
    }
}

fn default_message() -> String {
    "chore: release v{version}".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

/// Commit and tag conventions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GitConfig {
    /// Default commit/tag message; `{version}` is replaced with the new version
    #[serde(default = "default_message")]
    pub message: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Capture multi-line commit messages (blank line finishes)
    #[serde(default)]
    pub multiline: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            message: default_message(),
            tag_prefix: default_tag_prefix(),
            multiline: false,
        }
    }
}

impl GitConfig {
    /// Default message with `{version}` filled in.
    pub fn message_for(&self, version: &str) -> String {
        self.message.replace("{version}", version)
    }
}

fn default_prepare_commands() -> Vec<String> {
    vec![
        "npm run lint".to_string(),
        "npm test".to_string(),
        "npm run build".to_string(),
    ]
}

/// Checks run before anything is staged when `--prepare` is given.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PrepareConfig {
    #[serde(default = "default_prepare_commands")]
    pub commands: Vec<String>,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        PrepareConfig {
            commands: default_prepare_commands(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `distpublish.toml` in the project root
/// 3. `.distpublish.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `project_root` - Directory holding the package manifest
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, project_root: &Path) -> Result<Config> {
    let local = project_root.join(CONFIG_FILE);

    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join(format!(".{}", CONFIG_FILE));
        if user.exists() {
            user
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    log::debug!("loading configuration from {}", path.display());
    let raw = fs::read_to_string(&path)
        .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&raw).map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))
}
