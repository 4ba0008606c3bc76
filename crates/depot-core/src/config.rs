use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::properties::interpolate;
use crate::settings::{MavenSettings, Server};

/// User configuration loaded from `~/.depot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepotConfig {
    #[serde(default)]
    pub settings: SettingsConfig,

    #[serde(default)]
    pub servers: BTreeMap<String, ServerEntry>,

    #[serde(default)]
    pub publish: PublishConfig,
}

/// Maven settings from `[settings]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default, rename = "local-repository")]
    pub local_repository: Option<String>,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub interactive: bool,
}

/// Credentials for a repository from `[servers.<id>]`.
///
/// Values may reference `${env:VAR}`; they are interpolated when the
/// settings are built, not when the file is parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerEntry {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Publish behaviour from `[publish]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default, rename = "on-incomplete")]
    pub on_incomplete: IncompleteGroupPolicy,
}

/// What to do with a configuration that lacks a POM or a primary artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncompleteGroupPolicy {
    /// Leave it out of the publication and report it.
    #[default]
    Skip,
    /// Fail the commit before anything is deployed.
    Fail,
}

impl DepotConfig {
    /// Load the configuration from `~/.depot/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load the configuration from `path`, or return defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| depot_util::errors::DepotError::Config {
                message: format!("Failed to read {}: {e}", path.display()),
            })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            depot_util::errors::DepotError::Config {
                message: format!("Failed to parse config: {e}"),
            }
            .into()
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Build the immutable settings value, interpolating `${env:...}` in
    /// credentials and the local repository path.
    pub fn settings(&self, env: &BTreeMap<String, String>) -> MavenSettings {
        let local_repository = self
            .settings
            .local_repository
            .as_deref()
            .map(|raw| expand_home(&interpolate(raw, env)));

        let servers = self
            .servers
            .iter()
            .map(|(id, entry)| Server {
                id: id.clone(),
                username: entry.username.as_deref().map(|v| interpolate(v, env)),
                password: entry.password.as_deref().map(|v| interpolate(v, env)),
            })
            .collect();

        MavenSettings {
            local_repository,
            interactive_mode: self.settings.interactive,
            offline: self.settings.offline,
            servers,
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

/// Returns the path to the depot data directory (`~/.depot/`).
pub fn dirs_path() -> PathBuf {
    home_dir().join(".depot")
}
