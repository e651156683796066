//! Configuration management for Pathways.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::visibility::{Actor, OwnershipKey, ViewFilter};

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".pathways.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// View filtering
    pub visibility: VisibilityConfig,

    /// Store settings
    pub store: StoreConfig,

    /// Service facade settings
    pub api: ApiConfig,
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Name of the role that sees every record
    pub admin_role: String,

    /// Actor name used when a command does not pass `--as`
    pub actor: String,

    /// Actor role used when a command does not pass `--role`
    pub role: String,
}

/// View filter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Match record owners by `name` or by `id`
    pub ownership: OwnershipKey,
}

/// Store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Load the reference fixtures on start
    pub seed: bool,
}

/// Service facade settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Host reported in the facade's base URL
    pub host: String,

    /// Port reported in the facade's base URL
    pub port: u16,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.pathways.toml` in current directory
    /// 2. `~/.config/pathways/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::global_path() {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Path of the file `load` would read, if any.
    pub fn active_path() -> Option<PathBuf> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }
        Self::global_path().filter(|p| p.exists())
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::global_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to_file(&path)
    }

    /// Save configuration to a specific file, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pathways"))
    }

    fn global_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// The view filter described by this config.
    pub fn view_filter(&self) -> ViewFilter {
        ViewFilter::new(self.general.admin_role.clone(), self.visibility.ownership)
    }

    /// The default actor, with optional overrides from the command line.
    pub fn actor(&self, name: Option<&str>, role: Option<&str>) -> Actor {
        Actor::new(
            name.unwrap_or(&self.general.actor),
            role.unwrap_or(&self.general.role),
        )
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            admin_role: "Admin".to_string(),
            actor: "Admin User".to_string(),
            role: "Admin".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { seed: true }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 4000 }
    }
}

impl ApiConfig {
    /// Base URL the facade reports for its routes.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/api", self.host, self.port)
    }
}
