//! Configuration management for Atlas.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/atlas/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Lookup behavior shared by every source
    pub lookup: LookupConfig,
    /// Breach index settings
    pub breach: BreachConfig,
    /// Profile platform settings
    pub profile: ProfileConfig,
    /// Credit policy settings
    pub credits: CreditsConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `ATLAS_BREACH_API_KEY`: API key sent to the breach index
    /// - `ATLAS_BREACH_BASE_URL`: Override the breach index base URL
    /// - `ATLAS_LOOKUP_TIMEOUT_SECS`: Override the per-call timeout
    /// - `ATLAS_ADMIN_EMAIL`: Override the administrator account
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `ATLAS_*` environment overrides to an already loaded config.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("ATLAS_BREACH_API_KEY") {
            if !key.is_empty() {
                self.breach.api_key = Some(key);
                tracing::debug!("Breach API key supplied from env");
            }
        }

        if let Ok(url) = std::env::var("ATLAS_BREACH_BASE_URL") {
            tracing::debug!("Override breach.base_url from env: {}", url);
            self.breach.base_url = url;
        }

        if let Ok(val) = std::env::var("ATLAS_LOOKUP_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.lookup.timeout_secs = secs;
                tracing::debug!("Override lookup.timeout_secs from env: {}", secs);
            }
        }

        if let Ok(email) = std::env::var("ATLAS_ADMIN_EMAIL") {
            tracing::debug!("Override credits.admin_email from env");
            self.credits.admin_email = Some(email);
        }
    }

    /// Check values that would otherwise fail at lookup time.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.lookup.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lookup.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let urls = [
            ("breach.base_url", &self.breach.base_url),
            ("profile.users_base_url", &self.profile.users_base_url),
            (
                "profile.thumbnails_base_url",
                &self.profile.thumbnails_base_url,
            ),
            ("profile.friends_base_url", &self.profile.friends_base_url),
            ("profile.groups_base_url", &self.profile.groups_base_url),
        ];
        for (field, url) in urls {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Render the configuration as TOML.
    ///
    /// The breach API key is never included.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/atlas/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "atlas", "atlas").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Lookup behavior shared by every source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Timeout applied to each networked call, in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl LookupConfig {
    /// The per-call timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "Atlas/0.1.0 (+https://github.com/atlas-intel/atlas)".to_string(),
        }
    }
}

/// Breach index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreachConfig {
    /// Base URL of the breach index API
    pub base_url: String,
    /// API key (supplied by environment, never written to disk)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for BreachConfig {
    fn default() -> Self {
        Self {
            base_url: "https://leakcheck.io/api/v2".to_string(),
            api_key: None,
        }
    }
}

/// Profile platform settings.
///
/// Each sub-service is addressed separately so any of them can be pointed at
/// a proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Identity info service
    pub users_base_url: String,
    /// Avatar thumbnail service
    pub thumbnails_base_url: String,
    /// Friends / followers / following counts service
    pub friends_base_url: String,
    /// Group membership service
    pub groups_base_url: String,
    /// Requested avatar size, e.g. `352x352`
    pub avatar_size: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            users_base_url: "https://users.roblox.com/v1".to_string(),
            thumbnails_base_url: "https://thumbnails.roblox.com/v1".to_string(),
            friends_base_url: "https://friends.roblox.com/v1".to_string(),
            groups_base_url: "https://groups.roblox.com/v1".to_string(),
            avatar_size: "352x352".to_string(),
        }
    }
}

/// Credit policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditsConfig {
    /// Credits granted to an account that has none recorded yet
    pub default_grant: u32,
    /// Account that holds an unbounded balance and may inject credits
    pub admin_email: Option<String>,
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            default_grant: 25,
            admin_email: None,
        }
    }
}
