use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ypip_util::errors::YpipError;

/// Default name of the requirements file fetched from repositories and
/// read from the working directory.
pub const DEFAULT_REQUIREMENTS_FILE: &str = "requirements.txt";

/// Global user configuration loaded from `~/.ypip/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    /// Per-provider overrides keyed by provider name (`github`, `gitlab`, `bitbucket`).
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

/// Retrieval settings from `[fetch]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_requirements_file", rename = "requirements-file")]
    pub requirements_file: String,
    #[serde(default = "default_user_agent", rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            requirements_file: default_requirements_file(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

fn default_requirements_file() -> String {
    DEFAULT_REQUIREMENTS_FILE.to_string()
}

fn default_user_agent() -> String {
    format!("ypip/{}", env!("CARGO_PKG_VERSION"))
}

/// How the resolver reacts to the first conflicting pair of requirements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictMode {
    /// Abort on the first conflict.
    #[default]
    FailFast,
    /// Record every conflict and finish the walk.
    Collect,
}

/// Resolution settings from `[resolve]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default)]
    pub conflicts: ConflictMode,
}

/// Settings for one hosted VCS provider from `[providers.<name>]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Base URL of the raw-content endpoint, replacing the provider default.
    #[serde(default, rename = "raw-base")]
    pub raw_base: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            raw_base: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl GlobalConfig {
    /// Load the global configuration from `~/.ypip/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Ok(Self::load_from(&Self::default_path())?)
    }

    /// Load configuration from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, YpipError> {
        if !path.is_file() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| YpipError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| YpipError::Config {
            message: format!("Failed to parse {}: {e}", path.display()),
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        ypip_util::fs::ypip_home().join("config.toml")
    }

    /// Settings for a provider, falling back to defaults when unconfigured.
    pub fn provider(&self, name: &str) -> ProviderConfig {
        self.providers.get(name).cloned().unwrap_or_default()
    }
}
