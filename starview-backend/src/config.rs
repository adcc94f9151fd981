use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use starview_common::FetchParams;

use crate::transform::DisplayPolicy;

pub const GAIA_TAP_SYNC_URL: &str = "https://gea.esac.esa.int/tap-server/tap/sync";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarviewConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub display: DisplayPolicy,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Remote catalog connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TAP synchronous query endpoint
    #[serde(default = "default_tap_url")]
    pub tap_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per fetch; 1 disables retrying
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Upper bound on parallax_error / parallax
    #[serde(default = "default_max_relative_parallax_error")]
    pub max_relative_parallax_error: f64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_star_count")]
    pub star_count: i64,

    #[serde(default = "default_max_distance_pc")]
    pub max_distance_pc: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_tap_url() -> String {
    GAIA_TAP_SYNC_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    1
}

fn default_retry_delay_secs() -> u64 {
    2
}

fn default_max_relative_parallax_error() -> f64 {
    0.2
}

fn default_user_agent() -> String {
    format!("starview/{}", env!("CARGO_PKG_VERSION"))
}

fn default_star_count() -> i64 {
    300
}

fn default_max_distance_pc() -> f64 {
    30.0
}

fn default_output_dir() -> String {
    "data".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tap_url: default_tap_url(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
            max_relative_parallax_error: default_max_relative_parallax_error(),
            user_agent: default_user_agent(),
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_attempts == 0 {
            anyhow::bail!("catalog.max_attempts must be at least 1");
        }
        let max_error = self.max_relative_parallax_error;
        if max_error.is_nan() || max_error <= 0.0 {
            anyhow::bail!("catalog.max_relative_parallax_error must be positive");
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            star_count: default_star_count(),
            max_distance_pc: default_max_distance_pc(),
        }
    }
}

impl FetchConfig {
    /// Clamped request parameters, warning when the configured values were out of range.
    pub fn params(&self) -> FetchParams {
        if !FetchParams::is_in_range(self.star_count, self.max_distance_pc) {
            tracing::warn!(
                "Fetch parameters out of range (count={}, max_distance={} pc), clamping",
                self.star_count,
                self.max_distance_pc
            );
        }
        FetchParams::new(self.star_count, self.max_distance_pc)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Default for StarviewConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            catalog: CatalogConfig::default(),
            fetch: FetchConfig::default(),
            display: DisplayPolicy::default(),
            export: ExportConfig::default(),
        }
    }
}

impl StarviewConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: StarviewConfig =
            toml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists; `None` when there is no such file.
    pub fn load_optional(path: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.display.validate()?;
        self.catalog.validate()
    }
}
