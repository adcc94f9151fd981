use serde::{Deserialize, Serialize};
use starview_backend::config::{CatalogConfig, FetchConfig};
use starview_backend::DisplayPolicy;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port to bind the server to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to bind to all interfaces (0.0.0.0) or just localhost
    #[serde(default = "default_bind_all")]
    pub bind_all: bool,

    /// Directory containing the static viewer page and scripts (optional)
    #[serde(default)]
    pub viewer_directory: Option<String>,

    /// URL prefix for viewer assets (e.g., "viewer" -> /viewer/index.html)
    #[serde(default = "default_viewer_prefix")]
    pub viewer_prefix: String,

    /// Enable CORS for cross-origin requests
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Defaults for requests that omit count or max_distance
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub display: DisplayPolicy,
}

fn default_port() -> u16 {
    3030
}

fn default_bind_all() -> bool {
    true
}

fn default_viewer_prefix() -> String {
    "viewer".to_string()
}

fn default_enable_cors() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_all: default_bind_all(),
            viewer_directory: None,
            viewer_prefix: default_viewer_prefix(),
            enable_cors: default_enable_cors(),
            catalog: CatalogConfig::default(),
            fetch: FetchConfig::default(),
            display: DisplayPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;

        Self::parse(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;
        config.catalog.validate()?;
        config.display.validate()?;
        if config.viewer_prefix.trim_matches('/').is_empty() {
            anyhow::bail!("viewer_prefix must not be empty");
        }
        Ok(config)
    }

    /// Mount path for viewer assets, e.g. "/viewer"
    pub fn viewer_route(&self) -> String {
        format!("/{}", self.viewer_prefix.trim_matches('/'))
    }

    pub fn bind_ip(&self) -> [u8; 4] {
        if self.bind_all {
            [0, 0, 0, 0]
        } else {
            [127, 0, 0, 1]
        }
    }
}
