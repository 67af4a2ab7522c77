use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::proxy::RenderMode;
use crate::sources::CacheMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub default_mode: CacheMode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub mode: RenderMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_cache_directory() -> PathBuf {
    std::env::temp_dir().join("m3u-filter")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("m3u-filter/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: default_cache_directory(),
            default_mode: CacheMode::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, using defaults when it does not exist
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            info!("Configuration loaded from: {}", path.display());
            Ok(config)
        } else {
            info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }
}
