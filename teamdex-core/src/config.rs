//! teamdex configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. `--config <path>` passed on the command line
//! 2. `config.yaml` in the platform config directory
//!    (`~/.config/teamdex/config.yaml` on Linux)
//! 3. Built-in defaults
//!
//! ```yaml
//! catalog:
//!   base_url: https://pokeapi.co/api/v2
//!   limit: 1010
//!   batch_size: 50
//!   batch_delay_ms: 100
//! share:
//!   default_filename: my-pokemon-team.png
//!   scale: 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Default catalog API root
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Number of catalog entries covering generations 1 through 9
pub const DEFAULT_CATALOG_LIMIT: u32 = 1010;

/// Default exported file name
pub const DEFAULT_EXPORT_FILENAME: &str = "my-pokemon-team.png";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamdexConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub share: ShareConfig,
}

/// Catalog API and loader tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of entries requested from the list endpoint
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Detail requests issued concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between batches, in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// HTTP timeout per request
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Resolve localized names through the species endpoint while loading.
    /// Doubles the request count, so it is off by default.
    #[serde(default)]
    pub localized_names: bool,

    /// Language code used for localized names
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_CATALOG_LIMIT
}

fn default_batch_size() -> usize {
    50
}

fn default_batch_delay_ms() -> u64 {
    100
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_language() -> String {
    "ja-Hrkt".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            limit: default_limit(),
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
            timeout_seconds: default_timeout_seconds(),
            localized_names: false,
            language: default_language(),
        }
    }
}

impl CatalogConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Base URL with any trailing slash removed
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Export and sharing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_filename")]
    pub default_filename: String,

    /// Title passed to the native share sheet
    #[serde(default = "default_share_title")]
    pub title: String,

    /// Hashtags appended to social intents
    #[serde(default = "default_hashtags")]
    pub hashtags: Vec<String>,

    /// Link attached to social intents (Facebook requires one)
    #[serde(default)]
    pub link: Option<String>,

    /// How long a success/failure status stays visible
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,

    /// Window in which repeated intent invocations are ignored
    #[serde(default = "default_intent_debounce_ms")]
    pub intent_debounce_ms: u64,

    /// Raster scale factor, at least 2
    #[serde(default = "default_scale")]
    pub scale: u32,

    /// Font files (TTF/OTF/TTC) tried before the system CJK fonts and the
    /// built-in font
    #[serde(default)]
    pub fonts: Vec<PathBuf>,
}

fn default_filename() -> String {
    DEFAULT_EXPORT_FILENAME.to_string()
}

fn default_share_title() -> String {
    "マイポケモンチーム".to_string()
}

fn default_hashtags() -> Vec<String> {
    vec![
        "ポケモン".to_string(),
        "好きなポケモン".to_string(),
        "Pokemon".to_string(),
    ]
}

fn default_status_timeout_ms() -> u64 {
    3000
}

fn default_intent_debounce_ms() -> u64 {
    800
}

fn default_scale() -> u32 {
    2
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            default_filename: default_filename(),
            title: default_share_title(),
            hashtags: default_hashtags(),
            link: None,
            status_timeout_ms: default_status_timeout_ms(),
            intent_debounce_ms: default_intent_debounce_ms(),
            scale: default_scale(),
            fonts: Vec::new(),
        }
    }
}

impl ShareConfig {
    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    pub fn intent_debounce(&self) -> Duration {
        Duration::from_millis(self.intent_debounce_ms)
    }
}

impl TeamdexConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::default_config_path()?)
    }

    /// Load configuration from a specific path. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(content)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(self)
    }

    /// Platform config directory (not created)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        directories::ProjectDirs::from("dev", "teamdex", "teamdex")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.yaml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.catalog.base_url;
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "catalog.base_url must start with http:// or https:// (got '{base}')"
            )));
        }
        if self.catalog.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "catalog.batch_size must be at least 1".to_string(),
            ));
        }
        if self.share.scale < 2 {
            return Err(ConfigError::Invalid(format!(
                "share.scale must be at least 2 (got {})",
                self.share.scale
            )));
        }
        if self.share.default_filename.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "share.default_filename must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
