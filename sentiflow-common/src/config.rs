//! Configuration loading and data root resolution
//!
//! Bootstrap configuration comes from a TOML file. A missing file is not an
//! error: a warning is logged and built-in defaults apply. The data root is
//! resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `SENTIFLOW_DATA_ROOT`
//! 3. TOML `data_root`
//! 4. OS-dependent default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data root
pub const DATA_ROOT_ENV: &str = "SENTIFLOW_DATA_ROOT";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Root folder for buckets and the database (optional)
    #[serde(default)]
    pub data_root: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub enrich: EnrichConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Ingestion service settings
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_ingest_port")]
    pub port: u16,

    /// Directory holding one sub-directory per bucket (default: `<data_root>/buckets`)
    #[serde(default)]
    pub bucket_root: Option<PathBuf>,

    /// Bucket used when a request names none
    #[serde(default = "default_bucket")]
    pub default_bucket: String,

    /// Push endpoint of the enrichment service
    #[serde(default = "default_push_url")]
    pub push_url: String,

    /// Topic name stamped on published envelopes
    #[serde(default = "default_topic")]
    pub topic: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            port: default_ingest_port(),
            bucket_root: None,
            default_bucket: default_bucket(),
            push_url: default_push_url(),
            topic: default_topic(),
        }
    }
}

impl IngestConfig {
    /// Bucket root, relative to the data root unless configured explicitly
    pub fn bucket_root(&self, data_root: &Path) -> PathBuf {
        self.bucket_root
            .clone()
            .unwrap_or_else(|| data_root.join("buckets"))
    }
}

/// Enrichment service settings
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichConfig {
    #[serde(default = "default_enrich_port")]
    pub port: u16,

    /// SQLite database file (default: `<data_root>/sentiflow.db`)
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Upper bound on retrying writes blocked by database locks
    #[serde(default = "default_max_lock_wait_ms")]
    pub max_lock_wait_ms: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            port: default_enrich_port(),
            database: None,
            max_lock_wait_ms: default_max_lock_wait_ms(),
        }
    }
}

impl EnrichConfig {
    pub fn database_path(&self, data_root: &Path) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| data_root.join("sentiflow.db"))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ingest_port() -> u16 {
    5731
}

fn default_enrich_port() -> u16 {
    5732
}

fn default_bucket() -> String {
    "sentiment-raw".to_string()
}

fn default_push_url() -> String {
    "http://127.0.0.1:5732/push".to_string()
}

fn default_topic() -> String {
    "social-media-posts".to_string()
}

fn default_max_lock_wait_ms() -> u64 {
    5000
}

/// Default configuration file location (`<config dir>/sentiflow/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sentiflow").join("config.toml"))
}

/// Load the TOML configuration
///
/// An explicit path that does not exist, or no path and no default file,
/// yields the built-in defaults. A file that exists but does not parse is an
/// error.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            return Ok(TomlConfig::default());
        }
    };

    if !path.exists() {
        tracing::warn!("Config file not found at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Resolve the data root following the priority order in the module docs
pub fn resolve_data_root(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_ROOT_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.data_root {
        return path.clone();
    }

    // Priority 4: OS-dependent default
    default_data_root()
}

/// OS-dependent default data root
pub fn default_data_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("sentiflow"))
        .unwrap_or_else(|| PathBuf::from("./sentiflow_data"))
}
