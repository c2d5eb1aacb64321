//! Configuration for the sync core.

use crate::{ConfigError, ConfigResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default page size for paginated synchronization.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Page size used when walking every page of product attribute terms.
pub const DEFAULT_ATTRIBUTE_TERMS_PAGE_SIZE: usize = 100;

/// Default number of concurrent remote fetches in a fan-out.
const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines on stderr.
    #[default]
    Pretty,
    /// One JSON object per line on stderr.
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" | "jsonl" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Main sync-core configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
    /// Page size for paginated syncs.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Page size for attribute term syncs.
    #[serde(default = "default_attribute_terms_page_size")]
    pub attribute_terms_page_size: usize,
    /// Upper bound on concurrent fetches issued by a fan-out.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// Cache database location. Falls back to `Paths::database_file()`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_attribute_terms_page_size() -> usize {
    DEFAULT_ATTRIBUTE_TERMS_PAGE_SIZE
}

fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            page_size: DEFAULT_PAGE_SIZE,
            attribute_terms_page_size: DEFAULT_ATTRIBUTE_TERMS_PAGE_SIZE,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            database_path: None,
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> ConfigResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Resolve the cache database path.
    pub fn database_file(&self, paths: &Paths) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| paths.database_file())
    }

    /// Reject values the sync loops cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be positive".to_string()));
        }
        if self.attribute_terms_page_size == 0 {
            return Err(ConfigError::Invalid(
                "attribute_terms_page_size must be positive".to_string(),
            ));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_fetches must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Override logging options from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("STOREFRONT_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Some(format) = std::env::var("STOREFRONT_LOG_FORMAT")
            .ok()
            .and_then(|raw| LogFormat::parse(&raw))
        {
            self.log_format = format;
        }
    }
}
