//! Configuration file loading with precedence handling.

use super::{FeedConfig, SourceConfig};
use crate::layout::LayoutParams;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "REVIEWFEED_CONFIG";
/// Env var overriding `[source].url`.
pub const SUPABASE_URL_ENV: &str = "REVIEWFEED_SUPABASE_URL";
/// Env var overriding `[source].anon_key`.
pub const SUPABASE_KEY_ENV: &str = "REVIEWFEED_SUPABASE_KEY";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is unusable.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted key of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/reviewfeed/config.toml`.
///
/// ```toml
/// log_file_path = "/tmp/reviewfeed.log"
///
/// [layout]
/// column_width = 180
///
/// [feed]
/// page_size = 30
///
/// [source]
/// url = "https://abc.supabase.co"
/// anon_key = "..."
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Path of the persisted dimension cache.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,

    /// Grid constants; missing keys keep their defaults.
    #[serde(default)]
    pub layout: Option<LayoutParams>,

    /// Pagination and timeout settings.
    #[serde(default)]
    pub feed: Option<FeedSection>,

    /// Remote review service.
    #[serde(default)]
    pub source: Option<SourceSection>,
}

/// `[feed]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FeedSection {
    /// Records in the first fast pass.
    #[serde(default)]
    pub initial_batch: Option<usize>,
    /// Records per page.
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Bottom distance (px) that triggers the next page.
    #[serde(default)]
    pub scroll_threshold: Option<u32>,
    /// Page fetch timeout in milliseconds.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
    /// Image probe timeout in milliseconds.
    #[serde(default)]
    pub probe_timeout_ms: Option<u64>,
    /// Dimension cache capacity.
    #[serde(default)]
    pub cache_max_entries: Option<usize>,
}

/// `[source]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    /// Supabase project URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Anonymous API key.
    #[serde(default)]
    pub anon_key: Option<String>,
    /// Review table name.
    #[serde(default)]
    pub table: Option<String>,
    /// Photo storage bucket.
    #[serde(default)]
    pub storage_bucket: Option<String>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Path of the persisted dimension cache.
    pub cache_path: PathBuf,
    /// Grid constants.
    pub layout: LayoutParams,
    /// Pagination and timeouts.
    pub feed: FeedConfig,
    /// Remote review service.
    pub source: SourceConfig,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            log_file_path: default_log_path(),
            cache_path: default_cache_path(),
            layout: LayoutParams::default(),
            feed: FeedConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

impl ResolvedConfig {
    /// Reject values that would stall pagination or break the grid.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero page size, a first
    /// batch larger than a page, or layout constants that would make cards
    /// overlap or collapse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_layout(&self.layout)?;
        if self.feed.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.feed.initial_batch == 0 || self.feed.initial_batch > self.feed.page_size {
            return Err(ConfigError::InvalidValue {
                field: "feed.initial_batch",
                reason: format!("must be between 1 and page_size ({})", self.feed.page_size),
            });
        }
        Ok(())
    }
}

fn validate_layout(layout: &LayoutParams) -> Result<(), ConfigError> {
    let sizes = [
        ("layout.column_width", layout.column_width),
        ("layout.wide_height", layout.wide_height),
        ("layout.tall_height", layout.tall_height),
        ("layout.square_size", layout.square_size),
    ];
    for (field, value) in sizes {
        if value == 0 {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "must be at least 1".to_string(),
            });
        }
    }
    if layout.square_size > layout.column_width {
        return Err(ConfigError::InvalidValue {
            field: "layout.square_size",
            reason: format!("must not exceed column_width ({})", layout.column_width),
        });
    }
    if layout.min_fill == 0 {
        return Err(ConfigError::InvalidValue {
            field: "layout.min_fill",
            reason: "must be at least 1".to_string(),
        });
    }
    if !(layout.tall_ratio.is_finite() && layout.tall_ratio > 0.0) {
        return Err(ConfigError::InvalidValue {
            field: "layout.tall_ratio",
            reason: "must be a positive number".to_string(),
        });
    }
    if !layout.wide_ratio.is_finite() || layout.wide_ratio < layout.tall_ratio {
        return Err(ConfigError::InvalidValue {
            field: "layout.wide_ratio",
            reason: format!("must be at least tall_ratio ({})", layout.tall_ratio),
        });
    }
    Ok(())
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/reviewfeed/reviewfeed.log` on Linux, or the
/// platform equivalent. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("reviewfeed").join("reviewfeed.log")
    } else {
        PathBuf::from("reviewfeed.log")
    }
}

/// Resolve default dimension cache path under the platform cache dir.
pub fn default_cache_path() -> PathBuf {
    if let Some(cache_dir) = dirs::cache_dir() {
        cache_dir.join("reviewfeed").join("dimensions.json")
    } else {
        PathBuf::from("reviewfeed-dimensions.json")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/reviewfeed/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reviewfeed").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `REVIEWFEED_CONFIG` environment variable
/// 3. Default path `~/.config/reviewfeed/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// `REVIEWFEED_SUPABASE_URL` and `REVIEWFEED_SUPABASE_KEY` replace the
/// source endpoint and key so secrets can stay out of the config file.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(url) = std::env::var(SUPABASE_URL_ENV) {
        config.source.url = Some(url);
    }
    if let Ok(key) = std::env::var(SUPABASE_KEY_ENV) {
        config.source.anon_key = Some(key);
    }
    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let feed = config.feed.unwrap_or_default();
    let source = config.source.unwrap_or_default();

    ResolvedConfig {
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        cache_path: config.cache_path.unwrap_or(defaults.cache_path),
        layout: config.layout.unwrap_or(defaults.layout),
        feed: FeedConfig {
            initial_batch: feed.initial_batch.unwrap_or(defaults.feed.initial_batch),
            page_size: feed.page_size.unwrap_or(defaults.feed.page_size),
            scroll_threshold: feed
                .scroll_threshold
                .unwrap_or(defaults.feed.scroll_threshold),
            fetch_timeout_ms: feed
                .fetch_timeout_ms
                .unwrap_or(defaults.feed.fetch_timeout_ms),
            probe_timeout_ms: feed
                .probe_timeout_ms
                .unwrap_or(defaults.feed.probe_timeout_ms),
            cache_max_entries: feed
                .cache_max_entries
                .unwrap_or(defaults.feed.cache_max_entries),
        },
        source: SourceConfig {
            url: source.url.or(defaults.source.url),
            anon_key: source.anon_key.or(defaults.source.anon_key),
            table: source.table.unwrap_or(defaults.source.table),
            storage_bucket: source
                .storage_bucket
                .unwrap_or(defaults.source.storage_bucket),
        },
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    log_file_override: Option<PathBuf>,
    cache_path_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(path) = log_file_override {
        config.log_file_path = path;
    }
    if let Some(path) = cache_path_override {
        config.cache_path = path;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
