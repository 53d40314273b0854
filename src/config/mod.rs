//! Configuration module.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_cache_path, default_config_path,
    default_log_path, load_config_file, load_config_with_precedence, merge_config, ConfigError,
    ConfigFile, FeedSection, ResolvedConfig, SourceSection,
};

use std::time::Duration;

/// Pagination and I/O budget settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    /// Records fetched by the first, fast pass.
    pub initial_batch: usize,
    /// Records per page; the first page is `initial_batch` plus the remainder.
    pub page_size: usize,
    /// Distance from the bottom (px) at which the next page is requested.
    pub scroll_threshold: u32,
    /// Upper bound on a single page fetch, in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Upper bound on a single image probe, in milliseconds.
    pub probe_timeout_ms: u64,
    /// Capacity of the dimension cache.
    pub cache_max_entries: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            initial_batch: 10,
            page_size: 20,
            scroll_threshold: 200,
            fetch_timeout_ms: 10_000,
            probe_timeout_ms: 5_000,
            cache_max_entries: 500,
        }
    }
}

impl FeedConfig {
    /// Fetch timeout as a duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Probe timeout as a duration.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Remote review service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Base URL of the Supabase project, e.g. `https://abc.supabase.co`.
    pub url: Option<String>,
    /// Anonymous API key sent as `apikey` and bearer token.
    pub anon_key: Option<String>,
    /// Table holding review rows.
    pub table: String,
    /// Public storage bucket holding review photos.
    pub storage_bucket: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: "reviews".to_string(),
            storage_bucket: "review-photos".to_string(),
        }
    }
}
