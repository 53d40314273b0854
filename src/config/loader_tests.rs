//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

/// Removes an env var on drop so a failing test cannot leak it.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        Self(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
fn default_config_path_points_into_reviewfeed_dir() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("reviewfeed") && path_str.ends_with("config.toml"),
        "Path should contain 'reviewfeed' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_and_cache_paths_are_named_for_the_app() {
    assert!(default_log_path()
        .to_string_lossy()
        .ends_with("reviewfeed.log"));
    assert!(default_cache_path()
        .to_string_lossy()
        .ends_with("dimensions.json"));
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_every_section() {
    let config_path = env::temp_dir().join("reviewfeed_test_config.toml");

    let toml_content = r#"
log_file_path = "/tmp/rf.log"
cache_path = "/tmp/rf-dims.json"

[layout]
column_width = 180
min_fill = 24

[feed]
page_size = 30
probe_timeout_ms = 750

[source]
url = "https://abc.supabase.co"
table = "place_reviews"
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.log_file_path, Some(PathBuf::from("/tmp/rf.log")));
    let layout = config.layout.expect("layout section");
    assert_eq!(layout.column_width, 180);
    assert_eq!(layout.min_fill, 24);
    assert_eq!(layout.item_gap, 16, "unspecified keys keep defaults");

    let feed = config.feed.expect("feed section");
    assert_eq!(feed.page_size, Some(30));
    assert_eq!(feed.probe_timeout_ms, Some(750));
    assert_eq!(feed.initial_batch, None);

    let source = config.source.expect("source section");
    assert_eq!(source.url.as_deref(), Some("https://abc.supabase.co"));
    assert_eq!(source.table.as_deref(), Some("place_reviews"));

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("reviewfeed_test_invalid.toml");
    fs::write(&config_path, "this is not [valid toml").expect("Failed to write test config");

    let result = load_config_file(&config_path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Invalid TOML should return ParseError, got: {:?}",
        result
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn unknown_keys_are_rejected() {
    let config_path = env::temp_dir().join("reviewfeed_test_unknown.toml");
    fs::write(&config_path, "[feed]\npage_sise = 3\n").expect("Failed to write test config");

    let result = load_config_file(&config_path);
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));

    fs::remove_file(config_path).ok();
}

#[test]
fn merge_config_without_file_yields_defaults() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_applies_partial_sections() {
    let file = ConfigFile {
        log_file_path: None,
        cache_path: Some(PathBuf::from("/var/cache/dims.json")),
        layout: None,
        feed: Some(FeedSection {
            initial_batch: Some(5),
            ..FeedSection::default()
        }),
        source: Some(SourceSection {
            storage_bucket: Some("photos".to_string()),
            ..SourceSection::default()
        }),
    };

    let resolved = merge_config(Some(file));

    assert_eq!(resolved.cache_path, PathBuf::from("/var/cache/dims.json"));
    assert_eq!(resolved.feed.initial_batch, 5);
    assert_eq!(resolved.feed.page_size, 20);
    assert_eq!(resolved.source.storage_bucket, "photos");
    assert_eq!(resolved.source.table, "reviews");
    assert_eq!(resolved.log_file_path, default_log_path());
}

#[test]
fn validate_rejects_initial_batch_larger_than_page() {
    let mut config = ResolvedConfig::default();
    config.feed.initial_batch = 25;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            field: "feed.initial_batch",
            ..
        })
    ));

    config.feed.initial_batch = 10;
    assert!(config.validate().is_ok());

    config.feed.page_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_accepts_default_layout() {
    assert!(ResolvedConfig::default().validate().is_ok());
}

#[test]
fn validate_rejects_square_cards_wider_than_a_column() {
    let mut config = ResolvedConfig::default();
    config.layout.square_size = 300;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            field: "layout.square_size",
            ..
        })
    ));

    config.layout.square_size = config.layout.column_width;
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_zero_min_fill() {
    let mut config = ResolvedConfig::default();
    config.layout.min_fill = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            field: "layout.min_fill",
            ..
        })
    ));
}

#[test]
fn validate_rejects_zero_card_sizes() {
    for field in [
        "layout.column_width",
        "layout.wide_height",
        "layout.tall_height",
        "layout.square_size",
    ] {
        let mut config = ResolvedConfig::default();
        match field {
            "layout.column_width" => config.layout.column_width = 0,
            "layout.wide_height" => config.layout.wide_height = 0,
            "layout.tall_height" => config.layout.tall_height = 0,
            _ => config.layout.square_size = 0,
        }
        match config.validate() {
            Err(ConfigError::InvalidValue { field: got, .. }) => assert_eq!(got, field),
            other => panic!("{field}: expected InvalidValue, got {other:?}"),
        }
    }
}

#[test]
fn validate_rejects_inverted_or_non_positive_ratios() {
    let mut config = ResolvedConfig::default();
    config.layout.tall_ratio = 2.0;
    config.layout.wide_ratio = 1.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            field: "layout.wide_ratio",
            ..
        })
    ));

    config.layout.tall_ratio = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            field: "layout.tall_ratio",
            ..
        })
    ));

    config.layout.tall_ratio = 1.0;
    config.layout.wide_ratio = 1.0;
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_layout_table_from_file() {
    let file: ConfigFile = toml::from_str(
        r#"
[layout]
square_size = 300
min_fill = 0
"#,
    )
    .unwrap();
    let config = merge_config(Some(file));
    assert!(config.validate().is_err());
}

#[test]
#[serial(reviewfeed_env)]
fn apply_env_overrides_replaces_endpoint_and_key() {
    let _url = EnvGuard::new(SUPABASE_URL_ENV);
    let _key = EnvGuard::new(SUPABASE_KEY_ENV);

    env::set_var(SUPABASE_URL_ENV, "https://env.supabase.co");
    env::set_var(SUPABASE_KEY_ENV, "secret");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(result.source.url.as_deref(), Some("https://env.supabase.co"));
    assert_eq!(result.source.anon_key.as_deref(), Some("secret"));
    assert_eq!(result.source.table, "reviews");
}

#[test]
#[serial(reviewfeed_env)]
fn apply_env_overrides_no_change_when_env_vars_not_set() {
    let _url = EnvGuard::new(SUPABASE_URL_ENV);
    let _key = EnvGuard::new(SUPABASE_KEY_ENV);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(reviewfeed_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);

    let temp_dir = env::temp_dir();
    let explicit_path = temp_dir.join("reviewfeed_explicit.toml");
    fs::write(&explicit_path, "cache_path = \"/explicit\"\n").expect("write explicit config");

    let env_path = temp_dir.join("reviewfeed_env.toml");
    fs::write(&env_path, "cache_path = \"/from-env\"\n").expect("write env config");
    env::set_var(CONFIG_ENV, env_path.to_str().unwrap());

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(
        config.cache_path,
        Some(PathBuf::from("/explicit")),
        "Should use explicit path, not REVIEWFEED_CONFIG"
    );

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(reviewfeed_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);

    let env_path = env::temp_dir().join("reviewfeed_env_only.toml");
    fs::write(&env_path, "cache_path = \"/from-env\"\n").expect("write env config");
    env::set_var(CONFIG_ENV, env_path.to_str().unwrap());

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(config.cache_path, Some(PathBuf::from("/from-env")));

    fs::remove_file(env_path).ok();
}

#[test]
fn apply_cli_overrides_wins_over_everything() {
    let base = ResolvedConfig::default();
    let result = apply_cli_overrides(
        base.clone(),
        Some(PathBuf::from("/tmp/cli.log")),
        None,
    );

    assert_eq!(result.log_file_path, PathBuf::from("/tmp/cli.log"));
    assert_eq!(result.cache_path, base.cache_path);
}
