//! reviewfeed - Entry Point

use clap::{Parser, Subcommand};
use reviewfeed::config::{ResolvedConfig, SourceConfig};
use reviewfeed::dimensions::{DefaultProbe, DimensionCache, DimensionResolver, JsonFileStore};
use reviewfeed::feed::FeedController;
use reviewfeed::model::{AppError, InvalidPlaceId, PlaceId, SourceError};
use reviewfeed::source::{detect_review_source, PhotoResolver, ReviewQuery, ReviewSourceKind};
use reviewfeed::view::{CardStyles, ColorConfig, FeedAction};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// reviewfeed - two-column masonry feed of restaurant reviews
#[derive(Parser, Debug)]
#[command(name = "reviewfeed")]
#[command(version)]
#[command(about = "Lay out restaurant reviews in a two-column masonry feed")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of the configured one
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Persist image dimensions to this file instead of the configured one
    #[arg(long, global = true)]
    pub cache_path: Option<PathBuf>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Browse the feed in the terminal
    View {
        #[command(flatten)]
        feed: FeedArgs,

        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Lay out the feed headless and print the items as JSON
    Layout {
        #[command(flatten)]
        feed: FeedArgs,

        /// Container width in pixels
        #[arg(long, default_value = "400")]
        width: u32,

        /// Extra pages to load after the first one
        #[arg(long, default_value = "0")]
        pages: usize,
    },

    /// Inspect or empty the persisted dimension cache
    Cache {
        /// Cache operation
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Where reviews come from and which ones to show.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct FeedArgs {
    /// Read reviews from a JSONL file instead of the configured service
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Only reviews of this place
    #[arg(long, value_parser = parse_place_id)]
    pub place: Option<PlaceId>,

    /// Only reviews by this wallet address
    #[arg(long)]
    pub author: Option<String>,
}

impl FeedArgs {
    fn filters(&self) -> ReviewQuery {
        ReviewQuery {
            place_id: self.place.clone(),
            author: self.author.clone(),
            ..ReviewQuery::default()
        }
    }
}

/// Cache subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Show how many dimensions are stored
    Stats,
    /// Remove every stored dimension
    Clear,
}

fn parse_place_id(raw: &str) -> Result<PlaceId, InvalidPlaceId> {
    PlaceId::new(raw)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = reviewfeed::config::load_config_with_precedence(args.config.clone())?;
        let merged = reviewfeed::config::merge_config(config_file);
        let with_env = reviewfeed::config::apply_env_overrides(merged);
        reviewfeed::config::apply_cli_overrides(
            with_env,
            args.log_file.clone(),
            args.cache_path.clone(),
        )
    };
    config.validate()?;

    reviewfeed::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    match args.command {
        Command::View { feed, no_color } => run_view(&config, &feed, no_color)?,
        Command::Layout { feed, width, pages } => run_layout(&config, &feed, width, pages)?,
        Command::Cache { action } => run_cache(&config, action)?,
    }

    Ok(())
}

fn run_view(config: &ResolvedConfig, feed: &FeedArgs, no_color: bool) -> Result<(), AppError> {
    let runtime = build_runtime()?;
    let controller = build_controller(config, feed, 0)?;
    let styles = CardStyles::with_color_config(ColorConfig::from_env_and_args(no_color));

    match reviewfeed::view::run_feed(runtime, controller, styles) {
        Ok(FeedAction::OpenPlace(place)) => {
            info!(place = %place, "Opened place");
            println!("{place}");
            Ok(())
        }
        Ok(FeedAction::Quit) => Ok(()),
        Err(reviewfeed::view::TuiError::Io(e)) => Err(AppError::Terminal(e)),
        Err(reviewfeed::view::TuiError::App(e)) => Err(e),
    }
}

fn run_layout(
    config: &ResolvedConfig,
    feed: &FeedArgs,
    width: u32,
    pages: usize,
) -> Result<(), AppError> {
    let runtime = build_runtime()?;
    let items = runtime.block_on(async {
        let mut controller = build_controller(config, feed, width)?;
        controller.load_initial().await;
        controller.load_first_page_remainder().await;
        for _ in 0..pages {
            if controller.load_more().await == 0 {
                break;
            }
        }
        info!(
            items = controller.items().len(),
            has_more = controller.has_more(),
            "Headless layout finished"
        );
        Ok::<_, AppError>(controller.items().to_vec())
    })?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &items)?;
    writeln!(stdout)?;
    Ok(())
}

fn run_cache(config: &ResolvedConfig, action: CacheAction) -> Result<(), AppError> {
    let store = JsonFileStore::open(&config.cache_path)?;
    let mut cache = DimensionCache::new(config.feed.cache_max_entries);
    let loaded = cache.open(Box::new(store));

    match action {
        CacheAction::Stats => println!(
            "{loaded} cached dimensions (max {}) in {}",
            cache.max_entries(),
            config.cache_path.display()
        ),
        CacheAction::Clear => {
            let removed = cache.clear();
            info!(removed, "Cleared dimension cache");
            println!("Removed {removed} cached dimensions");
        }
    }
    Ok(())
}

fn build_runtime() -> Result<tokio::runtime::Runtime, AppError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// Wire the configured source, cache and probe into a feed controller.
///
/// A cache file that cannot be opened is logged and the cache stays in
/// memory.
fn build_controller(
    config: &ResolvedConfig,
    feed: &FeedArgs,
    container_width: u32,
) -> Result<FeedController<ReviewSourceKind, DefaultProbe>, AppError> {
    let client = reqwest::Client::builder()
        .timeout(config.feed.fetch_timeout())
        .build()
        .map_err(SourceError::Http)?;
    let source = detect_review_source(feed.file.as_deref(), &config.source, &client)?;

    let mut cache = DimensionCache::new(config.feed.cache_max_entries);
    match JsonFileStore::open(&config.cache_path) {
        Ok(store) => {
            let loaded = cache.open(Box::new(store));
            info!(loaded, path = %config.cache_path.display(), "Opened dimension cache");
        }
        Err(e) => warn!(error = %e, "Dimension cache unavailable, keeping it in memory"),
    }

    let resolver = DimensionResolver::new(
        cache,
        DefaultProbe::new(client),
        config.feed.probe_timeout(),
    );

    Ok(FeedController::new(
        source,
        resolver,
        photo_resolver(&config.source, feed.file.as_deref()),
        config.layout,
        config.feed,
        container_width,
    )
    .with_filters(feed.filters()))
}

/// Relative photo paths resolve against the storage service when one is
/// configured; a file source without one keeps them as local paths.
fn photo_resolver(source: &SourceConfig, file: Option<&Path>) -> PhotoResolver {
    match (source.url.as_deref(), file) {
        (None, Some(path)) => PhotoResolver::local(path.parent().unwrap_or(Path::new("."))),
        _ => PhotoResolver::from_config(source),
    }
}
