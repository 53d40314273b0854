//! Review data sources.
//!
//! This module provides the paginated "list reviews" query:
//! - [`MemorySource`] over an in-memory list, also built from JSONL files
//! - [`RestSource`] against a Supabase PostgREST endpoint
//! - [`ReviewSourceKind`] unifying both
//!
//! and [`PhotoResolver`], which turns photo descriptors into display URLs.

use crate::config::SourceConfig;
use crate::model::{PlaceId, ReviewRecord, SourceError};
use std::future::Future;
use std::path::Path;

pub mod file;
pub mod memory;
pub mod photo;
pub mod rest;

pub use file::load_jsonl;
pub use memory::MemorySource;
pub use photo::PhotoResolver;
pub use rest::RestSource;

/// Parameters of one page request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewQuery {
    /// Only reviews of this place.
    pub place_id: Option<PlaceId>,
    /// Only reviews by this wallet.
    pub author: Option<String>,
    /// Maximum number of records.
    pub limit: usize,
    /// Records to skip, newest first.
    pub offset: usize,
}

impl ReviewQuery {
    /// Unfiltered query for one page.
    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }
}

/// Paginated source of review records ordered newest first.
pub trait ReviewSource: Send + Sync {
    /// Fetch up to `query.limit` records starting at `query.offset`.
    fn list_reviews(
        &self,
        query: &ReviewQuery,
    ) -> impl Future<Output = Result<Vec<ReviewRecord>, SourceError>> + Send;
}

/// Unified review source.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum ReviewSourceKind {
    /// Records loaded up front (JSONL file or fixtures).
    Memory(MemorySource),
    /// Remote PostgREST endpoint.
    Rest(RestSource),
}

impl ReviewSource for ReviewSourceKind {
    async fn list_reviews(&self, query: &ReviewQuery) -> Result<Vec<ReviewRecord>, SourceError> {
        match self {
            ReviewSourceKind::Memory(source) => source.list_reviews(query).await,
            ReviewSourceKind::Rest(source) => source.list_reviews(query).await,
        }
    }
}

/// Detect and create the appropriate review source.
///
/// # Logic:
/// 1. If a file path is provided: load it as JSONL
/// 2. If `[source].url` is configured: query the REST endpoint
/// 3. Else: `SourceError::NotConfigured`
///
/// # Errors
///
/// Returns `SourceError::FileNotFound` if the file does not exist,
/// `SourceError::InvalidUrl` for an unusable endpoint, and
/// `SourceError::NotConfigured` when neither is available.
pub fn detect_review_source(
    file: Option<&Path>,
    config: &SourceConfig,
    client: &reqwest::Client,
) -> Result<ReviewSourceKind, SourceError> {
    if let Some(path) = file {
        return Ok(ReviewSourceKind::Memory(load_jsonl(path)?));
    }

    match config.url.as_deref() {
        Some(url) if !url.trim().is_empty() => Ok(ReviewSourceKind::Rest(RestSource::new(
            url,
            config.anon_key.clone(),
            &config.table,
            client.clone(),
        )?)),
        _ => Err(SourceError::NotConfigured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_takes_precedence_over_configured_endpoint() {
        let path = std::env::temp_dir().join("reviewfeed_detect_file.jsonl");
        fs::write(
            &path,
            r#"{"id":"r1","wallet_address":"0xabc","created_at":"2025-01-01T00:00:00Z"}
"#,
        )
        .unwrap();

        let config = SourceConfig {
            url: Some("https://abc.supabase.co".to_string()),
            ..SourceConfig::default()
        };
        let source = detect_review_source(Some(&path), &config, &reqwest::Client::new()).unwrap();
        let _ = fs::remove_file(&path);

        assert!(
            matches!(source, ReviewSourceKind::Memory(_)),
            "Should be Memory variant, got: {:?}",
            source
        );
    }

    #[test]
    fn configured_url_yields_rest_source() {
        let config = SourceConfig {
            url: Some("https://abc.supabase.co".to_string()),
            ..SourceConfig::default()
        };
        let source = detect_review_source(None, &config, &reqwest::Client::new()).unwrap();
        assert!(matches!(source, ReviewSourceKind::Rest(_)));
    }

    #[test]
    fn nothing_configured_is_an_error() {
        let result = detect_review_source(None, &SourceConfig::default(), &reqwest::Client::new());
        assert!(matches!(result, Err(SourceError::NotConfigured)));
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let missing = std::env::temp_dir().join("reviewfeed_nonexistent_12345.jsonl");
        let result = detect_review_source(
            Some(&missing),
            &SourceConfig::default(),
            &reqwest::Client::new(),
        );

        match result {
            Err(SourceError::FileNotFound { path }) => assert_eq!(path, missing),
            other => panic!("Expected FileNotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn memory_variant_delegates_queries() {
        let source = ReviewSourceKind::Memory(MemorySource::default());
        let page = source.list_reviews(&ReviewQuery::page(0, 10)).await.unwrap();
        assert!(page.is_empty());
    }
}
