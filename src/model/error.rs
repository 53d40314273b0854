//! Error types for reviewfeed.
//!
//! This module defines a hierarchical error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error wrapping all domain-specific failures
//!   - [`SourceError`] - Review data source failures (file, HTTP, decoding, timeouts)
//!   - [`StoreError`] - Persistent key-value store failures
//!   - `ConfigError` / `LoggingError` - Startup failures
//!   - `std::io::Error` - Terminal/TUI rendering failures
//! - [`ProbeError`] - Image dimension probe failures (never surfaced to the user)
//! - [`ParseError`] - Malformed JSONL lines (logged and skipped)
//!
//! # Error Recovery Strategy
//!
//! Most failures inside the feed are **non-fatal**:
//! - a failed dimension probe resolves to the 1×1 sentinel and is not cached,
//! - a failed page fetch marks the feed exhausted,
//! - a failed cache write leaves the in-memory cache authoritative.
//!
//! Only startup failures (bad config, unreadable review file, broken terminal) propagate to
//! `main`.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The review source could not be created or queried.
    #[error("Review source error: {0}")]
    Source(#[from] SourceError),

    /// The persisted dimension cache could not be opened.
    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),

    /// Terminal, stdout, or runtime I/O error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Layout output could not be serialized.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Errors raised by a review data source.
///
/// Inside the pagination controller these are caught and turn the feed into
/// "no more data"; they only reach the user when the source cannot be built
/// at all.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The review file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use reviewfeed::model::error::SourceError;
    ///
    /// let err = SourceError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// No review file was given and no REST endpoint is configured.
    #[error("No review source: pass --file or configure [source].url")]
    NotConfigured,

    /// Generic I/O error reading the review file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The configured endpoint is not a valid URL.
    #[error("Invalid source URL {url}: {reason}")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Parser error message.
        reason: String,
    },

    /// The response body was not a list of review records.
    #[error("Failed to decode reviews: {reason}")]
    Decode {
        /// Decoder error message.
        reason: String,
    },

    /// The fetch did not complete in time.
    #[error("Fetch timed out after {after_ms}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        after_ms: u64,
    },
}

/// Errors encountered while parsing JSONL review files.
///
/// Non-fatal: the offending line is logged with its line number and skipped.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A line is not a valid review record.
    ///
    /// # Examples
    ///
    /// ```
    /// use reviewfeed::model::error::ParseError;
    ///
    /// let err = ParseError::InvalidJson {
    ///     line: 42,
    ///     message: "missing field `id`".to_string()
    /// };
    /// assert!(err.to_string().contains("line 42"));
    /// ```
    #[error("Invalid review JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number.
        line: usize,
        /// Decoder error message.
        message: String,
    },
}

/// Errors from measuring an image's natural size.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The image server answered with a non-success status.
    #[error("Image server returned status {0}")]
    Status(u16),

    /// Local file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes are not a decodable image.
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// Probe did not finish in time.
    #[error("Probe timed out after {after_ms}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        after_ms: u64,
    },

    /// The URL scheme is not supported by this probe.
    #[error("Unsupported image URL: {0}")]
    UnsupportedUrl(String),

    /// The blocking decode task panicked or was cancelled.
    #[error("Probe task failed: {0}")]
    Task(String),
}

/// Errors from the persistent key-value store backing the dimension cache.
///
/// Writes that fail are logged and ignored; only opening the store at startup
/// is fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store file could not be read or written.
    #[error("Store IO error at {path}: {source}")]
    Io {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Store contents could not be (de)serialized.
    #[error("Store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store refused a new key because it is full.
    #[error("Store quota of {quota} keys exceeded")]
    QuotaExceeded {
        /// Maximum number of keys the store accepts.
        quota: usize,
    },
}
