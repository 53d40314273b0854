//! Image probes: measure an image's natural size from its URL.
//!
//! Only the header is decoded; pixel data is never materialized.

use crate::model::{Dimensions, ProbeError};
use std::future::Future;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::trace;

/// Asynchronously measures the natural size of the image at a URL.
pub trait ImageProbe: Send + Sync {
    /// Natural width and height of the image at `url`.
    fn probe(&self, url: &str) -> impl Future<Output = Result<Dimensions, ProbeError>> + Send;
}

/// Read width and height from encoded image bytes.
///
/// # Errors
///
/// Returns `ProbeError::Decode` when the format is unknown or the header is
/// truncated.
pub fn dimensions_from_bytes(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(Dimensions::new(width, height))
}

/// Probe for `http://` and `https://` URLs.
#[derive(Debug, Clone, Default)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Probe sharing an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ImageProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<Dimensions, ProbeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        trace!(url, len = bytes.len(), "Fetched image bytes");
        dimensions_from_bytes(&bytes)
    }
}

/// Probe for local files, given as `file://` URLs or plain paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileProbe;

impl ImageProbe for FileProbe {
    async fn probe(&self, url: &str) -> Result<Dimensions, ProbeError> {
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        let (width, height) = tokio::task::spawn_blocking(move || image::image_dimensions(path))
            .await
            .map_err(|e| ProbeError::Task(e.to_string()))??;
        Ok(Dimensions::new(width, height))
    }
}

/// Dispatches to [`HttpProbe`] or [`FileProbe`] by URL scheme.
#[derive(Debug, Clone, Default)]
pub struct DefaultProbe {
    http: HttpProbe,
    file: FileProbe,
}

impl DefaultProbe {
    /// Probe using `client` for remote images.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            http: HttpProbe::with_client(client),
            file: FileProbe,
        }
    }
}

impl ImageProbe for DefaultProbe {
    async fn probe(&self, url: &str) -> Result<Dimensions, ProbeError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.http.probe(url).await
        } else if url.starts_with("file://") || !url.contains("://") {
            self.file.probe(url).await
        } else {
            Err(ProbeError::UnsupportedUrl(url.to_string()))
        }
    }
}
