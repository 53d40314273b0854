//! Photo descriptor → display URL.

use crate::config::SourceConfig;
use crate::model::PhotoDescriptor;
use std::path::Path;

/// Resolves photo descriptors against the public storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhotoResolver {
    storage_base: Option<String>,
    bucket: String,
    local_root: Option<String>,
}

impl PhotoResolver {
    /// Resolver for storage objects under `{storage_base}/storage/v1/object/public/{bucket}`.
    ///
    /// Without a base only absolute URLs and local paths resolve.
    pub fn new(storage_base: Option<String>, bucket: impl Into<String>) -> Self {
        Self {
            storage_base: storage_base.map(|base| base.trim_end_matches('/').to_string()),
            bucket: bucket.into(),
            local_root: None,
        }
    }

    /// Resolver for a review file whose relative photo paths are relative
    /// to `dir`.
    pub fn local(dir: &Path) -> Self {
        let root = dir.display().to_string();
        Self {
            storage_base: None,
            bucket: String::new(),
            local_root: Some(if root.is_empty() { ".".to_string() } else { root }),
        }
    }

    /// Resolver matching the configured source.
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.url.clone(), config.storage_bucket.clone())
    }

    /// Display URL for `photo`, or `None` when it cannot be resolved.
    pub fn resolve(&self, photo: &PhotoDescriptor) -> Option<String> {
        match photo {
            PhotoDescriptor::Bare(value) => self.resolve_str(value),
            PhotoDescriptor::Stored { url, path } => url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .or_else(|| path.as_deref().and_then(|p| self.storage_url(p))),
            PhotoDescriptor::Other(_) => None,
        }
    }

    fn resolve_str(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else if is_absolute(value) {
            Some(value.to_string())
        } else {
            self.storage_url(value)
        }
    }

    fn storage_url(&self, path: &str) -> Option<String> {
        let path = path.trim().trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        if let Some(root) = &self.local_root {
            return Some(format!("{}/{path}", root.trim_end_matches('/')));
        }
        let base = self.storage_base.as_deref()?;
        Some(format!(
            "{base}/storage/v1/object/public/{}/{path}",
            self.bucket
        ))
    }
}

fn is_absolute(value: &str) -> bool {
    value.starts_with("http://")
        || value.starts_with("https://")
        || value.starts_with("file://")
        || value.starts_with('/')
}
