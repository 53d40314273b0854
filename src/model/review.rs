//! Raw review records as delivered by the data source.

use super::identifiers::{PlaceId, ReviewId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One review row from the "list reviews" query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Source id.
    pub id: ReviewId,
    /// Author wallet identifier.
    #[serde(alias = "author", alias = "user_address")]
    pub wallet_address: String,
    /// Review body text.
    #[serde(default, alias = "text", alias = "body")]
    pub content: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Number of likes.
    #[serde(default, alias = "likes", deserialize_with = "null_as_default")]
    pub likes_count: u32,
    /// Attached photos, in upload order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<PhotoDescriptor>,
    /// Place the review is attached to.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub place_id: Option<PlaceId>,
    /// Denormalised author display name.
    #[serde(default)]
    pub author_name: Option<String>,
    /// Denormalised author avatar URL.
    #[serde(default)]
    pub author_avatar: Option<String>,
}

impl ReviewRecord {
    /// Body text with surrounding whitespace removed, `None` when blank.
    pub fn body(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// First attached photo, if any.
    pub fn first_photo(&self) -> Option<&PhotoDescriptor> {
        self.photos.first()
    }

    /// Name shown on the card: the author name, or a shortened wallet.
    pub fn display_name(&self) -> String {
        match self.author_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => shorten_wallet(&self.wallet_address),
        }
    }
}

/// Shorten a wallet address to `0x1234…abcd`.
///
/// Addresses of ten characters or fewer are returned unchanged.
pub fn shorten_wallet(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

/// Photo attached to a review.
///
/// The data source has delivered photos in several shapes over time; all of
/// them are accepted here and turned into a display URL by
/// [`crate::source::PhotoResolver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhotoDescriptor {
    /// Bare string: an absolute URL or a storage object path.
    Bare(String),
    /// Object form with an explicit URL and/or storage path.
    Stored {
        /// Public URL, when the row already carries one.
        #[serde(default, alias = "photo_url", alias = "public_url")]
        url: Option<String>,
        /// Object path inside the storage bucket.
        #[serde(default, alias = "storage_path", alias = "file_path")]
        path: Option<String>,
    },
    /// Anything else; never resolvable.
    Other(serde_json::Value),
}

/// Nullable columns arrive as an explicit `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<PlaceId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.trim().is_empty() => PlaceId::new(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
