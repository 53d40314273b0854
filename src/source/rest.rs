//! Supabase PostgREST review source.

use super::{ReviewQuery, ReviewSource};
use crate::model::{ReviewRecord, SourceError};
use reqwest::Url;
use tracing::{debug, warn};

const MAX_ERROR_BODY: usize = 200;

/// Review source backed by `GET {base}/rest/v1/{table}`.
#[derive(Debug, Clone)]
pub struct RestSource {
    client: reqwest::Client,
    endpoint: Url,
    anon_key: Option<String>,
}

impl RestSource {
    /// Source for the project at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidUrl` if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        anon_key: Option<String>,
        table: &str,
        client: reqwest::Client,
    ) -> Result<Self, SourceError> {
        let raw = format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table);
        let endpoint = Url::parse(&raw).map_err(|e| SourceError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            endpoint,
            anon_key,
        })
    }

    /// Full request URL for `query`.
    pub fn request_url(&self, query: &ReviewQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("select", "*")
                .append_pair("order", "created_at.desc")
                .append_pair("limit", &query.limit.to_string())
                .append_pair("offset", &query.offset.to_string());
            if let Some(place) = &query.place_id {
                pairs.append_pair("place_id", &format!("eq.{place}"));
            }
            if let Some(author) = &query.author {
                pairs.append_pair("wallet_address", &format!("eq.{author}"));
            }
        }
        url
    }
}

/// Decode a PostgREST response body into records.
///
/// Rows that do not form a valid record are logged and dropped.
///
/// # Errors
///
/// Returns `SourceError::Decode` if the body is not a JSON array.
pub fn decode_page(body: &str) -> Result<Vec<ReviewRecord>, SourceError> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| SourceError::Decode {
            reason: e.to_string(),
        })?;

    Ok(rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(row = index, error = %e, "Dropping malformed review row");
                None
            }
        })
        .collect())
}

impl ReviewSource for RestSource {
    async fn list_reviews(&self, query: &ReviewQuery) -> Result<Vec<ReviewRecord>, SourceError> {
        let url = self.request_url(query);
        debug!(%url, "Fetching reviews");

        let mut request = self.client.get(url);
        if let Some(key) = &self.anon_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        decode_page(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlaceId;

    fn source() -> RestSource {
        RestSource::new(
            "https://abc.supabase.co/",
            Some("anon".to_string()),
            "reviews",
            reqwest::Client::new(),
        )
        .unwrap()
    }

    #[test]
    fn request_url_orders_newest_first_and_paginates() {
        let url = source().request_url(&ReviewQuery::page(20, 10));
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/rest/v1/reviews?select=*&order=created_at.desc&limit=10&offset=20"
        );
    }

    #[test]
    fn request_url_adds_equality_filters() {
        let query = ReviewQuery {
            place_id: Some(PlaceId::new("ChIJ123").unwrap()),
            author: Some("0xabc".to_string()),
            ..ReviewQuery::page(0, 20)
        };
        let url = source().request_url(&query);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(pairs.contains(&("place_id".to_string(), "eq.ChIJ123".to_string())));
        assert!(pairs.contains(&("wallet_address".to_string(), "eq.0xabc".to_string())));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = RestSource::new("not a url", None, "reviews", reqwest::Client::new());
        assert!(matches!(result, Err(SourceError::InvalidUrl { .. })));
    }

    #[test]
    fn decode_page_drops_bad_rows() {
        let body = r#"[
            {"id":"r1","wallet_address":"0xabc","created_at":"2025-01-01T00:00:00Z"},
            {"id":"r2"}
        ]"#;
        let records = decode_page(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "r1");
    }

    #[test]
    fn decode_page_keeps_rows_with_null_columns() {
        let body = r#"[
            {"id":"r1","wallet_address":"0xabc","created_at":"2025-01-01T00:00:00Z",
             "content":"great pho","photos":null,"likes_count":3},
            {"id":"r2","wallet_address":"0xdef","created_at":"2025-01-01T00:00:00Z",
             "photos":["a.jpg"],"likes_count":null}
        ]"#;
        let records = decode_page(body).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].photos.is_empty());
        assert_eq!(records[0].body(), Some("great pho"));
        assert_eq!(records[1].likes_count, 0);
        assert_eq!(records[1].photos.len(), 1);
    }

    #[test]
    fn decode_page_rejects_non_array_body() {
        let err = decode_page(r#"{"message":"JWT expired"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }));
    }
}
