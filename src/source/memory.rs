//! In-memory review source.

use super::{ReviewQuery, ReviewSource};
use crate::model::{ReviewRecord, SourceError};
use tracing::trace;

/// Review source over a fixed list of records.
///
/// Records are kept newest first (stable for equal timestamps), matching the
/// remote query's `created_at.desc` ordering.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<ReviewRecord>,
}

impl MemorySource {
    /// Source over `records`, reordered newest first.
    pub fn new(mut records: Vec<ReviewRecord>) -> Self {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { records }
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the source holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching the query's filters, ignoring pagination.
    fn matching<'a>(&'a self, query: &'a ReviewQuery) -> impl Iterator<Item = &'a ReviewRecord> {
        self.records.iter().filter(move |record| {
            let place_ok = query
                .place_id
                .as_ref()
                .is_none_or(|place| record.place_id.as_ref() == Some(place));
            let author_ok = query
                .author
                .as_deref()
                .is_none_or(|author| record.wallet_address.eq_ignore_ascii_case(author));
            place_ok && author_ok
        })
    }
}

impl ReviewSource for MemorySource {
    async fn list_reviews(&self, query: &ReviewQuery) -> Result<Vec<ReviewRecord>, SourceError> {
        let page: Vec<ReviewRecord> = self
            .matching(query)
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();
        trace!(
            offset = query.offset,
            limit = query.limit,
            returned = page.len(),
            "Served page from memory"
        );
        Ok(page)
    }
}
