//! Tests for pagination state transitions.

use super::*;
use crate::model::{FeedItemId, FeedItemKind, Rect, Span};
use chrono::{TimeZone, Utc};

// ===== Test Helpers =====

fn state() -> FeedState {
    FeedState::new(400, LayoutParams::default(), FeedConfig::default())
}

fn record(id: &str) -> ReviewRecord {
    ReviewRecord {
        id: ReviewId::new(id).expect("valid id"),
        wallet_address: "0xabc".to_string(),
        content: Some("text".to_string()),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        likes_count: 0,
        photos: Vec::new(),
        place_id: None,
        author_name: None,
        author_avatar: None,
    }
}

fn records(range: std::ops::Range<usize>) -> Vec<ReviewRecord> {
    range.map(|i| record(&format!("r{i}"))).collect()
}

fn card(id: &str, span: Span, rect: Rect) -> FeedItem {
    FeedItem {
        id: FeedItemId::text(&ReviewId::new(id).unwrap()),
        kind: FeedItemKind::Text,
        card: None,
        image_url: None,
        text: Some("text".to_string()),
        author: "a".to_string(),
        author_avatar: None,
        likes: 0,
        rect,
        span,
        place_id: None,
    }
}

// ===== begin =====

#[test]
fn initial_request_asks_for_first_batch() {
    let mut state = state();
    let request = state.begin(FetchKind::Initial).expect("granted");

    assert_eq!(request.offset, 0);
    assert_eq!(request.limit, 10);
    assert!(state.is_loading());
}

#[test]
fn concurrent_fetch_is_refused() {
    let mut state = state();
    state.begin(FetchKind::Initial).expect("granted");

    assert_eq!(state.begin(FetchKind::Scroll), None);
}

#[test]
fn background_request_completes_the_first_page() {
    let mut state = state();
    let initial = state.begin(FetchKind::Initial).unwrap();
    state.complete(initial, Ok(records(0..10)));

    let background = state.begin(FetchKind::Background).expect("granted");
    assert_eq!(background.offset, 10);
    assert_eq!(background.limit, 10);
}

#[test]
fn initial_is_refused_once_records_exist() {
    let mut state = state();
    let initial = state.begin(FetchKind::Initial).unwrap();
    state.complete(initial, Ok(records(0..10)));

    assert_eq!(state.begin(FetchKind::Initial), None);
}

// ===== complete =====

#[test]
fn short_page_exhausts_the_feed() {
    let mut state = state();
    let initial = state.begin(FetchKind::Initial).unwrap();
    let fresh = state.complete(initial, Ok(records(0..4)));

    assert_eq!(fresh.len(), 4);
    assert!(!state.has_more());
    assert_eq!(state.begin(FetchKind::Background), None);
}

#[test]
fn duplicates_are_dropped_but_full_page_keeps_feed_open() {
    let mut state = state();
    let initial = state.begin(FetchKind::Initial).unwrap();
    state.complete(initial, Ok(records(0..10)));
    let background = state.begin(FetchKind::Background).unwrap();
    state.complete(background, Ok(records(10..20)));

    let scroll = state.begin(FetchKind::Scroll).unwrap();
    assert_eq!(scroll.offset, 20);
    // The source shifted by five: five known ids, fifteen new.
    let fresh = state.complete(scroll, Ok(records(15..35)));

    assert_eq!(fresh.len(), 15);
    assert_eq!(fresh[0].id.as_str(), "r20");
    assert!(state.has_more());
    assert_eq!(state.records().len(), 35);
    assert_eq!(state.fetched(), 40);
}

#[test]
fn page_of_only_duplicates_exhausts_the_feed() {
    let mut state = state();
    let initial = state.begin(FetchKind::Initial).unwrap();
    state.complete(initial, Ok(records(0..10)));

    let background = state.begin(FetchKind::Background).unwrap();
    let fresh = state.complete(background, Ok(records(0..10)));

    assert!(fresh.is_empty());
    assert!(!state.has_more());
}

#[test]
fn error_exhausts_the_feed_and_clears_loading() {
    let mut state = state();
    let initial = state.begin(FetchKind::Initial).unwrap();
    let fresh = state.complete(initial, Err(SourceError::Timeout { after_ms: 10 }));

    assert!(fresh.is_empty());
    assert!(!state.is_loading());
    assert!(!state.has_more());
}

// ===== seed / append / reset =====

#[test]
fn seeds_follow_fetch_kind() {
    let mut state = state();
    assert_eq!(state.seed(FetchKind::Initial), ColumnState::new(20, 20));

    state.append(LayoutPass {
        items: vec![
            card("a", Span::Left, Rect::new(32, 20, 160, 240)),
            card("b", Span::Right, Rect::new(208, 20, 160, 160)),
        ],
        end: ColumnState::new(276, 196),
        placeholders: Vec::new(),
    });

    assert_eq!(state.seed(FetchKind::Background), ColumnState::new(276, 196));
    assert_eq!(state.seed(FetchKind::Scroll), ColumnState::new(276, 196));
    assert_eq!(state.content_height(), 276);
}

#[test]
fn append_keeps_existing_items_untouched() {
    let mut state = state();
    let first = card("a", Span::Left, Rect::new(32, 20, 160, 160));
    state.append(LayoutPass {
        items: vec![first.clone()],
        end: ColumnState::new(196, 20),
        placeholders: Vec::new(),
    });
    state.append(LayoutPass {
        items: vec![card("b", Span::Right, Rect::new(208, 20, 160, 160))],
        end: ColumnState::new(196, 196),
        placeholders: Vec::new(),
    });

    assert_eq!(state.items().len(), 2);
    assert_eq!(state.items()[0], first);
}

#[test]
fn reset_clears_layout_but_keeps_records() {
    let mut state = state();
    let initial = state.begin(FetchKind::Initial).unwrap();
    state.complete(initial, Ok(records(0..10)));
    state.append(LayoutPass {
        items: vec![card("r0", Span::Left, Rect::new(32, 20, 160, 160))],
        end: ColumnState::new(196, 20),
        placeholders: Vec::new(),
    });

    state.reset(800);

    assert!(state.items().is_empty());
    assert_eq!(state.records().len(), 10);
    assert_eq!(state.cursor(), ColumnState::new(20, 20));
    assert_eq!(state.container_width(), 800);
}

#[test]
fn should_load_more_requires_idle_open_feed_near_bottom() {
    let near = ScrollMetrics {
        scroll_top: 1250,
        viewport_height: 600,
        content_height: 2000,
    };
    let far = ScrollMetrics {
        scroll_top: 0,
        ..near
    };

    let mut state = state();
    assert!(state.should_load_more(&near));
    assert!(!state.should_load_more(&far));

    state.begin(FetchKind::Initial).unwrap();
    assert!(!state.should_load_more(&near), "not while loading");
}
