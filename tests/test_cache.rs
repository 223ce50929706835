//! Response cache and offline replay.

mod common;

use std::fs;

use common::StubBackend;
use cs2_price_sdk::queries::HistoryParams;
use cs2_price_sdk::{ResponseCache, SkinTrackerSdk};

#[test]
fn store_and_load_round_trip_compressed() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = ResponseCache::new(Some(tmp.path().to_path_buf())).unwrap();
    let query = [("limit", "100".to_string())];

    assert_eq!(cache.load("/items", &query).unwrap(), None);
    cache.store("/items", &query, r#"[{"a":1}]"#).unwrap();
    assert_eq!(
        cache.load("/items", &query).unwrap().as_deref(),
        Some(r#"[{"a":1}]"#)
    );

    let entry = cache.entry_path("/items", &query);
    assert!(entry.file_name().unwrap().to_str().unwrap().ends_with(".json.gz"));
    // gzip magic
    assert_eq!(&fs::read(&entry).unwrap()[..2], &[0x1f, 0x8b]);
}

#[test]
fn entries_are_keyed_by_path_and_query() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = ResponseCache::new(Some(tmp.path().to_path_buf())).unwrap();
    let a = cache.entry_path("/prices/1/history", &[("days", "7".to_string())]);
    let b = cache.entry_path("/prices/1/history", &[("days", "30".to_string())]);
    let c = cache.entry_path("/prices/2/history", &[("days", "7".to_string())]);
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert!(a.starts_with(tmp.path()));
}

#[test]
fn corrupt_entry_is_removed() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = ResponseCache::new(Some(tmp.path().to_path_buf())).unwrap();
    let entry = cache.entry_path("/items", &[]);
    fs::write(&entry, b"not gzip at all").unwrap();

    let err = cache.load("/items", &[]).unwrap_err();
    assert!(err.is_not_found());
    assert!(!entry.exists());
}

#[test]
fn offline_replays_previously_fetched_responses() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = StubBackend::start(&[
        ("/items", 200, common::items_json()),
        ("/prices/x/history", 200, common::history_json()),
    ]);

    let online = SkinTrackerSdk::builder()
        .base_url(&backend.base_url)
        .cache_dir(tmp.path())
        .build()
        .unwrap();
    online.items().list(None).unwrap();
    online.prices().history("x", &HistoryParams::new()).unwrap();
    assert_eq!(backend.requests().len(), 2);

    let offline = SkinTrackerSdk::builder()
        .base_url(&backend.base_url)
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .unwrap();
    assert_eq!(offline.items().list(None).unwrap().len(), 2);
    assert_eq!(
        offline
            .prices()
            .history("x", &HistoryParams::new())
            .unwrap()
            .len(),
        4
    );
    // No further network traffic.
    assert_eq!(backend.requests().len(), 2);
}

#[test]
fn offline_miss_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = SkinTrackerSdk::builder()
        .base_url(common::unreachable_base_url())
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .unwrap();
    let err = sdk.items().get("never-fetched").unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("offline"));
}

#[test]
fn malformed_responses_are_not_replayed() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = StubBackend::start(&[("/items", 200, r#"{"oops": true}"#.to_string())]);
    let sdk = SkinTrackerSdk::builder()
        .base_url(&backend.base_url)
        .cache_dir(tmp.path())
        .build()
        .unwrap();
    assert!(sdk.items().list(None).unwrap_err().is_malformed());

    let entry = sdk
        .client()
        .cache()
        .unwrap()
        .entry_path("/items", &[("limit", "100".to_string())]);
    assert!(!entry.exists());
}

#[test]
fn clear_cache_empties_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("responses");
    let backend = StubBackend::start(&[("/items", 200, common::items_json())]);
    let sdk = SkinTrackerSdk::builder()
        .base_url(&backend.base_url)
        .cache_dir(&dir)
        .build()
        .unwrap();
    sdk.items().list(None).unwrap();
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

    sdk.clear_cache().unwrap();
    assert!(dir.exists());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    assert_eq!(sdk.cache_dir(), Some(dir));
}

#[test]
fn offline_history_miss_is_failure_not_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = SkinTrackerSdk::builder()
        .base_url(common::unreachable_base_url())
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .unwrap();

    let err = sdk
        .prices()
        .history("never-fetched", &HistoryParams::new())
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("offline"));

    let err = sdk.prices().analysis("never-fetched").unwrap_err();
    assert!(err.is_not_found());

    let state = sdk.dashboard().price_analysis("never-fetched");
    assert!(state.is_failed());
    assert!(!state.is_no_data());
    assert!(sdk.dashboard().item_detail("never-fetched").is_failed());
}

#[test]
fn similar_ids_get_separate_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = ResponseCache::new(Some(tmp.path().to_path_buf())).unwrap();

    let spaced = cache.entry_path("/items/a%20b", &[]);
    let underscored = cache.entry_path("/items/a_20b", &[]);
    assert_ne!(spaced, underscored);
    assert_ne!(
        cache.entry_path("/items/a.b", &[]),
        cache.entry_path("/items/a_b", &[])
    );
    assert_ne!(
        cache.entry_path("/items", &[("a-b", "c".to_string())]),
        cache.entry_path("/items", &[("a", "b-c".to_string())])
    );

    cache
        .store("/items/a%20b", &[], r#"{"item_id":"a b"}"#)
        .unwrap();
    assert_eq!(cache.load("/items/a_20b", &[]).unwrap(), None);
    assert!(cache.load("/items/a%20b", &[]).unwrap().is_some());
}
