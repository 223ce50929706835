//! Configuration loading and endpoint path construction.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use cs2_price_sdk::config::{self, Config};
use cs2_price_sdk::SkinTrackerSdk;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn defaults_match_backend_defaults() {
    let c = Config::default();
    assert_eq!(c.base_url, "http://localhost:8000/api");
    assert_eq!(c.timeout, Duration::from_secs(30));
    assert_eq!(c.arbitrage_threshold_pct, 10.0);
    assert_eq!(c.item_limit, 100);
    assert_eq!(c.history_days, 7);
    assert_eq!(c.cache_dir, None);
    assert!(!c.offline);
}

#[test]
fn from_lookup_without_vars_is_default() {
    assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
}

#[test]
fn from_lookup_reads_every_variable() {
    let c = Config::from_lookup(lookup(&[
        ("CS2_PRICE_API_URL", "https://tracker.example.com/api/"),
        ("CS2_PRICE_TIMEOUT_SECS", "5"),
        ("CS2_PRICE_ARBITRAGE_THRESHOLD", "12.5"),
        ("CS2_PRICE_ITEM_LIMIT", "25"),
        ("CS2_PRICE_HISTORY_DAYS", "30"),
        ("CS2_PRICE_CACHE_DIR", "/tmp/cs2-cache"),
        ("CS2_PRICE_OFFLINE", "yes"),
    ]))
    .unwrap();
    assert_eq!(c.base_url, "https://tracker.example.com/api");
    assert_eq!(c.timeout, Duration::from_secs(5));
    assert_eq!(c.arbitrage_threshold_pct, 12.5);
    assert_eq!(c.item_limit, 25);
    assert_eq!(c.history_days, 30);
    assert_eq!(c.cache_dir, Some(PathBuf::from("/tmp/cs2-cache")));
    assert!(c.offline);
}

#[test]
fn unparseable_values_are_errors() {
    for (key, value) in [
        ("CS2_PRICE_TIMEOUT_SECS", "soon"),
        ("CS2_PRICE_ARBITRAGE_THRESHOLD", "ten"),
        ("CS2_PRICE_ITEM_LIMIT", "-1"),
        ("CS2_PRICE_OFFLINE", "maybe"),
    ] {
        let err = Config::from_lookup(lookup(&[(key, value)])).unwrap_err();
        assert!(err.to_string().contains(key), "{}", err);
    }
}

#[test]
fn non_finite_threshold_is_rejected() {
    let err = Config::from_lookup(lookup(&[("CS2_PRICE_ARBITRAGE_THRESHOLD", "NaN")]));
    assert!(err.is_err());

    let build = SkinTrackerSdk::builder().arbitrage_threshold(f64::INFINITY).build();
    assert!(build.is_err());
}

#[test]
fn builder_trims_trailing_slash() {
    let sdk = SkinTrackerSdk::builder()
        .base_url("http://127.0.0.1:9/api/")
        .build()
        .unwrap();
    assert_eq!(sdk.client().base_url(), "http://127.0.0.1:9/api");
    assert_eq!(sdk.client().url_for("/items"), "http://127.0.0.1:9/api/items");
    assert!(sdk.to_string().contains("cache=disabled"));
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn endpoint_paths() {
    assert_eq!(config::items_path(), "/items");
    assert_eq!(config::item_path("42"), "/items/42");
    assert_eq!(config::items_by_type_path("sale"), "/items/type/sale");
    assert_eq!(config::price_history_path("42"), "/prices/42/history");
    assert_eq!(config::price_analysis_path("42"), "/prices/analysis/42");
}

#[test]
fn path_segments_are_percent_encoded() {
    assert_eq!(
        config::item_path("AK-47 | Redline"),
        "/items/AK-47%20%7C%20Redline"
    );
    assert_eq!(config::price_history_path("a/b"), "/prices/a%2Fb/history");
}
