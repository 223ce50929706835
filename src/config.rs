use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, SkinTrackerError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ARBITRAGE_THRESHOLD_PCT: f64 = 10.0;
pub const DEFAULT_ITEM_LIMIT: usize = 100;
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

pub const ENV_API_URL: &str = "CS2_PRICE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CS2_PRICE_TIMEOUT_SECS";
pub const ENV_ARBITRAGE_THRESHOLD: &str = "CS2_PRICE_ARBITRAGE_THRESHOLD";
pub const ENV_ITEM_LIMIT: &str = "CS2_PRICE_ITEM_LIMIT";
pub const ENV_HISTORY_DAYS: &str = "CS2_PRICE_HISTORY_DAYS";
pub const ENV_CACHE_DIR: &str = "CS2_PRICE_CACHE_DIR";
pub const ENV_OFFLINE: &str = "CS2_PRICE_OFFLINE";

// ---------------------------------------------------------------------------
// Endpoint paths
// ---------------------------------------------------------------------------

pub fn items_path() -> String {
    "/items".to_string()
}

pub fn item_path(item_id: &str) -> String {
    format!("/items/{}", urlencoding::encode(item_id))
}

pub fn items_by_type_path(item_type: &str) -> String {
    format!("/items/type/{}", urlencoding::encode(item_type))
}

pub fn price_history_path(item_id: &str) -> String {
    format!("/prices/{}/history", urlencoding::encode(item_id))
}

pub fn price_analysis_path(item_id: &str) -> String {
    format!("/prices/analysis/{}", urlencoding::encode(item_id))
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("cs2-price-sdk")
    } else {
        PathBuf::from(".cs2-price-sdk-cache")
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Runtime settings for the SDK.
///
/// Usually built through [`SkinTrackerSdk::builder()`](crate::SkinTrackerSdk::builder),
/// or loaded wholesale from the process environment with [`Config::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the tracker REST backend, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    /// Percentage above which a Steam/Buff gap counts as favorable.
    pub arbitrage_threshold_pct: f64,
    /// `limit` sent with item list requests.
    pub item_limit: usize,
    /// `days` window sent with price history requests.
    pub history_days: u32,
    /// Directory for cached responses. `None` disables the cache.
    pub cache_dir: Option<PathBuf>,
    /// Serve everything from the cache and never touch the network.
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            arbitrage_threshold_pct: DEFAULT_ARBITRAGE_THRESHOLD_PCT,
            item_limit: DEFAULT_ITEM_LIMIT,
            history_days: DEFAULT_HISTORY_DAYS,
            cache_dir: None,
            offline: false,
        }
    }
}

impl Config {
    /// Load settings from `CS2_PRICE_*` environment variables.
    ///
    /// Unset variables keep their defaults. A variable that is set but cannot
    /// be parsed is an error rather than being ignored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.base_url = normalize_base_url(&url);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(threshold) = parse_var::<f64, _>(&lookup, ENV_ARBITRAGE_THRESHOLD)? {
            config.arbitrage_threshold_pct = threshold;
        }
        if let Some(limit) = parse_var::<usize, _>(&lookup, ENV_ITEM_LIMIT)? {
            config.item_limit = limit;
        }
        if let Some(days) = parse_var::<u32, _>(&lookup, ENV_HISTORY_DAYS)? {
            config.history_days = days;
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|d| !d.trim().is_empty()) {
            config.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup(ENV_OFFLINE) {
            config.offline = parse_flag(ENV_OFFLINE, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the SDK relies on.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(SkinTrackerError::InvalidArgument(
                "base URL must not be empty".into(),
            ));
        }
        if !self.arbitrage_threshold_pct.is_finite() {
            return Err(SkinTrackerError::InvalidArgument(format!(
                "arbitrage threshold must be finite, got {}",
                self.arbitrage_threshold_pct
            )));
        }
        Ok(())
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            SkinTrackerError::InvalidArgument(format!("{}={:?}: {}", key, raw, e))
        }),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(SkinTrackerError::InvalidArgument(format!(
            "{}={:?}: expected a boolean",
            key, other
        ))),
    }
}
