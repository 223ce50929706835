//! CS2 price SDK for Rust.
//!
//! Provides a high-level client for the CS2 skin tracker REST backend: the
//! list of tracked items, single items, and their Steam/Buff price history.
//! Fetched observations are summarized per marketplace, compared for
//! arbitrage, and shaped into line-chart series.
//!
//! # Quick start
//!
//! ```no_run
//! use cs2_price_sdk::SkinTrackerSdk;
//! use cs2_price_sdk::queries::HistoryParams;
//!
//! let sdk = SkinTrackerSdk::builder()
//!     .base_url("http://localhost:8000/api")
//!     .build()
//!     .unwrap();
//!
//! // Query items and price history
//! let items = sdk.items().list(None).unwrap();
//! let history = sdk.prices().history(&items[0].item_id, &HistoryParams::new()).unwrap();
//!
//! // Summaries and arbitrage
//! let stats = cs2_price_sdk::analytics::aggregate(&history);
//! let outcome = sdk.arbitrage().steam_vs_buff(&stats);
//! ```

pub mod analytics;
#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod chart;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod queries;
pub mod views;

pub use analytics::ArbitrageCalculator;
#[cfg(feature = "async")]
pub use async_client::AsyncSkinTrackerSdk;
pub use cache::ResponseCache;
pub use client::ApiClient;
pub use config::Config;
pub use error::{Result, SkinTrackerError};
pub use views::{Dashboard, ViewState};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// SkinTrackerSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SkinTrackerSdk`] instance.
///
/// Use [`SkinTrackerSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](SkinTrackerSdkBuilder::build) to create the SDK.
#[derive(Debug, Clone, Default)]
pub struct SkinTrackerSdkBuilder {
    config: Config,
}

impl SkinTrackerSdkBuilder {
    /// Replace every setting at once, e.g. with [`Config::from_env()`].
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the backend base URL. Defaults to `http://localhost:8000/api`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = config::normalize_base_url(&url.into());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the percentage above which a Steam/Buff gap is favorable.
    ///
    /// Defaults to 10.0.
    pub fn arbitrage_threshold(mut self, pct: f64) -> Self {
        self.config.arbitrage_threshold_pct = pct;
        self
    }

    /// Set the `limit` used when listing items.
    pub fn item_limit(mut self, limit: usize) -> Self {
        self.config.item_limit = limit;
        self
    }

    /// Set the number of days of price history requested by default.
    pub fn history_days(mut self, days: u32) -> Self {
        self.config.history_days = days;
        self
    }

    /// Cache every successful response under `path`.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the SDK never contacts the backend and only replays
    /// previously cached responses. Without an explicit cache directory the
    /// platform default is used. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.config.offline = offline;
        self
    }

    /// Build the SDK.
    ///
    /// Validates the configuration and prepares the HTTP client; no request
    /// is made until the first query.
    pub fn build(self) -> Result<SkinTrackerSdk> {
        let client = ApiClient::new(&self.config)?;
        Ok(SkinTrackerSdk {
            client,
            config: self.config,
        })
    }
}

// ---------------------------------------------------------------------------
// SkinTrackerSdk
// ---------------------------------------------------------------------------

/// The main entry point for the CS2 price SDK.
///
/// Owns an [`ApiClient`] and exposes query interfaces as lightweight
/// borrowing wrappers. The SDK is `Send + Sync`.
///
/// Created via [`SkinTrackerSdk::builder()`].
#[derive(Debug)]
pub struct SkinTrackerSdk {
    client: ApiClient,
    config: Config,
}

impl SkinTrackerSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> SkinTrackerSdkBuilder {
        SkinTrackerSdkBuilder::default()
    }

    /// Build an SDK from `CS2_PRICE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::builder().config(Config::from_env()?).build()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the item query interface.
    pub fn items(&self) -> queries::ItemQuery<'_> {
        queries::ItemQuery::new(&self.client, self.config.item_limit)
    }

    /// Access the price history and analysis interface.
    pub fn prices(&self) -> queries::PriceQuery<'_> {
        queries::PriceQuery::new(&self.client, self.config.history_days)
    }

    /// Access the dashboard view loaders.
    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(&self.client, &self.config)
    }

    /// An arbitrage calculator using the configured threshold.
    pub fn arbitrage(&self) -> ArbitrageCalculator {
        ArbitrageCalculator::new(self.config.arbitrage_threshold_pct)
    }

    // -- Utility methods ---------------------------------------------------

    /// Remove every cached response. A no-op when caching is disabled.
    pub fn clear_cache(&self) -> Result<()> {
        match self.client.cache() {
            Some(cache) => cache.clear(),
            None => Ok(()),
        }
    }

    /// The cache directory in use, if caching is enabled.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.client.cache().map(|c| c.cache_dir.clone())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return a reference to the underlying [`ApiClient`] for advanced usage.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SkinTrackerSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self
            .cache_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "disabled".to_string());
        write!(
            f,
            "SkinTrackerSdk(base_url={}, cache={}, offline={})",
            self.client.base_url(),
            cache,
            self.config.offline
        )
    }
}
