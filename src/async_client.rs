//! Async wrapper around [`SkinTrackerSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use cs2_price_sdk::AsyncSkinTrackerSdk;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncSkinTrackerSdk::builder().build().await.unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let items = sdk.run(|s| s.items().list(None)).await.unwrap();
//!
//!     // Item and history are fetched concurrently
//!     let view = sdk.item_detail("42").await;
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, SkinTrackerError};
use crate::queries::HistoryParams;
use crate::views::{build_detail, ItemDetailView, ItemListView, PriceAnalysisView, ViewState};
use crate::SkinTrackerSdk;

// ---------------------------------------------------------------------------
// AsyncSkinTrackerSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSkinTrackerSdk`] instance.
#[derive(Debug, Clone, Default)]
pub struct AsyncSkinTrackerSdkBuilder {
    config: Config,
}

impl AsyncSkinTrackerSdkBuilder {
    /// Replace every setting at once.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the backend base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the favorable-arbitrage threshold in percent.
    pub fn arbitrage_threshold(mut self, pct: f64) -> Self {
        self.config.arbitrage_threshold_pct = pct;
        self
    }

    /// Cache every successful response under `path`.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.config.offline = offline;
        self
    }

    /// Build the async SDK.
    ///
    /// Construction runs on the blocking thread pool so it won't block
    /// the async event loop.
    pub async fn build(self) -> Result<AsyncSkinTrackerSdk> {
        tokio::task::spawn_blocking(move || {
            let sdk = SkinTrackerSdk::builder().config(self.config).build()?;
            Ok(AsyncSkinTrackerSdk {
                inner: Arc::new(sdk),
            })
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncSkinTrackerSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`SkinTrackerSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The SDK is `Sync`, so concurrent
/// operations share it through an [`Arc`] without locking.
#[derive(Debug, Clone)]
pub struct AsyncSkinTrackerSdk {
    inner: Arc<SkinTrackerSdk>,
}

impl AsyncSkinTrackerSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncSkinTrackerSdkBuilder {
        AsyncSkinTrackerSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&SkinTrackerSdk` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SkinTrackerSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&sdk))
            .await
            .map_err(join_error)?
    }

    /// Load the item grid.
    pub async fn item_list(&self) -> ViewState<ItemListView> {
        let sdk = self.inner.clone();
        match tokio::task::spawn_blocking(move || sdk.dashboard().item_list()).await {
            Ok(state) => state,
            Err(e) => ViewState::Failed(join_error(e)),
        }
    }

    /// Load an item detail view, fetching the item and its history concurrently.
    ///
    /// Either request failing fails the view; no partial view is assembled.
    pub async fn item_detail(&self, item_id: &str) -> ViewState<ItemDetailView> {
        let id_item = item_id.to_string();
        let id_history = item_id.to_string();
        let fetched = tokio::try_join!(
            self.run(move |s| s.items().get(&id_item)),
            self.run(move |s| s.prices().history(&id_history, &HistoryParams::new())),
        );
        match fetched {
            Ok((item, history)) => {
                ViewState::Loaded(build_detail(item, history, &self.inner.arbitrage()))
            }
            Err(e) => {
                tracing::warn!(item_id, error = %e, "item detail failed to load");
                ViewState::Failed(e)
            }
        }
    }

    /// Load the price analysis table for an item.
    pub async fn price_analysis(&self, item_id: &str) -> ViewState<PriceAnalysisView> {
        let sdk = self.inner.clone();
        let item_id = item_id.to_string();
        match tokio::task::spawn_blocking(move || sdk.dashboard().price_analysis(&item_id)).await
        {
            Ok(state) => state,
            Err(e) => ViewState::Failed(join_error(e)),
        }
    }

    /// Remove every cached response.
    pub async fn clear_cache(&self) -> Result<()> {
        self.run(|s| s.clear_cache()).await
    }

    /// Borrow the wrapped blocking SDK.
    pub fn blocking(&self) -> &SkinTrackerSdk {
        &self.inner
    }

    /// Close the SDK, releasing the HTTP client off the async thread.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || drop(self.inner))
            .await
            .map_err(join_error)
    }
}

/// Re-raises a panicked task on the caller; a cancelled task is an error.
fn join_error(e: tokio::task::JoinError) -> SkinTrackerError {
    if e.is_panic() {
        std::panic::resume_unwind(e.into_panic());
    }
    SkinTrackerError::InvalidArgument(format!("Task join error: {e}"))
}
