//! Price queries against `/prices/{id}/history` and `/prices/analysis/{id}`.

use crate::client::ApiClient;
use crate::config;
use crate::error::Result;
use crate::models::{PriceObservation, PriceSource, SourceAnalysis};

use super::items::require_non_empty;

const NO_HISTORY: &str = "No price history found";

// ---------------------------------------------------------------------------
// HistoryParams
// ---------------------------------------------------------------------------

/// Query parameters for the price history endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryParams {
    /// Days of history to fetch. `None` uses the configured window.
    pub days: Option<u32>,
    /// Restrict to one marketplace.
    pub source: Option<PriceSource>,
}

impl HistoryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    pub fn source(mut self, source: impl Into<PriceSource>) -> Self {
        self.source = Some(source.into());
        self
    }
}

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface for price history and server-side price analysis.
pub struct PriceQuery<'a> {
    client: &'a ApiClient,
    default_days: u32,
}

impl<'a> PriceQuery<'a> {
    /// Create a new `PriceQuery` bound to the given client.
    pub fn new(client: &'a ApiClient, default_days: u32) -> Self {
        Self {
            client,
            default_days,
        }
    }

    /// Get price observations for an item.
    ///
    /// The backend reports an empty window as "No price history found", either
    /// as a 404 or wrapped in a 500. Both are an empty vector, not an error.
    /// Offline cache misses still fail. Samples with a non-positive or
    /// non-finite price are dropped.
    pub fn history(&self, item_id: &str, params: &HistoryParams) -> Result<Vec<PriceObservation>> {
        require_non_empty("item id", item_id)?;

        let mut query = vec![("days", params.days.unwrap_or(self.default_days).to_string())];
        if let Some(source) = &params.source {
            query.push(("source", source.to_string()));
        }

        let raw: Vec<PriceObservation> =
            match self.client.get_json(&config::price_history_path(item_id), &query) {
                Ok(rows) => rows,
                Err(e) if e.is_backend_missing(NO_HISTORY) => {
                    tracing::debug!(item_id, "no price history in window");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(e),
            };

        let total = raw.len();
        let valid: Vec<PriceObservation> = raw.into_iter().filter(|o| o.is_valid()).collect();
        if valid.len() != total {
            tracing::warn!(
                item_id,
                dropped = total - valid.len(),
                "dropped price observations with invalid prices"
            );
        }
        Ok(valid)
    }

    /// Get the backend's own per-source aggregate for an item.
    pub fn analysis(&self, item_id: &str) -> Result<Vec<SourceAnalysis>> {
        require_non_empty("item id", item_id)?;
        match self
            .client
            .get_json(&config::price_analysis_path(item_id), &[])
        {
            Ok(rows) => Ok(rows),
            Err(e) if e.status() == Some(404) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
