//! View models for the dashboard pages.
//!
//! Each loader performs its requests, runs the analytics over the result and
//! reports a [`ViewState`]. Failures are captured into
//! [`ViewState::Failed`]; empty result sets become [`ViewState::NoData`] so
//! callers can tell "nothing tracked yet" apart from "backend unreachable".

use std::collections::HashSet;
use std::thread;

use serde::Serialize;

use crate::analytics::{aggregate, partition_default, ArbitrageCalculator};
use crate::chart::LineChart;
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{Result, SkinTrackerError};
use crate::models::{ArbitrageOutcome, Item, PriceObservation, PriceSource, PriceStatsMap};
use crate::queries::{HistoryParams, ItemQuery, PriceQuery};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ViewState<T> {
    Loaded(T),
    NoData,
    Failed(SkinTrackerError),
}

impl<T> ViewState<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ViewState::Loaded(_))
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ViewState::NoData)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ViewState::Failed(_))
    }

    pub fn loaded(self) -> Option<T> {
        match self {
            ViewState::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SkinTrackerError> {
        match self {
            ViewState::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn from_result(view: &str, result: Result<Option<T>>) -> Self {
        match result {
            Ok(Some(v)) => ViewState::Loaded(v),
            Ok(None) => ViewState::NoData,
            Err(e) => {
                tracing::warn!(view, error = %e, "view failed to load");
                ViewState::Failed(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// One card in the item grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCard {
    pub item_id: String,
    pub name: String,
    pub item_type: String,
    /// Current prices that are present and finite, Buff first.
    pub prices: Vec<(PriceSource, f64)>,
}

impl ItemCard {
    fn from_item(item: &Item) -> Self {
        let prices = [PriceSource::Buff, PriceSource::Steam]
            .into_iter()
            .filter_map(|source| {
                item.price_for(&source)
                    .filter(|p| p.is_finite())
                    .map(|p| (source, p))
            })
            .collect();
        Self {
            item_id: item.item_id.clone(),
            name: item.market_hash_name.clone(),
            item_type: item.item_type.clone(),
            prices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemListView {
    pub cards: Vec<ItemCard>,
    /// Rows dropped for a blank id or name, or a repeated id.
    pub rejected: usize,
}

impl ItemListView {
    /// Validate backend rows into cards.
    ///
    /// Rows need a non-blank id and name. A repeated id keeps its first row.
    pub fn from_items(items: &[Item]) -> Self {
        let mut seen = HashSet::new();
        let mut cards = Vec::with_capacity(items.len());
        let mut rejected = 0;
        for item in items {
            if item.item_id.trim().is_empty() || item.market_hash_name.trim().is_empty() {
                tracing::warn!(item_id = %item.item_id, "item row missing id or name");
                rejected += 1;
                continue;
            }
            if !seen.insert(item.item_id.as_str()) {
                tracing::warn!(item_id = %item.item_id, "duplicate item row");
                rejected += 1;
                continue;
            }
            cards.push(ItemCard::from_item(item));
        }
        Self { cards, rejected }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDetailView {
    pub item: Item,
    pub history: Vec<PriceObservation>,
    pub stats: PriceStatsMap,
    pub arbitrage: ArbitrageOutcome,
    pub chart: LineChart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRow {
    pub source: PriceSource,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceAnalysisView {
    pub item_id: String,
    pub rows: Vec<StatsRow>,
    pub arbitrage: ArbitrageOutcome,
}

impl PriceAnalysisView {
    pub fn from_stats(
        item_id: impl Into<String>,
        stats: &PriceStatsMap,
        calculator: &ArbitrageCalculator,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            rows: stats
                .iter()
                .map(|(source, s)| StatsRow {
                    source: source.clone(),
                    average: s.average,
                    min: s.min,
                    max: s.max,
                })
                .collect(),
            arbitrage: calculator.steam_vs_buff(stats),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Loads the dashboard pages.
pub struct Dashboard<'a> {
    client: &'a ApiClient,
    config: &'a Config,
}

impl<'a> Dashboard<'a> {
    pub fn new(client: &'a ApiClient, config: &'a Config) -> Self {
        Self { client, config }
    }

    fn items(&self) -> ItemQuery<'a> {
        ItemQuery::new(self.client, self.config.item_limit)
    }

    fn prices(&self) -> PriceQuery<'a> {
        PriceQuery::new(self.client, self.config.history_days)
    }

    fn calculator(&self) -> ArbitrageCalculator {
        ArbitrageCalculator::new(self.config.arbitrage_threshold_pct)
    }

    /// The item grid. An empty backend list is `NoData`.
    pub fn item_list(&self) -> ViewState<ItemListView> {
        let result = self.items().list(None).map(|items| {
            let view = ItemListView::from_items(&items);
            (!view.cards.is_empty()).then_some(view)
        });
        ViewState::from_result("item_list", result)
    }

    /// One item with its statistics, arbitrage badge and price chart.
    ///
    /// The item and its history are requested concurrently. If either request
    /// fails the whole view fails; no partial view is produced. An item with
    /// no history still loads, with empty stats and an insufficient-data badge.
    pub fn item_detail(&self, item_id: &str) -> ViewState<ItemDetailView> {
        let result = self.fetch_item_and_history(item_id).map(|(item, history)| {
            Some(build_detail(item, history, &self.calculator()))
        });
        ViewState::from_result("item_detail", result)
    }

    /// Per-source statistics table and arbitrage badge for an item.
    ///
    /// No history at all is `NoData`.
    pub fn price_analysis(&self, item_id: &str) -> ViewState<PriceAnalysisView> {
        let result = self
            .prices()
            .history(item_id, &HistoryParams::new())
            .map(|history| {
                if history.is_empty() {
                    return None;
                }
                let stats = aggregate(&history);
                Some(PriceAnalysisView::from_stats(item_id, &stats, &self.calculator()))
            });
        ViewState::from_result("price_analysis", result)
    }

    fn fetch_item_and_history(&self, item_id: &str) -> Result<(Item, Vec<PriceObservation>)> {
        let items = self.items();
        let prices = self.prices();
        let (item, history) = thread::scope(|s| {
            let item = s.spawn(|| items.get(item_id));
            let history = s.spawn(|| prices.history(item_id, &HistoryParams::new()));
            (join(item), join(history))
        });
        Ok((item?, history?))
    }
}

/// Assemble the detail view from already-fetched data.
pub fn build_detail(
    item: Item,
    history: Vec<PriceObservation>,
    calculator: &ArbitrageCalculator,
) -> ItemDetailView {
    let stats = aggregate(&history);
    let arbitrage = calculator.steam_vs_buff(&stats);
    let chart = LineChart::from_series(
        format!("{} Price History", item.market_hash_name),
        &partition_default(&history),
    );
    ItemDetailView {
        item,
        history,
        stats,
        arbitrage,
        chart,
    }
}

/// A panic on a request thread is re-raised on the caller, not reported as a
/// request error.
fn join<T>(handle: thread::ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}
