//! Line-chart model for price history.
//!
//! Chart components are registered once per process, the first time any
//! chart is built. Later builds reuse the same registry.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::models::{ChartSeries, PriceSource};

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartComponent {
    CategoryScale,
    LinearScale,
    PointElement,
    LineElement,
    Title,
    Tooltip,
    Legend,
}

#[derive(Debug)]
pub struct ChartRegistry {
    components: Vec<ChartComponent>,
}

impl ChartRegistry {
    fn register() -> Self {
        REGISTRATIONS.fetch_add(1, Ordering::SeqCst);
        let components = vec![
            ChartComponent::CategoryScale,
            ChartComponent::LinearScale,
            ChartComponent::PointElement,
            ChartComponent::LineElement,
            ChartComponent::Title,
            ChartComponent::Tooltip,
            ChartComponent::Legend,
        ];
        tracing::debug!(?components, "registered chart components");
        Self { components }
    }

    pub fn components(&self) -> &[ChartComponent] {
        &self.components
    }

    pub fn is_registered(&self, component: ChartComponent) -> bool {
        self.components.contains(&component)
    }
}

static REGISTRATIONS: AtomicUsize = AtomicUsize::new(0);

lazy_static! {
    static ref REGISTRY: ChartRegistry = ChartRegistry::register();
}

/// The process-wide registry, initialised on first access.
pub fn registry() -> &'static ChartRegistry {
    &*REGISTRY
}

/// How many times the registry has been initialised (0 or 1).
pub fn registration_count() -> usize {
    REGISTRATIONS.load(Ordering::SeqCst)
}

// ---------------------------------------------------------------------------
// LineChart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub source: PriceSource,
    /// One slot per chart label; `None` where this source has no sample.
    pub data: Vec<Option<f64>>,
    pub border_color: String,
    pub tension: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    /// Shared x axis, ascending.
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

const LINE_TENSION: f64 = 0.1;

impl LineChart {
    /// Build a chart whose x axis is the union of every series' timestamps.
    ///
    /// Several samples from one source at the same instant keep the last value.
    pub fn from_series(title: impl Into<String>, series: &[ChartSeries]) -> Self {
        let registry = registry();
        debug_assert!(registry.is_registered(ChartComponent::LineElement));

        let axis: BTreeSet<DateTime<Utc>> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.timestamp))
            .collect();
        let axis: Vec<DateTime<Utc>> = axis.into_iter().collect();

        let labels = axis
            .iter()
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .collect();

        let datasets = series
            .iter()
            .map(|s| {
                let mut data = vec![None; axis.len()];
                for point in &s.points {
                    if let Ok(idx) = axis.binary_search(&point.timestamp) {
                        data[idx] = Some(point.value);
                    }
                }
                ChartDataset {
                    label: dataset_label(&s.source),
                    source: s.source.clone(),
                    data,
                    border_color: border_color(&s.source).to_string(),
                    tension: LINE_TENSION,
                }
            })
            .collect();

        Self {
            title: title.into(),
            labels,
            datasets,
        }
    }

    pub fn dataset(&self, source: &PriceSource) -> Option<&ChartDataset> {
        self.datasets.iter().find(|d| &d.source == source)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn dataset_label(source: &PriceSource) -> String {
    match source {
        PriceSource::Steam => "Steam Price".to_string(),
        PriceSource::Buff => "Buff Price".to_string(),
        PriceSource::Other(name) => format!("{} Price", name),
    }
}

fn border_color(source: &PriceSource) -> &'static str {
    match source {
        PriceSource::Steam => "rgb(75, 192, 192)",
        PriceSource::Buff => "rgb(255, 99, 132)",
        PriceSource::Other(_) => "rgb(153, 102, 255)",
    }
}
