use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::price::PriceSource;

// ---------------------------------------------------------------------------
// PriceStats — Per-source summary computed client-side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Statistics keyed by source. Sources without observations have no entry.
pub type PriceStatsMap = BTreeMap<PriceSource, PriceStats>;

// ---------------------------------------------------------------------------
// SourceAnalysis — Server-side aggregate from `/prices/analysis/{id}`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAnalysis {
    pub source: PriceSource,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

// ---------------------------------------------------------------------------
// Arbitrage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbitrageClass {
    Favorable,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arbitrage {
    pub high_source: PriceSource,
    pub low_source: PriceSource,
    /// `(avg(high) - avg(low)) / avg(low) * 100`, rounded to 2 decimals.
    pub difference_pct: f64,
    pub class: ArbitrageClass,
}

impl Arbitrage {
    pub fn is_favorable(&self) -> bool {
        self.class == ArbitrageClass::Favorable
    }
}

/// Result of comparing two sources.
///
/// `InsufficientData` names the first source whose average was missing or
/// could not be used as a denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArbitrageOutcome {
    Available(Arbitrage),
    InsufficientData { source: PriceSource },
}

impl ArbitrageOutcome {
    pub fn arbitrage(&self) -> Option<&Arbitrage> {
        match self {
            ArbitrageOutcome::Available(a) => Some(a),
            ArbitrageOutcome::InsufficientData { .. } => None,
        }
    }

    pub fn difference_pct(&self) -> Option<f64> {
        self.arbitrage().map(|a| a.difference_pct)
    }
}
