use crate::config::DEFAULT_ARBITRAGE_THRESHOLD_PCT;
use crate::models::{
    Arbitrage, ArbitrageClass, ArbitrageOutcome, PriceSource, PriceStatsMap,
};

/// Compares average prices between two marketplaces.
///
/// A gap strictly greater than `threshold_pct` is classified as favorable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbitrageCalculator {
    pub threshold_pct: f64,
}

impl Default for ArbitrageCalculator {
    fn default() -> Self {
        Self {
            threshold_pct: DEFAULT_ARBITRAGE_THRESHOLD_PCT,
        }
    }
}

impl ArbitrageCalculator {
    pub fn new(threshold_pct: f64) -> Self {
        Self { threshold_pct }
    }

    /// Steam (usually dearer) against Buff (usually cheaper).
    pub fn steam_vs_buff(&self, stats: &PriceStatsMap) -> ArbitrageOutcome {
        self.compare(stats, &PriceSource::Steam, &PriceSource::Buff)
    }

    /// Percentage gap of `high`'s average over `low`'s average.
    ///
    /// Missing averages are never read as zero: if either source has no
    /// statistics, or `low` averages zero or less, the outcome is
    /// [`ArbitrageOutcome::InsufficientData`] naming that source.
    pub fn compare(
        &self,
        stats: &PriceStatsMap,
        high: &PriceSource,
        low: &PriceSource,
    ) -> ArbitrageOutcome {
        let high_avg = match stats.get(high) {
            Some(s) => s.average,
            None => return insufficient(high),
        };
        let low_avg = match stats.get(low) {
            Some(s) if s.average > 0.0 => s.average,
            _ => return insufficient(low),
        };
        self.from_averages(high, high_avg, low, low_avg)
    }

    /// Same as [`compare`](Self::compare) starting from raw averages.
    pub fn from_averages(
        &self,
        high: &PriceSource,
        high_avg: f64,
        low: &PriceSource,
        low_avg: f64,
    ) -> ArbitrageOutcome {
        if !high_avg.is_finite() {
            return insufficient(high);
        }
        if !low_avg.is_finite() || low_avg <= 0.0 {
            return insufficient(low);
        }

        let difference_pct = round_2dp((high_avg - low_avg) / low_avg * 100.0);
        let class = if difference_pct > self.threshold_pct {
            ArbitrageClass::Favorable
        } else {
            ArbitrageClass::Normal
        };
        ArbitrageOutcome::Available(Arbitrage {
            high_source: high.clone(),
            low_source: low.clone(),
            difference_pct,
            class,
        })
    }
}

fn insufficient(source: &PriceSource) -> ArbitrageOutcome {
    ArbitrageOutcome::InsufficientData {
        source: source.clone(),
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
