use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{PriceObservation, PriceSource, PriceStats, PriceStatsMap};

struct Accumulator {
    sum: f64,
    min: f64,
    max: f64,
    count: usize,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
}

impl Accumulator {
    fn start(obs: &PriceObservation) -> Self {
        Self {
            sum: obs.price,
            min: obs.price,
            max: obs.price,
            count: 1,
            first_seen: obs.timestamp,
            last_seen: obs.timestamp,
        }
    }

    fn push(&mut self, obs: &PriceObservation) {
        self.sum += obs.price;
        self.min = self.min.min(obs.price);
        self.max = self.max.max(obs.price);
        self.count += 1;
        self.first_seen = self.first_seen.min(obs.timestamp);
        self.last_seen = self.last_seen.max(obs.timestamp);
    }

    fn finish(self) -> PriceStats {
        // Summation error can push the mean a few ulps past the extremes.
        let mean = self.sum / self.count as f64;
        let average = if self.min <= self.max {
            mean.clamp(self.min, self.max)
        } else {
            mean
        };
        PriceStats {
            average,
            min: self.min,
            max: self.max,
            count: self.count,
            first_seen: self.first_seen,
            last_seen: self.last_seen,
        }
    }
}

/// Summarize observations per source.
///
/// Sources with no observations are absent from the result; an empty input
/// yields an empty map. Input order does not matter.
pub fn aggregate(observations: &[PriceObservation]) -> PriceStatsMap {
    let mut acc: BTreeMap<PriceSource, Accumulator> = BTreeMap::new();
    for obs in observations {
        match acc.get_mut(&obs.source) {
            Some(a) => a.push(obs),
            None => {
                acc.insert(obs.source.clone(), Accumulator::start(obs));
            }
        }
    }
    acc.into_iter().map(|(source, a)| (source, a.finish())).collect()
}
