use crate::models::{ChartPoint, ChartSeries, PriceObservation, PriceSource};

/// Axis label for a sample (`YYYY-MM-DD`).
pub fn point_label(obs: &PriceObservation) -> String {
    obs.timestamp.format("%Y-%m-%d").to_string()
}

/// Split observations into one time series per source.
///
/// Every source in `sources` gets a series, empty if nothing matched; sources
/// found in the input but not requested are appended after them in first-seen
/// order. Each series is sorted ascending by timestamp, keeping input order
/// for equal timestamps. The input slice is left untouched.
pub fn partition(observations: &[PriceObservation], sources: &[PriceSource]) -> Vec<ChartSeries> {
    let mut order: Vec<PriceSource> = sources.to_vec();
    for obs in observations {
        if !order.contains(&obs.source) {
            order.push(obs.source.clone());
        }
    }

    order
        .into_iter()
        .map(|source| {
            let mut matched: Vec<&PriceObservation> =
                observations.iter().filter(|o| o.source == source).collect();
            matched.sort_by_key(|o| o.timestamp);
            ChartSeries {
                points: matched
                    .into_iter()
                    .map(|o| ChartPoint {
                        timestamp: o.timestamp,
                        label: point_label(o),
                        value: o.price,
                    })
                    .collect(),
                source,
            }
        })
        .collect()
}

/// [`partition`] with the two tracked marketplaces always present.
pub fn partition_default(observations: &[PriceObservation]) -> Vec<ChartSeries> {
    partition(observations, &[PriceSource::Steam, PriceSource::Buff])
}
