use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// PriceSource — Marketplace a price originates from
// ---------------------------------------------------------------------------

/// Marketplace a price observation comes from.
///
/// Serialized as a lowercase string (`"steam"`, `"buff"`). Unknown marketplaces
/// are preserved verbatim (lowercased) in [`PriceSource::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriceSource {
    Steam,
    Buff,
    Other(String),
}

impl PriceSource {
    pub fn as_str(&self) -> &str {
        match self {
            PriceSource::Steam => "steam",
            PriceSource::Buff => "buff",
            PriceSource::Other(name) => name,
        }
    }
}

impl From<&str> for PriceSource {
    fn from(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "steam" => PriceSource::Steam,
            "buff" => PriceSource::Buff,
            _ => PriceSource::Other(lower),
        }
    }
}

impl From<String> for PriceSource {
    fn from(raw: String) -> Self {
        PriceSource::from(raw.as_str())
    }
}

impl From<PriceSource> for String {
    fn from(source: PriceSource) -> Self {
        source.as_str().to_string()
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PriceObservation — One historical sample from `/prices/{id}/history`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub price: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub source: PriceSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_hash_name: Option<String>,
}

impl PriceObservation {
    pub fn new(price: f64, timestamp: DateTime<Utc>, source: PriceSource) -> Self {
        Self {
            price,
            timestamp,
            source,
            volume: None,
            market_hash_name: None,
        }
    }

    /// Prices must be finite and strictly positive to take part in statistics.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, and the naive form the backend emits for
/// `TIMESTAMP WITHOUT TIME ZONE` columns, which is taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {:?}", raw)))
}

// ---------------------------------------------------------------------------
// ChartSeries — Per-source time series for line charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    /// Axis label (`YYYY-MM-DD`).
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub source: PriceSource,
    /// Points in ascending timestamp order.
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}
