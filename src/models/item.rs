use serde::{Deserialize, Deserializer, Serialize};

use super::price::PriceSource;

// ---------------------------------------------------------------------------
// Item — A tracked skin as returned by `/items` and `/items/{id}`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "string_or_number")]
    pub item_id: String,
    pub market_hash_name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub buff_price: Option<f64>,
    #[serde(default)]
    pub steam_price: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Item {
    /// Current price on the given marketplace, if the backend reported one.
    pub fn price_for(&self, source: &PriceSource) -> Option<f64> {
        match source {
            PriceSource::Steam => self.steam_price,
            PriceSource::Buff => self.buff_price,
            PriceSource::Other(_) => None,
        }
    }
}

/// The backend keys items by a text id, but older rows carry integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Uint(n) => n.to_string(),
    })
}
