//! Item queries against `/items`, `/items/{id}` and `/items/type/{type}`.

use crate::client::ApiClient;
use crate::config;
use crate::error::{Result, SkinTrackerError};
use crate::models::Item;

// ---------------------------------------------------------------------------
// ItemQuery
// ---------------------------------------------------------------------------

/// Query interface for tracked skin items.
pub struct ItemQuery<'a> {
    client: &'a ApiClient,
    default_limit: usize,
}

impl<'a> ItemQuery<'a> {
    /// Create a new `ItemQuery` bound to the given client.
    pub fn new(client: &'a ApiClient, default_limit: usize) -> Self {
        Self {
            client,
            default_limit,
        }
    }

    /// List tracked items, newest first as the backend orders them.
    ///
    /// `limit` falls back to the configured item limit when `None`.
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<Item>> {
        let limit = limit.unwrap_or(self.default_limit);
        self.client
            .get_json(&config::items_path(), &[("limit", limit.to_string())])
    }

    /// Fetch a single item by id.
    ///
    /// Returns [`SkinTrackerError::NotFound`] if the backend has no such item.
    pub fn get(&self, item_id: &str) -> Result<Item> {
        require_non_empty("item id", item_id)?;
        self.client
            .get_json(&config::item_path(item_id), &[])
            .map_err(|e| {
                if e.is_backend_missing("Item not found") {
                    SkinTrackerError::NotFound(format!("item '{}'", item_id))
                } else {
                    e
                }
            })
    }

    /// List items of one type (e.g. `"sale"` or `"purchase"`).
    pub fn by_type(&self, item_type: &str) -> Result<Vec<Item>> {
        require_non_empty("item type", item_type)?;
        self.client
            .get_json(&config::items_by_type_path(item_type), &[])
    }

    /// Case-insensitive substring search over market hash names.
    ///
    /// The backend has no search endpoint, so this filters the item list.
    pub fn search(&self, name: &str, limit: Option<usize>) -> Result<Vec<Item>> {
        let needle = name.to_lowercase();
        Ok(self
            .list(limit)?
            .into_iter()
            .filter(|item| item.market_hash_name.to_lowercase().contains(&needle))
            .collect())
    }
}

pub(crate) fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SkinTrackerError::InvalidArgument(format!(
            "{} must not be empty",
            what
        )));
    }
    Ok(())
}
