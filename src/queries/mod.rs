//! Query modules for the CS2 price SDK.
//!
//! Each module provides a query struct that borrows the shared
//! [`ApiClient`](crate::client::ApiClient) and exposes methods returning
//! `Result<T>` with typed model payloads.

pub mod items;
pub mod prices;

pub use items::ItemQuery;
pub use prices::{HistoryParams, PriceQuery};
