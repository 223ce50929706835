//! Pure transformations over fetched price data.
//!
//! Nothing here performs I/O. All functions take borrowed input and return
//! fresh values, so they can be re-run on every render.

pub mod arbitrage;
pub mod series;
pub mod stats;

pub use arbitrage::ArbitrageCalculator;
pub use series::{partition, partition_default};
pub use stats::aggregate;
