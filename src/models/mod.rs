pub mod analysis;
pub mod item;
pub mod price;

pub use analysis::*;
pub use item::*;
pub use price::*;
