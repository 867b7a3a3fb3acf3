// Analyzer module: price comparison, store location and online ordering.

pub mod delivery;
pub mod location;
pub mod price_comparison;

pub use price_comparison::{compare_prices, Chain, PriceComparison};
