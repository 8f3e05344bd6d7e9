//! Trade decision port trait.

use crate::domain::error::SimError;

/// Signed trade quantity per time index: positive buys, negative sells.
///
/// Index 0 is never queried. Quantities are not checked against holdings.
pub trait TradeSource {
    fn trade_at(&self, index: usize) -> Result<f64, SimError>;
}
