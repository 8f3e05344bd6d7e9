//! Price feed port trait.

use crate::domain::error::SimError;

/// A price path over a fixed range of time indices.
///
/// Must behave as a pure function of the index for the lifetime of a run.
pub trait PriceSource {
    fn price_at(&self, index: usize) -> Result<f64, SimError>;

    /// Number of time steps covered. Zero or negative means no steps.
    fn duration(&self) -> i64;
}
