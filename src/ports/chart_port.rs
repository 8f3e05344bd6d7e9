//! Chart output port trait.

use crate::domain::error::SimError;
use crate::domain::step::StepRecord;

/// Terminal consumer of a finished run, grouped by [`ChartGroup`].
///
/// [`ChartGroup`]: crate::domain::step::ChartGroup
pub trait ChartSink {
    fn render(
        &self,
        steps: &[StepRecord],
        title: &str,
        output_path: &str,
    ) -> Result<(), SimError>;
}
