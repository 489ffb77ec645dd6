//! Per-step execution metrics.

use crate::termination::StopReason;
use traject_core::StepId;

/// What happened during the most recent step.
///
/// `Copy` and fixed-size so recording it allocates nothing in the step
/// loop; the diagnostic surface of the engine, in place of any logging
/// layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepMetrics {
    /// The step that was executed.
    pub step_id: StepId,
    /// Simulation time after the step.
    pub sim_time: f64,
    /// How many events fired during the step.
    pub events_fired: u32,
    /// Whether an output row was emitted.
    pub row_emitted: bool,
    /// The termination verdict, once reached.
    pub stop: Option<StopReason>,
}
