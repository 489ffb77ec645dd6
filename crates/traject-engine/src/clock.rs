//! The simulation clock.

use traject_core::StepId;

/// Simulation time, step size, and the event-epoch flag.
///
/// Time only moves forward, by exactly the configured step, under the
/// scheduler's control. The event-epoch flag marks the step during which
/// an event fired; the time-since-event tracker restarts there.
#[derive(Clone, Copy, Debug)]
pub struct SimClock {
    time: f64,
    step: f64,
    step_id: StepId,
    event_epoch: bool,
    time_since_event: f64,
}

impl SimClock {
    /// A clock at t = 0 with the given integration step.
    pub fn new(step: f64) -> Self {
        Self {
            time: 0.0,
            step,
            step_id: StepId(0),
            event_epoch: false,
            time_since_event: 0.0,
        }
    }

    /// Simulation time in seconds since launch.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Integration step in seconds.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of completed steps.
    pub fn step_id(&self) -> StepId {
        self.step_id
    }

    /// Whether an event fired during the current step.
    pub fn event_epoch(&self) -> bool {
        self.event_epoch
    }

    /// Seconds since the most recent event (or since launch).
    pub fn time_since_event(&self) -> f64 {
        self.time_since_event
    }

    /// Advance one step; clears the event-epoch flag for the new step.
    ///
    /// Time is derived from the step counter (`step_id * step`) rather
    /// than accumulated, so `time >= endtime` comparisons are not thrown
    /// off by summation error after thousands of steps.
    pub fn advance(&mut self) {
        self.step_id = StepId(self.step_id.0 + 1);
        self.time = self.step_id.0 as f64 * self.step;
        self.time_since_event += self.step;
        self.event_epoch = false;
    }

    /// Mark the current step as an event epoch and restart the
    /// time-since-event tracker.
    pub fn mark_event(&mut self) {
        self.event_epoch = true;
        self.time_since_event = 0.0;
    }
}
