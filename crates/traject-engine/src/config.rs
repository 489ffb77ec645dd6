//! Simulation configuration and its validation.

use std::error::Error;
use std::fmt;
use traject_core::StoreError;
use traject_module::{Module, PhaseSet, PipelineError};

/// Slots below this index are reserved for the scheduler's own use
/// (clock, stop flags, standard termination data).
pub const RESERVED_SLOTS: usize = 10;

/// Errors detected before the first step runs.
#[derive(Debug)]
pub enum ConfigError {
    /// Module pipeline validation failed.
    Pipeline(PipelineError),
    /// A module's `def` failed (duplicate slot, capacity overflow, …).
    Store(StoreError),
    /// dt is NaN, infinite, zero, or negative.
    InvalidStep {
        /// The invalid value.
        value: f64,
    },
    /// Output cadence is not a positive multiple of dt.
    InvalidOutputStep {
        /// The configured cadence.
        output_step: f64,
        /// The configured dt.
        dt: f64,
    },
    /// Store capacity too small for the reserved executive slots.
    CapacityTooSmall {
        /// The configured capacity.
        configured: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pipeline(e) => write!(f, "pipeline: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::InvalidStep { value } => {
                write!(f, "integration step must be finite and positive, got {value}")
            }
            Self::InvalidOutputStep { output_step, dt } => write!(
                f,
                "output step {output_step} is not a positive multiple of dt {dt}"
            ),
            Self::CapacityTooSmall { configured } => write!(
                f,
                "store capacity {configured} is below the reserved minimum {RESERVED_SLOTS}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pipeline(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PipelineError> for ConfigError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

impl From<StoreError> for ConfigError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Complete configuration for one vehicle's simulation.
///
/// Consumed by [`Scheduler::new`](crate::Scheduler::new), which runs the
/// def phase and pipeline validation; events, terminators, data values,
/// and decks are bound afterwards through the scheduler's load surface.
pub struct SimConfig {
    /// Run title (banner line of the tab and plot files).
    pub title: String,
    /// Vehicle name.
    pub vehicle: String,
    /// Modules in declared execution order, each with its phase set.
    pub modules: Vec<(Box<dyn Module>, PhaseSet)>,
    /// Fixed slot-store capacity.
    pub store_capacity: usize,
    /// Integration step in seconds.
    pub dt: f64,
    /// Output cadence in seconds; must be a positive multiple of `dt`.
    pub output_step: f64,
}

impl SimConfig {
    /// Structural validation that needs no store: step sizes and
    /// capacity. Pipeline checks run in the scheduler constructor once
    /// the def phase has populated the store.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidStep { value: self.dt });
        }
        if !self.output_step.is_finite() || self.output_step <= 0.0 {
            return Err(ConfigError::InvalidOutputStep {
                output_step: self.output_step,
                dt: self.dt,
            });
        }
        let ratio = self.output_step / self.dt;
        if (ratio - ratio.round()).abs() > 1e-6 || ratio.round() < 1.0 {
            return Err(ConfigError::InvalidOutputStep {
                output_step: self.output_step,
                dt: self.dt,
            });
        }
        if self.store_capacity < RESERVED_SLOTS {
            return Err(ConfigError::CapacityTooSmall {
                configured: self.store_capacity,
            });
        }
        Ok(())
    }

    /// Output cadence in whole steps.
    pub(crate) fn steps_per_output(&self) -> u64 {
        (self.output_step / self.dt).round() as u64
    }
}

impl fmt::Debug for SimConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimConfig")
            .field("title", &self.title)
            .field("vehicle", &self.vehicle)
            .field("modules", &self.modules.len())
            .field("store_capacity", &self.store_capacity)
            .field("dt", &self.dt)
            .field("output_step", &self.output_step)
            .finish()
    }
}
