//! The traject scheduler and its step-boundary machinery.
//!
//! [`Scheduler`] drives a vehicle's module pipeline at a fixed integration
//! step: `def` → load → `init` → banner → step loop → teardown. Between
//! steps the [`EventEngine`] watches declared slots for threshold
//! crossings and the [`TerminationEngine`] evaluates stop predicates in
//! declared order; output writers snapshot flagged slots on a fixed
//! cadence.
//!
//! Execution is single-threaded and cooperative: modules run in declared
//! order, a later module sees an earlier module's same-step outputs, and
//! an earlier module sees the previous step's (the one-step-lag contract
//! interchangeable modules rely on).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod event;
pub mod metrics;
pub mod scheduler;
pub mod termination;

pub use clock::SimClock;
pub use config::{ConfigError, SimConfig};
pub use event::{Assignment, Event, EventEngine, EventError, Relation};
pub use metrics::StepMetrics;
pub use scheduler::{RunError, RunSummary, Scheduler, EXECUTIVE};
pub use termination::{
    StopReason, TerminationEngine, TerminationError, TerminatorSpec, Threshold,
};
