//! traject: a modular fixed-step vehicle simulation framework.
//!
//! A simulation composes interchangeable physics modules — environment,
//! forces, propulsion, actuators, kinematics, sensors — that communicate
//! through a typed, index-addressed variable store and are driven by a
//! single-threaded fixed-step scheduler with event and termination
//! engines. This facade crate re-exports the public API of the
//! workspace; for most users a single `traject` dependency is enough.
//!
//! # Quick start
//!
//! ```rust
//! use traject::prelude::*;
//!
//! // Compose an unpowered ballistic vehicle from the module library.
//! let modules: Vec<(Box<dyn Module>, PhaseSet)> = vec![
//!     (Box::new(GravityConstant::default()), PhaseSet::def_exec()),
//!     (Box::new(AtmosphereConstant::default()), PhaseSet::def_exec()),
//!     (Box::new(PointMassForces::new()), PhaseSet::def_exec()),
//!     (Box::new(Kinematics::new()), PhaseSet::def_init_exec()),
//! ];
//! let config = SimConfig {
//!     title: "Lofted shot".to_string(),
//!     vehicle: "BALL".to_string(),
//!     modules,
//!     store_capacity: 250,
//!     dt: 0.01,
//!     output_step: 0.1,
//! };
//! let mut sched = Scheduler::new(config).unwrap();
//! sched.set_value(traject::modules::slots::VBEL3, SlotValue::Real(-35.36)).unwrap();
//! sched.set_value(traject::engine::scheduler::ENDTIME, SlotValue::Real(10.0)).unwrap();
//! sched.set_value(traject::engine::scheduler::MIN_ALT, SlotValue::Real(0.0)).unwrap();
//! sched.add_standard_terminators(Some(traject::modules::slots::ALTITUDE), None);
//! let summary = sched.run(&mut OutputSet::null()).unwrap();
//! assert_eq!(summary.reason, StopReason::Ground);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`math`] | `traject-math` | `Vec3`/`Mat3` algebra |
//! | [`types`] | `traject-core` | Slot model and the variable store |
//! | [`table`] | `traject-table` | Table lookup and deck loading |
//! | [`module`] | `traject-module` | The `Module` contract, contexts, integrators |
//! | [`modules`] | `traject-modules` | Reference physics module library |
//! | [`engine`] | `traject-engine` | Scheduler, events, termination |
//! | [`output`] | `traject-output` | Tab, plot, combus, and doc writers |
//! | [`scenario`] | `traject-scenario` | Scenario-file parsing and binding |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Slot model and the typed variable store (`traject-core`).
///
/// Aliased as `types` so the module does not shadow the `core` prelude
/// crate.
pub use traject_core as types;

/// Scheduler, event engine, and termination engine (`traject-engine`).
pub use traject_engine as engine;

/// Small dense vector/matrix algebra (`traject-math`).
pub use traject_math as math;

/// The module contract, phase contexts, and integrators (`traject-module`).
pub use traject_module as module;

/// Reference physics module library (`traject-modules`).
pub use traject_modules as modules;

/// Output writers (`traject-output`).
pub use traject_output as output;

/// Scenario-file parsing and binding (`traject-scenario`).
pub use traject_scenario as scenario;

/// Table lookup and deck loading (`traject-table`).
pub use traject_table as table;

/// Common imports for typical traject usage.
///
/// ```rust
/// use traject::prelude::*;
/// ```
pub mod prelude {
    // Store and slot model.
    pub use traject_core::{
        OutputTags, Phase, Role, SlotDef, SlotIdx, SlotKind, SlotValue, StepId, StoreError,
        VarStore,
    };

    // Math.
    pub use traject_math::{Mat3, MathError, Vec3};

    // Module contract.
    pub use traject_module::{
        integrate, integrate_mat3, integrate_vec3, Module, ModuleContext, ModuleError, PhaseSet,
    };

    // Engine.
    pub use traject_engine::{
        Assignment, ConfigError, Event, EventEngine, Relation, RunError, RunSummary, Scheduler,
        SimConfig, StepMetrics, StopReason, TerminationEngine, TerminatorSpec, Threshold,
    };

    // Tables.
    pub use traject_table::{Deck, Table, TableError};

    // Output.
    pub use traject_output::{ComWriter, DocWriter, OutputSet, PlotWriter, TabWriter};

    // Reference modules.
    pub use traject_modules::{
        AtmosphereConstant, GravityConstant, InterceptDetect, Kinematics, PointMassForces,
        RocketMotor, SeekerPerfect, TargetConstVelocity, TvcSecondOrder,
    };

    // Scenario loading.
    pub use traject_scenario::{build, ScenarioError, ScenarioSpec};
}
