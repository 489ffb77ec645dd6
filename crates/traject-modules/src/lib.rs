//! Reference physics module library.
//!
//! Interchangeable implementations of the physical subsystems a scenario
//! composes: environment, aerodynamic forces, propulsion, actuators,
//! kinematics, targets, sensors. Every module follows the `def`/`init`/
//! `exec` contract, owns a documented index range (see [`slots`]), keeps
//! all state in the variable store, and integrates exclusively through
//! the trapezoidal integrators.
//!
//! Modules communicate by slot index — the index map in [`slots`] is the
//! wire contract that makes a drag model from one library composable with
//! a kinematics model from another.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod actuators;
pub mod environment;
pub mod forces;
pub mod intercept;
pub mod kinematics;
pub mod propulsion;
pub mod seeker;
pub mod slots;
pub mod target;

pub use actuators::TvcSecondOrder;
pub use environment::{AtmosphereConstant, GravityConstant};
pub use forces::PointMassForces;
pub use intercept::InterceptDetect;
pub use kinematics::Kinematics;
pub use propulsion::RocketMotor;
pub use seeker::SeekerPerfect;
pub use target::TargetConstVelocity;

use traject_module::Module;

/// Standard gravity used for thrust from specific impulse, m/s².
pub const AGRAV: f64 = 9.80665;

/// Degrees to radians.
pub const RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees.
pub const DEG: f64 = 180.0 / std::f64::consts::PI;

/// Construct a library module by its scenario name.
///
/// `module_names` is the full `MODULES` list of the scenario; couplings
/// that depend on the composition are resolved here (a forces module
/// consumes thrust and mass only when a propulsion module is present).
/// Returns `None` for names this library does not provide.
pub fn build_module(name: &str, module_names: &[String]) -> Option<Box<dyn Module>> {
    let has = |n: &str| module_names.iter().any(|m| m == n);
    match name {
        "environment" => Some(Box::new(GravityConstant::default())),
        "atmosphere" => Some(Box::new(AtmosphereConstant::default())),
        "kinematics" => Some(Box::new(Kinematics::new())),
        "forces" => Some(Box::new(if has("propulsion") {
            PointMassForces::with_propulsion()
        } else {
            PointMassForces::new()
        })),
        "propulsion" => Some(Box::new(RocketMotor::new())),
        "tvc" => Some(Box::new(TvcSecondOrder::new())),
        "target" => Some(Box::new(TargetConstVelocity::new())),
        "seeker" => Some(Box::new(SeekerPerfect::new())),
        "intercept" => Some(Box::new(InterceptDetect::new())),
        _ => None,
    }
}
