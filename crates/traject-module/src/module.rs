//! The [`Module`] trait.

use crate::context::ModuleContext;
use crate::error::ModuleError;
use crate::phase::PhaseSet;
use traject_core::{SlotIdx, StoreError, VarStore};

/// A co-module demand: "this module only works if `module` is present
/// with at least `phases`".
///
/// Used for couplings the slot contract cannot express, e.g. a forces
/// module that consumes thrust requires a propulsion module that runs
/// `init` so mass is valid at the first `exec`.
#[derive(Clone, Debug, PartialEq)]
pub struct Requirement {
    /// Name of the required co-module.
    pub module: String,
    /// Phases the co-module must participate in.
    pub phases: PhaseSet,
}

/// One interchangeable physics module.
///
/// # Contract
///
/// - `def` declares every slot the module owns; it runs once, before any
///   other phase, and is the only place slots come into existence.
/// - `init` runs once after all `def`s and the scenario load; it may read
///   `data` slots and write owned slots to establish initial values —
///   including priming previous-derivative `save` slots so the first
///   trapezoidal step degenerates to forward Euler.
/// - `exec` runs every step in declared module order. It may read any
///   slot and write owned slots with role `state`/`save`/`out`/`diag`/
///   `exec`.
/// - Deterministic: the same input-slot values and step size must produce
///   the same output-slot values.
/// - No private mutable state: everything that persists between steps
///   lives in slots (`&self` receivers enforce this), which is what makes
///   rewind, introspection, and test harnesses possible.
///
/// # Object safety
///
/// The trait is object-safe; the scheduler stores modules as
/// `Vec<Box<dyn Module>>`.
pub trait Module {
    /// Module name, as referenced by the scenario `MODULES` section.
    fn name(&self) -> &str;

    /// Declare the slots this module owns.
    fn def(&self, store: &mut VarStore) -> Result<(), StoreError>;

    /// Slots this module reads that other modules own.
    ///
    /// Called once at startup by
    /// [`validate_pipeline`](crate::validate_pipeline), not per step;
    /// lets configuration errors (a consumer without its producer)
    /// surface before the first step instead of mid-run.
    fn reads(&self) -> Vec<SlotIdx> {
        Vec::new()
    }

    /// Co-module demands checked at startup.
    fn requires(&self) -> Vec<Requirement> {
        Vec::new()
    }

    /// Establish initial values. Default: nothing to initialize.
    fn init(&self, _ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Advance one step. Default: nothing to compute.
    fn exec(&self, _ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        Ok(())
    }
}
