//! Execution context handed to module `init` and `exec` entry points.

use crate::error::ModuleError;
use traject_core::{SlotIdx, SlotValue, StepId, VarStore};
use traject_math::{Mat3, Vec3};
use traject_table::Deck;

/// What a module sees during a phase call: the store (reads unrestricted,
/// writes scoped to the module), the table deck, and the clock.
///
/// Writes go through [`VarStore::module_write`], so ownership and role
/// rules are enforced here and not re-checked by each module.
pub struct ModuleContext<'a> {
    store: &'a mut VarStore,
    deck: &'a Deck,
    module: &'a str,
    sim_time: f64,
    step: f64,
    step_id: StepId,
}

impl<'a> ModuleContext<'a> {
    /// Construct a context scoped to one module. Called by the scheduler.
    pub fn new(
        store: &'a mut VarStore,
        deck: &'a Deck,
        module: &'a str,
        sim_time: f64,
        step: f64,
        step_id: StepId,
    ) -> Self {
        Self {
            store,
            deck,
            module,
            sim_time,
            step,
            step_id,
        }
    }

    /// The module this context is scoped to.
    pub fn module(&self) -> &str {
        self.module
    }

    /// Simulation time in seconds at the start of the current step.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Integration step in seconds.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Step counter (0 during init).
    pub fn step_id(&self) -> StepId {
        self.step_id
    }

    /// The loaded table deck.
    pub fn deck(&self) -> &Deck {
        self.deck
    }

    // ── Reads (any slot) ───────────────────────────────────────────

    /// Read a scalar slot.
    pub fn read_real(&self, index: SlotIdx) -> Result<f64, ModuleError> {
        Ok(self.store.read_real(index)?)
    }

    /// Read an integer slot.
    pub fn read_int(&self, index: SlotIdx) -> Result<i64, ModuleError> {
        Ok(self.store.read_int(index)?)
    }

    /// Read a vector slot.
    pub fn read_vec3(&self, index: SlotIdx) -> Result<Vec3, ModuleError> {
        Ok(self.store.read_vec3(index)?)
    }

    /// Read a matrix slot.
    pub fn read_mat3(&self, index: SlotIdx) -> Result<Mat3, ModuleError> {
        Ok(self.store.read_mat3(index)?)
    }

    // ── Writes (owned slots only) ──────────────────────────────────

    /// Write a scalar slot owned by this module.
    pub fn write_real(&mut self, index: SlotIdx, value: f64) -> Result<(), ModuleError> {
        Ok(self
            .store
            .module_write(index, SlotValue::Real(value), self.module)?)
    }

    /// Write an integer slot owned by this module.
    pub fn write_int(&mut self, index: SlotIdx, value: i64) -> Result<(), ModuleError> {
        Ok(self
            .store
            .module_write(index, SlotValue::Int(value), self.module)?)
    }

    /// Write a vector slot owned by this module.
    pub fn write_vec3(&mut self, index: SlotIdx, value: Vec3) -> Result<(), ModuleError> {
        Ok(self
            .store
            .module_write(index, SlotValue::Vec3(value), self.module)?)
    }

    /// Write a matrix slot owned by this module.
    pub fn write_mat3(&mut self, index: SlotIdx, value: Mat3) -> Result<(), ModuleError> {
        Ok(self
            .store
            .module_write(index, SlotValue::Mat3(value), self.module)?)
    }
}
