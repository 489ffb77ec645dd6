//! Point-mass translational kinematics.

use crate::slots::{
    ACC_PREV, ALTITUDE, FSPE, SBEL, SBEL1, SBEL2, SBEL3, VBEL, VBEL1, VBEL2, VBEL3,
};
use traject_core::{OutputTags, Role, SlotDef, SlotIdx, SlotKind, StoreError, VarStore};
use traject_math::Vec3;
use traject_module::{integrate_vec3, Module, ModuleContext, ModuleError};

/// Integrates position and velocity in the Earth frame (x east, y north,
/// z down) from the specific force published by the forces module.
///
/// Velocity advances by the trapezoid of the current and previous-step
/// specific force; position by the trapezoid of the new and old velocity.
/// On the first step the previous specific force is seeded with the
/// current one, so the opening step is forward Euler.
pub struct Kinematics;

impl Kinematics {
    /// New kinematics module.
    pub fn new() -> Self {
        Self
    }
}

impl Default for Kinematics {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Kinematics {
    fn name(&self) -> &str {
        "kinematics"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            SBEL,
            SlotDef::new(
                "SBEL",
                SlotKind::Vec3,
                "Position in Earth frame - m",
                self.name(),
                Role::State,
                OutputTags::plot(),
            ),
        )?;
        store.define(
            VBEL,
            SlotDef::new(
                "VBEL",
                SlotKind::Vec3,
                "Velocity in Earth frame - m/s",
                self.name(),
                Role::State,
                OutputTags::plot(),
            ),
        )?;
        store.define(
            ALTITUDE,
            SlotDef::new(
                "altitude",
                SlotKind::Real,
                "Altitude above ground - m",
                self.name(),
                Role::Out,
                OutputTags::screen().and(OutputTags::plot()),
            ),
        )?;
        let init_components: [(SlotIdx, &str, &str); 6] = [
            (SBEL1, "sbel1", "Initial position east - m"),
            (SBEL2, "sbel2", "Initial position north - m"),
            (SBEL3, "sbel3", "Initial position down - m"),
            (VBEL1, "vbel1", "Initial velocity east - m/s"),
            (VBEL2, "vbel2", "Initial velocity north - m/s"),
            (VBEL3, "vbel3", "Initial velocity down - m/s"),
        ];
        for (idx, name, definition) in init_components {
            store.define(
                idx,
                SlotDef::new(
                    name,
                    SlotKind::Real,
                    definition,
                    self.name(),
                    Role::Init,
                    OutputTags::none(),
                ),
            )?;
        }
        store.define(
            ACC_PREV,
            SlotDef::new(
                "AELP",
                SlotKind::Vec3,
                "Previous-step specific force - m/s^2",
                self.name(),
                Role::Save,
                OutputTags::none(),
            ),
        )
    }

    fn reads(&self) -> Vec<SlotIdx> {
        vec![FSPE]
    }

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let sbel = Vec3::new(
            ctx.read_real(SBEL1)?,
            ctx.read_real(SBEL2)?,
            ctx.read_real(SBEL3)?,
        );
        let vbel = Vec3::new(
            ctx.read_real(VBEL1)?,
            ctx.read_real(VBEL2)?,
            ctx.read_real(VBEL3)?,
        );
        ctx.write_vec3(SBEL, sbel)?;
        ctx.write_vec3(VBEL, vbel)?;
        ctx.write_real(ALTITUDE, -sbel.z())
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let fspe = ctx.read_vec3(FSPE)?;
        let vbel_old = ctx.read_vec3(VBEL)?;
        let sbel_old = ctx.read_vec3(SBEL)?;

        // First step: the forces module has produced its first value this
        // step, so the saved derivative seeds from it (forward Euler).
        let acc_prev = if ctx.step_id().0 == 0 {
            fspe
        } else {
            ctx.read_vec3(ACC_PREV)?
        };

        let vbel = integrate_vec3(&fspe, &acc_prev, &vbel_old, ctx.step());
        let sbel = integrate_vec3(&vbel, &vbel_old, &sbel_old, ctx.step());

        ctx.write_vec3(VBEL, vbel)?;
        ctx.write_vec3(SBEL, sbel)?;
        ctx.write_vec3(ACC_PREV, fspe)?;
        ctx.write_real(ALTITUDE, -sbel.z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traject_core::{Phase, SlotValue, StepId};
    use traject_table::Deck;

    fn store_with_fspe(accel_down: f64) -> VarStore {
        let mut store = VarStore::new(64);
        Kinematics::new().def(&mut store).unwrap();
        store
            .define(
                FSPE,
                SlotDef::new(
                    "FSPE",
                    SlotKind::Vec3,
                    "Specific force - m/s^2",
                    "forces",
                    Role::Out,
                    OutputTags::none(),
                ),
            )
            .unwrap();
        store.set_phase(Phase::Load);
        store
            .store_write(FSPE, SlotValue::Vec3(Vec3::new(0.0, 0.0, accel_down)))
            .unwrap();
        store
    }

    #[test]
    fn init_builds_state_from_components() {
        let mut store = store_with_fspe(0.0);
        store.store_write(SBEL3, SlotValue::Real(-100.0)).unwrap();
        store.store_write(VBEL1, SlotValue::Real(35.36)).unwrap();
        store.set_phase(Phase::Init);
        let deck = Deck::new();
        let module = Kinematics::new();
        let mut ctx = ModuleContext::new(&mut store, &deck, "kinematics", 0.0, 0.01, StepId(0));
        module.init(&mut ctx).unwrap();
        assert_eq!(store.read_real(ALTITUDE).unwrap(), 100.0);
        assert_eq!(store.read_vec3(VBEL).unwrap(), Vec3::new(35.36, 0.0, 0.0));
    }

    #[test]
    fn constant_acceleration_integrates_exactly() {
        // Free fall from rest under 10 m/s² down: after n steps of dt,
        // v = 10 t exactly; s = 5 t² exactly (trapezoid is exact for
        // linear-in-t integrands).
        let mut store = store_with_fspe(10.0);
        store.set_phase(Phase::Exec);
        let deck = Deck::new();
        let module = Kinematics::new();
        let dt = 0.1;
        for k in 0..10u64 {
            let mut ctx =
                ModuleContext::new(&mut store, &deck, "kinematics", k as f64 * dt, dt, StepId(k));
            module.exec(&mut ctx).unwrap();
        }
        let t = 1.0;
        let v = store.read_vec3(VBEL).unwrap();
        let s = store.read_vec3(SBEL).unwrap();
        assert!((v.z() - 10.0 * t).abs() < 1e-12);
        assert!((s.z() - 5.0 * t * t).abs() < 1e-12);
        assert!((store.read_real(ALTITUDE).unwrap() + 5.0).abs() < 1e-12);
    }
}
