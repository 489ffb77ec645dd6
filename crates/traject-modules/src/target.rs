//! Constant-velocity target.

use crate::slots::{STEL, STEL1, STEL2, STEL3, VTEL1, VTEL2, VTEL3};
use traject_core::{OutputTags, Role, SlotDef, SlotIdx, SlotKind, StoreError, VarStore};
use traject_math::Vec3;
use traject_module::{integrate_vec3, Module, ModuleContext, ModuleError};

/// Propagates a target on a straight constant-velocity track.
///
/// The velocity is a `data` parameter, so the derivative is constant and
/// the trapezoid is exact; no priming slot is needed.
pub struct TargetConstVelocity;

impl TargetConstVelocity {
    /// New target module.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TargetConstVelocity {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetConstVelocity {
    fn velocity(ctx: &ModuleContext<'_>) -> Result<Vec3, ModuleError> {
        Ok(Vec3::new(
            ctx.read_real(VTEL1)?,
            ctx.read_real(VTEL2)?,
            ctx.read_real(VTEL3)?,
        ))
    }
}

impl Module for TargetConstVelocity {
    fn name(&self) -> &str {
        "target"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            STEL,
            SlotDef::new(
                "STEL",
                SlotKind::Vec3,
                "Target position in Earth frame - m",
                self.name(),
                Role::State,
                OutputTags::plot(),
            ),
        )?;
        let components: [(SlotIdx, &str, &str, Role); 6] = [
            (STEL1, "stel1", "Initial target position east - m", Role::Init),
            (STEL2, "stel2", "Initial target position north - m", Role::Init),
            (STEL3, "stel3", "Initial target position down - m", Role::Init),
            (VTEL1, "vtel1", "Target velocity east - m/s", Role::Data),
            (VTEL2, "vtel2", "Target velocity north - m/s", Role::Data),
            (VTEL3, "vtel3", "Target velocity down - m/s", Role::Data),
        ];
        for (idx, name, definition, role) in components {
            store.define(
                idx,
                SlotDef::new(
                    name,
                    SlotKind::Real,
                    definition,
                    self.name(),
                    role,
                    OutputTags::none(),
                ),
            )?;
        }
        Ok(())
    }

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let stel = Vec3::new(
            ctx.read_real(STEL1)?,
            ctx.read_real(STEL2)?,
            ctx.read_real(STEL3)?,
        );
        ctx.write_vec3(STEL, stel)
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let vtel = Self::velocity(ctx)?;
        let stel = ctx.read_vec3(STEL)?;
        let stel = integrate_vec3(&vtel, &vtel, &stel, ctx.step());
        ctx.write_vec3(STEL, stel)
    }
}
