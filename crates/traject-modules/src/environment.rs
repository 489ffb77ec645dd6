//! Environment modules: gravity and atmosphere.

use crate::slots::{GRAV, GRAV0, RHO, RHO0};
use traject_core::{OutputTags, Role, SlotDef, SlotKind, StoreError, VarStore};
use traject_module::{Module, ModuleContext, ModuleError};

/// Constant-gravity environment.
///
/// Publishes a flat-Earth gravity magnitude for the forces module. The
/// scenario may override the constant through the `grav0` data slot; a
/// zero override keeps the built-in value.
pub struct GravityConstant {
    grav: f64,
}

impl GravityConstant {
    /// Gravity with an explicit constant (0 models a gravity-free range).
    pub fn new(grav: f64) -> Self {
        Self { grav }
    }
}

impl Default for GravityConstant {
    fn default() -> Self {
        Self::new(9.81)
    }
}

impl Module for GravityConstant {
    fn name(&self) -> &str {
        "environment"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            GRAV,
            SlotDef::new(
                "grav",
                SlotKind::Real,
                "Gravity acceleration - m/s^2",
                self.name(),
                Role::Out,
                OutputTags::none(),
            ),
        )?;
        store.define(
            GRAV0,
            SlotDef::new(
                "grav0",
                SlotKind::Real,
                "Gravity override (0 = standard) - m/s^2",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let override_g = ctx.read_real(GRAV0)?;
        let grav = if override_g > 0.0 {
            override_g
        } else {
            self.grav
        };
        ctx.write_real(GRAV, grav)
    }
}

/// Constant-density atmosphere.
///
/// Publishes sea-level density unless the scenario overrides it through
/// `rho0`. Altitude-dependent models are interchangeable drop-ins that
/// write the same `rho` slot.
pub struct AtmosphereConstant {
    rho: f64,
}

impl AtmosphereConstant {
    /// Atmosphere with an explicit density.
    pub fn new(rho: f64) -> Self {
        Self { rho }
    }
}

impl Default for AtmosphereConstant {
    fn default() -> Self {
        Self::new(1.225)
    }
}

impl Module for AtmosphereConstant {
    fn name(&self) -> &str {
        "atmosphere"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            RHO,
            SlotDef::new(
                "rho",
                SlotKind::Real,
                "Air density - kg/m^3",
                self.name(),
                Role::Out,
                OutputTags::none(),
            ),
        )?;
        store.define(
            RHO0,
            SlotDef::new(
                "rho0",
                SlotKind::Real,
                "Density override (0 = sea level) - kg/m^3",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let override_rho = ctx.read_real(RHO0)?;
        let rho = if override_rho > 0.0 {
            override_rho
        } else {
            self.rho
        };
        ctx.write_real(RHO, rho)
    }
}
