//! Point-mass force summation: drag, thrust, gravity.

use crate::slots::{AREA, CD, DVBE, FSPE, GRAV, RHO, THRUST, VBEL, VMASS};
use traject_core::{OutputTags, Role, SlotDef, SlotIdx, SlotKind, StoreError, VarStore};
use traject_math::Vec3;
use traject_module::{Module, ModuleContext, ModuleError, PhaseSet, Requirement};

/// Below this speed the velocity unit vector is zeroed instead of
/// dividing by a vanishing norm.
const SPEED_EPS: f64 = 0.1;

/// Sums drag, thrust, and gravity into the specific force driving the
/// kinematics module.
///
/// Drag opposes the velocity; thrust acts along it (the point-mass
/// convention — attitude belongs to the 6-DoF force module). Gravity is
/// +z in the z-down Earth frame. Without a propulsion module the vehicle
/// is unpowered unit mass.
pub struct PointMassForces {
    propulsion: bool,
}

impl PointMassForces {
    /// Unpowered configuration: no thrust, unit mass.
    pub fn new() -> Self {
        Self { propulsion: false }
    }

    /// Powered configuration: consumes `thrust` and `vmass` from the
    /// propulsion module, whose `init` must have run before the first
    /// step (mass is a divisor).
    pub fn with_propulsion() -> Self {
        Self { propulsion: true }
    }
}

impl Default for PointMassForces {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for PointMassForces {
    fn name(&self) -> &str {
        "forces"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            CD,
            SlotDef::new(
                "cd",
                SlotKind::Real,
                "Drag coefficient - ND",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )?;
        store.define(
            AREA,
            SlotDef::new(
                "area",
                SlotKind::Real,
                "Reference area - m^2",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )?;
        store.define(
            DVBE,
            SlotDef::new(
                "dvbe",
                SlotKind::Real,
                "Speed - m/s",
                self.name(),
                Role::Out,
                OutputTags::screen().and(OutputTags::plot()),
            ),
        )?;
        store.define(
            FSPE,
            SlotDef::new(
                "FSPE",
                SlotKind::Vec3,
                "Specific force in Earth frame - m/s^2",
                self.name(),
                Role::Out,
                OutputTags::none(),
            ),
        )
    }

    fn reads(&self) -> Vec<SlotIdx> {
        let mut slots = vec![GRAV, RHO, VBEL];
        if self.propulsion {
            slots.push(THRUST);
            slots.push(VMASS);
        }
        slots
    }

    fn requires(&self) -> Vec<Requirement> {
        if self.propulsion {
            vec![Requirement {
                module: "propulsion".to_string(),
                phases: PhaseSet::def_init_exec(),
            }]
        } else {
            Vec::new()
        }
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let cd = ctx.read_real(CD)?;
        let area = ctx.read_real(AREA)?;
        let grav = ctx.read_real(GRAV)?;
        let rho = ctx.read_real(RHO)?;
        let vbel = ctx.read_vec3(VBEL)?;

        let dvbe = vbel.norm();
        let drag = 0.5 * rho * dvbe * dvbe * cd * area;

        let unit = if dvbe > SPEED_EPS {
            vbel.scale(1.0 / dvbe)
        } else {
            Vec3::zero()
        };

        let (thrust, mass) = if self.propulsion {
            (ctx.read_real(THRUST)?, ctx.read_real(VMASS)?)
        } else {
            (0.0, 1.0)
        };

        let mut fspe = unit.scale((thrust - drag) / mass);
        fspe[2] += grav;

        ctx.write_real(DVBE, dvbe)?;
        ctx.write_vec3(FSPE, fspe)
    }
}
