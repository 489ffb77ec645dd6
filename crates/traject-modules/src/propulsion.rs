//! Constant-thrust rocket motor with fuel depletion.

use crate::slots::{FMASS0, FMASSD, FMASSE, FUEL_FLOW, MPROP, SPI, THRUST, VMASS, VMASS0};
use crate::AGRAV;
use traject_core::{OutputTags, Role, SlotDef, SlotKind, StoreError, VarStore};
use traject_module::{integrate, Module, ModuleContext, ModuleError};

/// Rocket motor parameterized by specific impulse and fuel flow.
///
/// While fuel remains: `thrust = spi · fuel_flow · g₀` and the expended
/// fuel mass integrates trapezoidally at the constant flow rate. At
/// depletion the motor status drops to 0, thrust to 0, and the vehicle
/// mass stays at `vmass0 − fmass0`.
pub struct RocketMotor;

impl RocketMotor {
    /// New motor module.
    pub fn new() -> Self {
        Self
    }
}

impl Default for RocketMotor {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for RocketMotor {
    fn name(&self) -> &str {
        "propulsion"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            MPROP,
            SlotDef::new(
                "mprop",
                SlotKind::Int,
                "Motor status (1=burning) - ND",
                self.name(),
                Role::Out,
                OutputTags::screen(),
            ),
        )?;
        store.define(
            SPI,
            SlotDef::new(
                "spi",
                SlotKind::Real,
                "Specific impulse - s",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )?;
        store.define(
            FUEL_FLOW,
            SlotDef::new(
                "fuel_flow_rate",
                SlotKind::Real,
                "Fuel flow rate - kg/s",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )?;
        store.define(
            FMASS0,
            SlotDef::new(
                "fmass0",
                SlotKind::Real,
                "Initial fuel mass - kg",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )?;
        store.define(
            VMASS0,
            SlotDef::new(
                "vmass0",
                SlotKind::Real,
                "Initial vehicle mass - kg",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )?;
        store.define(
            THRUST,
            SlotDef::new(
                "thrust",
                SlotKind::Real,
                "Thrust - N",
                self.name(),
                Role::Out,
                OutputTags::screen().and(OutputTags::plot()),
            ),
        )?;
        store.define(
            VMASS,
            SlotDef::new(
                "vmass",
                SlotKind::Real,
                "Vehicle mass - kg",
                self.name(),
                Role::Out,
                OutputTags::screen().and(OutputTags::plot()),
            ),
        )?;
        store.define(
            FMASSE,
            SlotDef::new(
                "fmasse",
                SlotKind::Real,
                "Fuel mass expended - kg",
                self.name(),
                Role::State,
                OutputTags::none(),
            ),
        )?;
        store.define(
            FMASSD,
            SlotDef::new(
                "fmassd",
                SlotKind::Real,
                "Previous fuel flow derivative - kg/s",
                self.name(),
                Role::Save,
                OutputTags::none(),
            ),
        )
    }

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let spi = ctx.read_real(SPI)?;
        let fuel_flow = ctx.read_real(FUEL_FLOW)?;
        let vmass0 = ctx.read_real(VMASS0)?;

        ctx.write_int(MPROP, 1)?;
        ctx.write_real(THRUST, spi * fuel_flow * AGRAV)?;
        ctx.write_real(VMASS, vmass0)?;
        // Prime the saved derivative so the first trapezoidal step of the
        // fuel integral degenerates to forward Euler at the burn rate.
        ctx.write_real(FMASSD, fuel_flow)
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let mprop = ctx.read_int(MPROP)?;
        if mprop == 0 {
            return Ok(());
        }

        let spi = ctx.read_real(SPI)?;
        let fuel_flow = ctx.read_real(FUEL_FLOW)?;
        let fmass0 = ctx.read_real(FMASS0)?;
        let vmass0 = ctx.read_real(VMASS0)?;
        let fmassd = ctx.read_real(FMASSD)?;
        let mut fmasse = ctx.read_real(FMASSE)?;

        fmasse = integrate(fuel_flow, fmassd, fmasse, ctx.step());

        if fmasse >= fmass0 {
            // Burnout: clamp the expenditure and shut down.
            fmasse = fmass0;
            ctx.write_int(MPROP, 0)?;
            ctx.write_real(THRUST, 0.0)?;
        } else {
            ctx.write_real(THRUST, spi * fuel_flow * AGRAV)?;
        }

        ctx.write_real(FMASSE, fmasse)?;
        ctx.write_real(FMASSD, fuel_flow)?;
        ctx.write_real(VMASS, vmass0 - fmasse)
    }
}
