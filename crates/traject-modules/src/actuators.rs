//! Thrust-vector-control actuator with second-order nozzle dynamics.

use crate::slots::{
    DELECX, DELRCX, DETAS, DETASD, DTVCLIMX, DZETA, DZETAD, ETAS, ETASD, ETAX, FMPB, FPB, GTVC,
    MTVC, PARM, THRUST, TVCLIMX, WNTVC, ZETAS, ZETAD, ZETTVC, ZETX,
};
use crate::{DEG, RAD};
use traject_core::{OutputTags, Role, SlotDef, SlotIdx, SlotKind, StoreError, VarStore};
use traject_math::Vec3;
use traject_module::{integrate, Module, ModuleContext, ModuleError};

/// Converts pitch/yaw deflection commands into nozzle deflections and
/// the resulting thrust force and moment in body axes.
///
/// Modes: 0 — TVC off; 1 — no dynamics (deflection follows the command
/// instantly); 2 — second-order nozzle dynamics
/// `η̈ = ωₙ²(η_c − η) − 2ζωₙη̇` with position and rate limiting.
pub struct TvcSecondOrder;

impl TvcSecondOrder {
    /// New TVC module.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TvcSecondOrder {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot quad of one nozzle channel: position, saved position derivative,
/// rate, saved rate derivative.
struct Channel {
    pos: SlotIdx,
    pos_deriv: SlotIdx,
    rate: SlotIdx,
    rate_deriv: SlotIdx,
}

const PITCH: Channel = Channel {
    pos: ETAS,
    pos_deriv: ETASD,
    rate: DETAS,
    rate_deriv: DETASD,
};

const YAW: Channel = Channel {
    pos: ZETAS,
    pos_deriv: ZETAD,
    rate: DZETA,
    rate_deriv: DZETAD,
};

impl TvcSecondOrder {
    /// Advance one second-order channel and return the new deflection.
    fn second_order(
        &self,
        ctx: &mut ModuleContext<'_>,
        channel: &Channel,
        command: f64,
        limit: f64,
        rate_limit: f64,
        wn: f64,
        zeta: f64,
    ) -> Result<f64, ModuleError> {
        let mut pos = ctx.read_real(channel.pos)?;
        let pos_deriv = ctx.read_real(channel.pos_deriv)?;
        let mut rate = ctx.read_real(channel.rate)?;
        let rate_deriv = ctx.read_real(channel.rate_deriv)?;

        // Position limiting; stop the rate if it drives into the limit.
        if pos.abs() > limit {
            pos = limit * pos.signum();
            if pos * rate > 0.0 {
                rate = 0.0;
            }
        }

        // Rate limiting.
        let rate_limited = rate.abs() > rate_limit;
        if rate_limited {
            rate = rate_limit * rate.signum();
        }

        // Position integrates the (possibly limited) rate.
        let pos_deriv_new = rate;
        pos = integrate(pos_deriv_new, pos_deriv, pos, ctx.step());
        ctx.write_real(channel.pos, pos)?;
        ctx.write_real(channel.pos_deriv, pos_deriv_new)?;

        // Second-order acceleration toward the command.
        let error = command - pos;
        let mut rate_deriv_new = wn * wn * error - 2.0 * zeta * wn * pos_deriv_new;
        rate = integrate(rate_deriv_new, rate_deriv, rate, ctx.step());
        // Hold acceleration while saturated and still accelerating.
        if rate_limited && rate * rate_deriv_new > 0.0 {
            rate_deriv_new = 0.0;
        }
        ctx.write_real(channel.rate, rate)?;
        ctx.write_real(channel.rate_deriv, rate_deriv_new)?;

        Ok(pos)
    }
}

impl Module for TvcSecondOrder {
    fn name(&self) -> &str {
        "tvc"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            MTVC,
            SlotDef::new(
                "mtvc",
                SlotKind::Int,
                "TVC mode: 0 off, 1 no dynamics, 2 second order - ND",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )?;
        let data: [(SlotIdx, &str, &str); 6] = [
            (GTVC, "gtvc", "TVC nozzle deflection gain - ND"),
            (TVCLIMX, "tvclimx", "Nozzle deflection limiter - deg"),
            (DTVCLIMX, "dtvclimx", "Nozzle deflection rate limiter - deg/s"),
            (WNTVC, "wntvc", "Natural frequency of TVC - rad/s"),
            (ZETTVC, "zettvc", "Damping of TVC - ND"),
            (PARM, "parm", "Propulsion moment arm to the cg - m"),
        ];
        for (idx, name, definition) in data {
            store.define(
                idx,
                SlotDef::new(
                    name,
                    SlotKind::Real,
                    definition,
                    self.name(),
                    Role::Data,
                    OutputTags::none(),
                ),
            )?;
        }
        for (idx, name, definition) in [
            (DELECX, "delecx", "Pitch deflection command - deg"),
            (DELRCX, "delrcx", "Yaw deflection command - deg"),
        ] {
            store.define(
                idx,
                SlotDef::new(
                    name,
                    SlotKind::Real,
                    definition,
                    self.name(),
                    Role::Data,
                    OutputTags::none(),
                ),
            )?;
        }
        store.define(
            ETAX,
            SlotDef::new(
                "etax",
                SlotKind::Real,
                "Nozzle pitch deflection - deg",
                self.name(),
                Role::Diag,
                OutputTags::plot(),
            ),
        )?;
        store.define(
            ZETX,
            SlotDef::new(
                "zetx",
                SlotKind::Real,
                "Nozzle yaw deflection - deg",
                self.name(),
                Role::Diag,
                OutputTags::plot(),
            ),
        )?;
        store.define(
            FPB,
            SlotDef::new(
                "FPB",
                SlotKind::Vec3,
                "Thrust force in body axes - N",
                self.name(),
                Role::Out,
                OutputTags::none(),
            ),
        )?;
        store.define(
            FMPB,
            SlotDef::new(
                "FMPB",
                SlotKind::Vec3,
                "Thrust moment in body axes - Nm",
                self.name(),
                Role::Out,
                OutputTags::none(),
            ),
        )?;
        let states: [(SlotIdx, &str, &str); 8] = [
            (ETAS, "etas", "Pitch nozzle deflection - rad"),
            (ETASD, "etasd", "Pitch nozzle derivative - rad/s"),
            (DETAS, "detas", "Pitch nozzle rate - rad/s"),
            (DETASD, "detasd", "Pitch nozzle rate derivative - rad/s^2"),
            (ZETAS, "zetas", "Yaw nozzle deflection - rad"),
            (ZETAD, "zetad", "Yaw nozzle derivative - rad/s"),
            (DZETA, "dzeta", "Yaw nozzle rate - rad/s"),
            (DZETAD, "dzetad", "Yaw nozzle rate derivative - rad/s^2"),
        ];
        for (idx, name, definition) in states {
            store.define(
                idx,
                SlotDef::new(
                    name,
                    SlotKind::Real,
                    definition,
                    self.name(),
                    Role::State,
                    OutputTags::none(),
                ),
            )?;
        }
        Ok(())
    }

    fn reads(&self) -> Vec<SlotIdx> {
        vec![THRUST]
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let mtvc = ctx.read_int(MTVC)?;
        if mtvc == 0 {
            return Ok(());
        }

        let gtvc = ctx.read_real(GTVC)?;
        let parm = ctx.read_real(PARM)?;
        let thrust = ctx.read_real(THRUST)?;
        let etac = gtvc * ctx.read_real(DELECX)? * RAD;
        let zetc = gtvc * ctx.read_real(DELRCX)? * RAD;

        let (eta, zet) = if mtvc == 1 {
            (etac, zetc)
        } else {
            let limit = ctx.read_real(TVCLIMX)? * RAD;
            let rate_limit = ctx.read_real(DTVCLIMX)? * RAD;
            let wn = ctx.read_real(WNTVC)?;
            let zeta = ctx.read_real(ZETTVC)?;
            let eta = self.second_order(ctx, &PITCH, etac, limit, rate_limit, wn, zeta)?;
            let zet = self.second_order(ctx, &YAW, zetc, limit, rate_limit, wn, zeta)?;
            (eta, zet)
        };

        let (seta, ceta) = eta.sin_cos();
        let (szet, czet) = zet.sin_cos();
        let fpb = Vec3::new(ceta * czet * thrust, ceta * szet * thrust, -seta * thrust);
        let fmpb = Vec3::new(0.0, parm * fpb.z(), -parm * fpb.y());

        ctx.write_vec3(FPB, fpb)?;
        ctx.write_vec3(FMPB, fmpb)?;
        ctx.write_real(ETAX, eta * DEG)?;
        ctx.write_real(ZETX, zet * DEG)
    }
}
