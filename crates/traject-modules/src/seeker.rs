//! Perfect (error-free) seeker geometry.

use crate::slots::{DTA, DVTA, SBEL, STEL, UTBL, VBEL, VTEL1, VTEL2, VTEL3};
use traject_core::{OutputTags, Role, SlotDef, SlotIdx, SlotKind, StoreError, VarStore};
use traject_math::Vec3;
use traject_module::{Module, ModuleContext, ModuleError};

/// Below this range the unit line-of-sight vector is zeroed instead of
/// dividing by a vanishing separation.
const RANGE_EPS: f64 = 0.1;

/// Publishes truth-level engagement geometry: range to target, closing
/// velocity, and the unit line-of-sight vector.
///
/// "Perfect" means no noise, latency, or field-of-view limits — the
/// interchangeable slot contract a noisy seeker would also satisfy.
pub struct SeekerPerfect;

impl SeekerPerfect {
    /// New seeker module.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SeekerPerfect {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for SeekerPerfect {
    fn name(&self) -> &str {
        "seeker"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            DTA,
            SlotDef::new(
                "dta",
                SlotKind::Real,
                "Range to target - m",
                self.name(),
                Role::Out,
                OutputTags::screen().and(OutputTags::plot()),
            ),
        )?;
        store.define(
            DVTA,
            SlotDef::new(
                "dvta",
                SlotKind::Real,
                "Closing velocity (positive closing) - m/s",
                self.name(),
                Role::Out,
                OutputTags::plot(),
            ),
        )?;
        store.define(
            UTBL,
            SlotDef::new(
                "UTBL",
                SlotKind::Vec3,
                "Unit line-of-sight vector - ND",
                self.name(),
                Role::Out,
                OutputTags::none(),
            ),
        )
    }

    fn reads(&self) -> Vec<SlotIdx> {
        vec![STEL, SBEL, VBEL, VTEL1, VTEL2, VTEL3]
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let stel = ctx.read_vec3(STEL)?;
        let sbel = ctx.read_vec3(SBEL)?;
        let vbel = ctx.read_vec3(VBEL)?;
        let vtel = Vec3::new(
            ctx.read_real(VTEL1)?,
            ctx.read_real(VTEL2)?,
            ctx.read_real(VTEL3)?,
        );

        let stbl = stel - sbel;
        let dta = stbl.norm();
        let utbl = if dta > RANGE_EPS {
            stbl.scale(1.0 / dta)
        } else {
            Vec3::zero()
        };
        // Range rate is (relative velocity) · (unit LOS); closing is its
        // negation.
        let dvta = -(vtel - vbel).dot(&utbl);

        ctx.write_real(DTA, dta)?;
        ctx.write_real(DVTA, dvta)?;
        ctx.write_vec3(UTBL, utbl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traject_core::{Phase, SlotValue, StepId};
    use traject_table::Deck;

    fn geometry_store(vehicle: Vec3, vehicle_vel: Vec3, target: Vec3) -> VarStore {
        let mut store = VarStore::new(160);
        SeekerPerfect::new().def(&mut store).unwrap();
        for (idx, name, kind) in [
            (STEL, "STEL", SlotKind::Vec3),
            (SBEL, "SBEL", SlotKind::Vec3),
            (VBEL, "VBEL", SlotKind::Vec3),
        ] {
            store
                .define(
                    idx,
                    SlotDef::new(name, kind, "x", "other", Role::State, OutputTags::none()),
                )
                .unwrap();
        }
        for (idx, name) in [(VTEL1, "vtel1"), (VTEL2, "vtel2"), (VTEL3, "vtel3")] {
            store
                .define(
                    idx,
                    SlotDef::new(
                        name,
                        SlotKind::Real,
                        "x",
                        "other",
                        Role::Data,
                        OutputTags::none(),
                    ),
                )
                .unwrap();
        }
        store.set_phase(Phase::Load);
        store.store_write(STEL, SlotValue::Vec3(target)).unwrap();
        store.store_write(SBEL, SlotValue::Vec3(vehicle)).unwrap();
        store
            .store_write(VBEL, SlotValue::Vec3(vehicle_vel))
            .unwrap();
        store.set_phase(Phase::Exec);
        store
    }

    fn exec(store: &mut VarStore) {
        let deck = Deck::new();
        let module = SeekerPerfect::new();
        let mut ctx = ModuleContext::new(store, &deck, "seeker", 0.0, 0.01, StepId(0));
        module.exec(&mut ctx).unwrap();
    }

    #[test]
    fn head_on_closing_velocity_is_vehicle_speed() {
        let mut store = geometry_store(
            Vec3::zero(),
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(1000.0, 0.0, 0.0),
        );
        exec(&mut store);
        assert_eq!(store.read_real(DTA).unwrap(), 1000.0);
        assert_eq!(store.read_real(DVTA).unwrap(), 100.0);
        assert_eq!(store.read_vec3(UTBL).unwrap(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn receding_target_has_negative_closing_velocity() {
        let mut store = geometry_store(
            Vec3::zero(),
            Vec3::new(-50.0, 0.0, 0.0),
            Vec3::new(1000.0, 0.0, 0.0),
        );
        exec(&mut store);
        assert_eq!(store.read_real(DVTA).unwrap(), -50.0);
    }

    #[test]
    fn collocated_geometry_yields_zero_unit_vector() {
        // Inside the 0.1 m guard the LOS direction is undefined; the
        // module publishes zeros rather than NaN.
        let mut store = geometry_store(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(0.05, 0.0, 0.0),
        );
        exec(&mut store);
        let utbl = store.read_vec3(UTBL).unwrap();
        assert_eq!(utbl, Vec3::zero());
        assert!(store.read_real(DVTA).unwrap().abs() < 1e-12);
    }
}
