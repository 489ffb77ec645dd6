//! Closest-approach detection.

use crate::slots::{DETECT_RANGE, DTA, DVTA, DVTA_PREV, INTERCEPT_FLAG, MISS, TINTERCEPT};
use traject_core::{OutputTags, Role, SlotDef, SlotIdx, SlotKind, StoreError, VarStore};
use traject_module::{Module, ModuleContext, ModuleError};

/// Detects the point of closest approach and freezes the miss distance
/// and its time.
///
/// The crossing criterion is the closing velocity changing sign from
/// positive (closing) to non-positive (opening), evaluated only inside
/// the `detect_range` sphere — sign flips far from the target (launch
/// transients, mid-course geometry changes) are not intercepts. Only the
/// *first* crossing freezes `miss`/`tintercept` and raises
/// `intercept_flag`; re-engagement geometries that cross again are
/// deliberately ignored.
pub struct InterceptDetect;

impl InterceptDetect {
    /// New intercept detector.
    pub fn new() -> Self {
        Self
    }
}

impl Default for InterceptDetect {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for InterceptDetect {
    fn name(&self) -> &str {
        "intercept"
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            DETECT_RANGE,
            SlotDef::new(
                "detect_range",
                SlotKind::Real,
                "Detection sphere radius - m",
                self.name(),
                Role::Data,
                OutputTags::none(),
            ),
        )?;
        store.define(
            MISS,
            SlotDef::new(
                "miss",
                SlotKind::Real,
                "Miss distance at closest approach - m",
                self.name(),
                Role::Out,
                OutputTags::screen(),
            ),
        )?;
        store.define(
            TINTERCEPT,
            SlotDef::new(
                "tintercept",
                SlotKind::Real,
                "Time of closest approach - s",
                self.name(),
                Role::Out,
                OutputTags::screen(),
            ),
        )?;
        store.define(
            INTERCEPT_FLAG,
            SlotDef::new(
                "intercept_flag",
                SlotKind::Int,
                "Intercept detected (1=yes) - ND",
                self.name(),
                Role::Out,
                OutputTags::screen(),
            ),
        )?;
        store.define(
            DVTA_PREV,
            SlotDef::new(
                "dvta_prev",
                SlotKind::Real,
                "Previous closing velocity - m/s",
                self.name(),
                Role::Save,
                OutputTags::none(),
            ),
        )
    }

    fn reads(&self) -> Vec<SlotIdx> {
        vec![DTA, DVTA]
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let time = ctx.sim_time();
        let detect_range = ctx.read_real(DETECT_RANGE)?;
        let dta = ctx.read_real(DTA)?;
        let dvta = ctx.read_real(DVTA)?;
        let dvta_prev = ctx.read_real(DVTA_PREV)?;
        let flag = ctx.read_int(INTERCEPT_FLAG)?;

        // Crossings count only inside the detection sphere.
        if dta < detect_range && flag == 0 && dvta_prev > 0.0 && dvta <= 0.0 {
            ctx.write_real(MISS, dta)?;
            ctx.write_real(TINTERCEPT, time)?;
            ctx.write_int(INTERCEPT_FLAG, 1)?;
        }

        ctx.write_real(DVTA_PREV, dvta)
    }
}
