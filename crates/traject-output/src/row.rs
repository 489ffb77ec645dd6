//! Shared column expansion for the row-oriented writers.

use smallvec::SmallVec;
use traject_core::{SlotIdx, SlotKind, SlotValue, VarStore};

/// One output column: a slot, or one component of a vector slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Column {
    pub slot: SlotIdx,
    /// `None` for scalar kinds; `Some(0..3)` for vector components.
    pub component: Option<usize>,
}

/// Expand the slots selected by `select` into flat columns, in index
/// order. Vector slots contribute three columns; integer slots one
/// (coerced to real at emission time). Matrix slots are not routed to
/// row output.
pub(crate) fn columns<F: Fn(SlotIdx, &traject_core::SlotDef) -> bool>(
    store: &VarStore,
    select: F,
) -> Vec<Column> {
    let mut cols = Vec::new();
    for (idx, def, _) in store.iter_defined() {
        if !select(idx, def) {
            continue;
        }
        match def.kind {
            SlotKind::Vec3 => {
                for component in 0..3 {
                    cols.push(Column {
                        slot: idx,
                        component: Some(component),
                    });
                }
            }
            SlotKind::Real | SlotKind::Int => cols.push(Column {
                slot: idx,
                component: None,
            }),
            SlotKind::Mat3 | SlotKind::Empty => {}
        }
    }
    cols
}

/// Labels for a column list. A vector `V` becomes `V 1`, `V 2`, `V 3`
/// with the running number right-aligned in the field remainder.
pub(crate) fn label(store: &VarStore, col: &Column, width: usize, truncate: usize) -> String {
    let def = store.def(col.slot).expect("column built from defined slot");
    let mut name: String = def.name.chars().take(truncate).collect();
    match col.component {
        Some(c) => {
            let pad = width.saturating_sub(name.len());
            format!("{name}{:>pad$}", c + 1)
        }
        None => {
            while name.len() < width {
                name.push(' ');
            }
            name
        }
    }
}

/// Numeric value of a column; integers coerce to reals.
pub(crate) fn value(store: &VarStore, col: &Column) -> f64 {
    match store.value(col.slot) {
        Ok(SlotValue::Real(v)) => v,
        Ok(SlotValue::Int(v)) => v as f64,
        Ok(SlotValue::Vec3(v)) => v[col.component.unwrap_or(0)],
        _ => 0.0,
    }
}

/// One fixed-width numeric field, left-aligned, six decimals.
pub(crate) fn field(v: f64, width: usize) -> String {
    format!("{v:<width$.6}")
}

/// Collected values of a column list into a caller-provided buffer
/// (cleared first; capacity persists across rows).
pub(crate) fn collect_values(
    store: &VarStore,
    cols: &[Column],
    out: &mut SmallVec<[f64; 16]>,
) {
    out.clear();
    for col in cols {
        out.push(value(store, col));
    }
}
