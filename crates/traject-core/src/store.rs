//! The typed variable store.
//!
//! [`VarStore`] is an ordered, fixed-capacity array of slots addressed by
//! [`SlotIdx`]. Modules communicate exclusively through it: each module
//! defines the slots it owns during the `def` phase and reads/writes values
//! through the typed accessors afterwards. The store is the only shared
//! state in a simulation; because execution is single-threaded and writes
//! are role- and ownership-guarded, no locking exists.

use crate::error::StoreError;
use crate::id::SlotIdx;
use crate::slot::{Role, SlotDef, SlotKind, SlotValue};
use indexmap::IndexMap;
use std::fmt;
use traject_math::{Mat3, Vec3};

/// Lifecycle phase the store is in.
///
/// The scheduler advances the phase; the store uses it to arbitrate
/// writes (`data`/`init` slots harden after [`Phase::Init`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Modules are defining their slots.
    Def,
    /// The scenario loader is populating `data`/`init`/`state` slots.
    Load,
    /// Modules are establishing initial values.
    Init,
    /// The step loop is running.
    Exec,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Def => "def",
            Self::Load => "load",
            Self::Init => "init",
            Self::Exec => "exec",
        };
        write!(f, "{s}")
    }
}

/// One cell of the store: definition plus current value.
#[derive(Clone, Debug)]
struct SlotCell {
    def: Option<SlotDef>,
    value: SlotValue,
}

/// The typed slot array.
///
/// Capacity is fixed at construction; no allocation happens after the
/// def phase. Undefined cells read back as kind [`SlotKind::Empty`] and
/// reject typed access.
#[derive(Debug)]
pub struct VarStore {
    cells: Vec<SlotCell>,
    by_name: IndexMap<String, SlotIdx>,
    phase: Phase,
}

impl VarStore {
    /// Create an empty store with the given fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![
                SlotCell {
                    def: None,
                    value: SlotValue::Empty,
                };
                capacity
            ],
            by_name: IndexMap::new(),
            phase: Phase::Def,
        }
    }

    /// Fixed capacity (number of cells, defined or not).
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of defined slots.
    pub fn defined_count(&self) -> usize {
        self.by_name.len()
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance the lifecycle phase. Called by the scheduler only.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    // ── Definition ─────────────────────────────────────────────────

    /// Define a slot. Legal only during the def phase.
    ///
    /// The slot's value is initialized to the zero of its kind. Fails on
    /// index reuse, name reuse, or an out-of-range index.
    pub fn define(&mut self, index: SlotIdx, def: SlotDef) -> Result<(), StoreError> {
        if self.phase != Phase::Def {
            return Err(StoreError::WrongPhase {
                expected: Phase::Def,
                actual: self.phase,
            });
        }
        let i = index.as_usize();
        if i >= self.cells.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                capacity: self.cells.len(),
            });
        }
        if self.cells[i].def.is_some() {
            return Err(StoreError::DuplicateIndex { index });
        }
        if let Some(&first) = self.by_name.get(&def.name) {
            return Err(StoreError::DuplicateName {
                name: def.name,
                first,
                second: index,
            });
        }
        self.by_name.insert(def.name.clone(), index);
        self.cells[i].value = SlotValue::zero_of(def.kind);
        self.cells[i].def = Some(def);
        Ok(())
    }

    // ── Metadata access ────────────────────────────────────────────

    /// The kind of a slot ([`SlotKind::Empty`] if undefined or out of range).
    pub fn kind(&self, index: SlotIdx) -> SlotKind {
        self.cells
            .get(index.as_usize())
            .and_then(|c| c.def.as_ref())
            .map_or(SlotKind::Empty, |d| d.kind)
    }

    /// The definition of a slot, if one exists.
    pub fn def(&self, index: SlotIdx) -> Option<&SlotDef> {
        self.cells.get(index.as_usize()).and_then(|c| c.def.as_ref())
    }

    /// Resolve a slot name to its index.
    ///
    /// Used only by the scenario loader, the event binder, and the doc
    /// pass; modules address slots by index.
    pub fn by_name(&self, name: &str) -> Option<SlotIdx> {
        self.by_name.get(name).copied()
    }

    /// Iterate over defined slots in index order.
    pub fn iter_defined(&self) -> impl Iterator<Item = (SlotIdx, &SlotDef, &SlotValue)> {
        self.cells.iter().enumerate().filter_map(|(i, c)| {
            c.def
                .as_ref()
                .map(|d| (SlotIdx(i as u32), d, &c.value))
        })
    }

    // ── Typed reads ────────────────────────────────────────────────

    /// The raw value of a slot.
    pub fn value(&self, index: SlotIdx) -> Result<SlotValue, StoreError> {
        let cell = self
            .cells
            .get(index.as_usize())
            .ok_or(StoreError::IndexOutOfRange {
                index,
                capacity: self.cells.len(),
            })?;
        if cell.def.is_none() {
            return Err(StoreError::UndefinedSlot { index });
        }
        Ok(cell.value)
    }

    /// Read a scalar slot.
    pub fn read_real(&self, index: SlotIdx) -> Result<f64, StoreError> {
        match self.value(index)? {
            SlotValue::Real(v) => Ok(v),
            other => Err(StoreError::KindMismatch {
                index,
                requested: SlotKind::Real,
                actual: other.kind(),
            }),
        }
    }

    /// Read an integer slot.
    pub fn read_int(&self, index: SlotIdx) -> Result<i64, StoreError> {
        match self.value(index)? {
            SlotValue::Int(v) => Ok(v),
            other => Err(StoreError::KindMismatch {
                index,
                requested: SlotKind::Int,
                actual: other.kind(),
            }),
        }
    }

    /// Read a vector slot.
    pub fn read_vec3(&self, index: SlotIdx) -> Result<Vec3, StoreError> {
        match self.value(index)? {
            SlotValue::Vec3(v) => Ok(v),
            other => Err(StoreError::KindMismatch {
                index,
                requested: SlotKind::Vec3,
                actual: other.kind(),
            }),
        }
    }

    /// Read a matrix slot.
    pub fn read_mat3(&self, index: SlotIdx) -> Result<Mat3, StoreError> {
        match self.value(index)? {
            SlotValue::Mat3(v) => Ok(v),
            other => Err(StoreError::KindMismatch {
                index,
                requested: SlotKind::Mat3,
                actual: other.kind(),
            }),
        }
    }

    // ── Writes ─────────────────────────────────────────────────────

    /// Kind-checked write without role or ownership checks.
    ///
    /// Reserved for the privileged callers: the scenario loader (load
    /// phase), the event engine (applying assignments), and the scheduler
    /// itself (clock and stop slots). Modules write through
    /// [`VarStore::module_write`].
    pub fn store_write(&mut self, index: SlotIdx, value: SlotValue) -> Result<(), StoreError> {
        let kind = self.kind(index);
        if self
            .cells
            .get(index.as_usize())
            .map_or(true, |c| c.def.is_none())
        {
            return Err(StoreError::UndefinedSlot { index });
        }
        if value.kind() != kind {
            return Err(StoreError::KindMismatch {
                index,
                requested: value.kind(),
                actual: kind,
            });
        }
        self.cells[index.as_usize()].value = value;
        Ok(())
    }

    /// Write on behalf of a module, enforcing the full contract:
    ///
    /// - the slot must be defined and the kinds must match;
    /// - the writing module must own the slot;
    /// - `data` slots are never module-writable; `init` slots only during
    ///   the init phase; everything else per [`Role::writable_in_exec`].
    pub fn module_write(
        &mut self,
        index: SlotIdx,
        value: SlotValue,
        module: &str,
    ) -> Result<(), StoreError> {
        let def = self
            .cells
            .get(index.as_usize())
            .and_then(|c| c.def.as_ref())
            .ok_or(StoreError::UndefinedSlot { index })?;
        if def.module != module {
            return Err(StoreError::NotOwned {
                index,
                owner: def.module.clone(),
                writer: module.to_string(),
            });
        }
        let role = def.role;
        let allowed = match role {
            Role::Data => false,
            Role::Init => self.phase != Phase::Exec,
            _ => role.writable_in_exec(),
        };
        if !allowed {
            return Err(StoreError::ImmutableParameter { index, role });
        }
        self.store_write(index, value)
    }

    /// Duplicate-name audit for the doc pass: indices whose names collide.
    ///
    /// `define` already rejects duplicates, so this only reports problems
    /// when definitions were assembled outside the normal path; the doc
    /// pass still runs it so the audit is self-contained.
    pub fn duplicate_names(&self) -> Vec<(SlotIdx, SlotIdx)> {
        let mut seen: IndexMap<&str, SlotIdx> = IndexMap::new();
        let mut dups = Vec::new();
        for (idx, def, _) in self.iter_defined() {
            match seen.get(def.name.as_str()) {
                Some(&first) => dups.push((first, idx)),
                None => {
                    seen.insert(def.name.as_str(), idx);
                }
            }
        }
        dups
    }
}
