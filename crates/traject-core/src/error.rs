//! Error types for slot definition and typed access.

use crate::id::SlotIdx;
use crate::slot::{Role, SlotKind};
use crate::store::Phase;
use std::error::Error;
use std::fmt;

/// Errors from the variable store.
///
/// `DuplicateName`/`DuplicateIndex` indicate a mis-assembled module set
/// and are fatal at run start; `KindMismatch` and the write-guard
/// variants indicate a programming bug in a module and abort the run.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreError {
    /// A slot with this name was already defined.
    DuplicateName {
        /// The contested name.
        name: String,
        /// Index of the earlier definition.
        first: SlotIdx,
        /// Index of the attempted second definition.
        second: SlotIdx,
    },
    /// A slot was already defined at this index.
    DuplicateIndex {
        /// The contested index.
        index: SlotIdx,
    },
    /// Index is beyond the store's fixed capacity.
    IndexOutOfRange {
        /// The out-of-range index.
        index: SlotIdx,
        /// The store capacity.
        capacity: usize,
    },
    /// Typed access to a slot that was never defined.
    UndefinedSlot {
        /// The accessed index.
        index: SlotIdx,
    },
    /// Typed access with the wrong kind.
    KindMismatch {
        /// The accessed index.
        index: SlotIdx,
        /// The kind the caller asked for or supplied.
        requested: SlotKind,
        /// The slot's actual kind.
        actual: SlotKind,
    },
    /// Module write to a `data`/`init` slot after the init phase.
    ImmutableParameter {
        /// The written index.
        index: SlotIdx,
        /// The slot's role.
        role: Role,
    },
    /// Module write to a slot owned by another module.
    NotOwned {
        /// The written index.
        index: SlotIdx,
        /// The owning module.
        owner: String,
        /// The module that attempted the write.
        writer: String,
    },
    /// Operation invoked in the wrong phase (e.g. `define` after def).
    WrongPhase {
        /// The phase the operation is legal in.
        expected: Phase,
        /// The store's current phase.
        actual: Phase,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName {
                name,
                first,
                second,
            } => write!(
                f,
                "duplicate slot name '{name}' (slots {first} and {second})"
            ),
            Self::DuplicateIndex { index } => {
                write!(f, "slot {index} defined twice")
            }
            Self::IndexOutOfRange { index, capacity } => {
                write!(f, "slot {index} out of range (capacity {capacity})")
            }
            Self::UndefinedSlot { index } => write!(f, "slot {index} is not defined"),
            Self::KindMismatch {
                index,
                requested,
                actual,
            } => write!(
                f,
                "slot {index} kind mismatch: requested {requested}, slot is {actual}"
            ),
            Self::ImmutableParameter { index, role } => write!(
                f,
                "slot {index} ({role}) is immutable after the init phase"
            ),
            Self::NotOwned {
                index,
                owner,
                writer,
            } => write!(
                f,
                "module '{writer}' wrote slot {index} owned by '{owner}'"
            ),
            Self::WrongPhase { expected, actual } => {
                write!(f, "operation legal in {expected} phase, store is in {actual}")
            }
        }
    }
}

impl Error for StoreError {}
