//! Core types for the traject simulation framework.
//!
//! Defines the slot model — the typed, index-addressed cells through which
//! every module communicates — and the [`VarStore`] that holds them. This
//! crate knows nothing about modules, scheduling, or I/O; it is the shared
//! vocabulary of the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod slot;
pub mod store;

pub use error::StoreError;
pub use id::{SlotIdx, StepId};
pub use slot::{OutputTags, Role, SlotDef, SlotKind, SlotValue};
pub use store::{Phase, VarStore};
