//! Reusable test fixtures for traject development.
//!
//! Three standard modules for scheduler and pipeline testing:
//!
//! - [`ConstModule`] — writes a constant to one owned slot each step.
//! - [`CopyModule`] — copies one slot into another (ordering probes).
//! - [`FailingModule`] — fails deterministically after N successful calls.
//!
//! Plus [`SharedBuf`], a cloneable in-memory `Write` sink for asserting
//! on writer output through `Box<dyn Write>` boundaries.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use traject_core::{OutputTags, Role, SlotDef, SlotIdx, SlotKind, StoreError, VarStore};
use traject_module::{Module, ModuleContext, ModuleError};

/// Writes a constant value to one owned real slot every step.
///
/// The slot is defined under the module's own name with role `out`, so
/// downstream modules (and events) can observe it.
pub struct ConstModule {
    name: String,
    slot: SlotIdx,
    value: f64,
}

impl ConstModule {
    pub fn new(name: impl Into<String>, slot: SlotIdx, value: f64) -> Self {
        Self {
            name: name.into(),
            slot,
            value,
        }
    }
}

impl Module for ConstModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            self.slot,
            SlotDef::new(
                &self.name,
                SlotKind::Real,
                "Constant fixture output",
                &self.name,
                Role::Out,
                OutputTags::none(),
            ),
        )
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        ctx.write_real(self.slot, self.value)
    }
}

/// Copies one real slot into another each step.
///
/// If the source was written earlier in the same step, the copy observes
/// the same-step value — the ordering probe for the one-step-lag
/// contract.
pub struct CopyModule {
    name: String,
    from: SlotIdx,
    to: SlotIdx,
}

impl CopyModule {
    pub fn new(name: impl Into<String>, from: SlotIdx, to: SlotIdx) -> Self {
        Self {
            name: name.into(),
            from,
            to,
        }
    }
}

impl Module for CopyModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            self.to,
            SlotDef::new(
                &self.name,
                SlotKind::Real,
                "Copy fixture output",
                &self.name,
                Role::Out,
                OutputTags::none(),
            ),
        )
    }

    fn reads(&self) -> Vec<SlotIdx> {
        vec![self.from]
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let v = ctx.read_real(self.from)?;
        ctx.write_real(self.to, v)
    }
}

/// Succeeds `succeed_count` times, then fails every call.
///
/// The counter is interior-mutable on purpose — failure injection needs
/// per-call state the module contract otherwise forbids.
pub struct FailingModule {
    name: String,
    slot: SlotIdx,
    succeed_count: usize,
    calls: AtomicUsize,
}

impl FailingModule {
    pub fn new(name: impl Into<String>, slot: SlotIdx, succeed_count: usize) -> Self {
        Self {
            name: name.into(),
            slot,
            succeed_count,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Module for FailingModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn def(&self, store: &mut VarStore) -> Result<(), StoreError> {
        store.define(
            self.slot,
            SlotDef::new(
                &self.name,
                SlotKind::Real,
                "Failing fixture output",
                &self.name,
                Role::Out,
                OutputTags::none(),
            ),
        )
    }

    fn exec(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        if call >= self.succeed_count {
            return Err(ModuleError::Failed {
                reason: format!("injected failure on call {}", call + 1),
            });
        }
        ctx.write_real(self.slot, call as f64)
    }
}

/// A cloneable in-memory sink: clones share the same buffer, so a test
/// can hand one clone to a writer as `Box<dyn Write>` and keep another
/// to read the output back.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer contents as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("sink poisoned")).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("sink poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
