//! Output writers for the traject simulation framework.
//!
//! Four sinks, each driven by per-slot output tags or the full slot table:
//!
//! - [`TabWriter`] — fixed-width tabular rows (8 × 15-wide fields) for the
//!   screen and `tabout.asc`; 3-vectors expand to three labeled columns.
//! - [`PlotWriter`] — plot-file rows (5 × 16-wide fields) with a counted
//!   header, for `plot1.asc`.
//! - [`ComWriter`] — one packet per emission carrying the vehicle id, a
//!   status flag, and every `com`-tagged slot value.
//! - [`DocWriter`] — the audited slot listing (`doc.asc`), written even
//!   when a run fails.
//!
//! Writers capture their column selection once at banner time; per-row
//! emission does not allocate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod com;
pub mod doc;
pub mod plot;
pub mod row;
pub mod tab;

pub use com::ComWriter;
pub use doc::DocWriter;
pub use plot::PlotWriter;
pub use tab::TabWriter;

use std::io::Write;

/// The writer set a scheduler drives during a run.
///
/// Every sink is optional; a headless run (tests, library embedding)
/// uses [`OutputSet::null`].
pub struct OutputSet {
    /// Screen mirror of the tab table.
    pub screen: Option<TabWriter<Box<dyn Write>>>,
    /// `tabout.asc`.
    pub tab: Option<TabWriter<Box<dyn Write>>>,
    /// `plot1.asc`.
    pub plot: Option<PlotWriter<Box<dyn Write>>>,
    /// Communications bus file.
    pub com: Option<ComWriter<Box<dyn Write>>>,
}

impl OutputSet {
    /// No sinks at all.
    pub fn null() -> Self {
        Self {
            screen: None,
            tab: None,
            plot: None,
            com: None,
        }
    }
}
