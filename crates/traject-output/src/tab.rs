//! Screen / tabular-file writer.

use crate::row::{self, Column};
use smallvec::SmallVec;
use std::io::{self, Write};
use traject_core::VarStore;

/// Field width of one tab column.
const FIELD: usize = 15;
/// Columns per output line.
const PER_LINE: usize = 8;
/// Labels longer than this are truncated.
const LABEL_MAX: usize = 14;

/// Fixed-width tabular writer: eight 15-wide fields per line, vectors
/// expanded to `name 1|2|3`, integers printed as reals.
///
/// The same writer serves the screen mirror and `tabout.asc` — they
/// differ only in sink. Column selection (`scrn`-tagged slots) is
/// captured at [`TabWriter::banner`] time.
pub struct TabWriter<W: Write> {
    sink: W,
    cols: Vec<Column>,
}

impl<W: Write> TabWriter<W> {
    /// Wrap a sink.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            cols: Vec::new(),
        }
    }

    /// Write the banner (title, vehicle, column labels) and capture the
    /// column selection for subsequent rows.
    pub fn banner(&mut self, store: &VarStore, title: &str, vehicle: &str) -> io::Result<()> {
        writeln!(self.sink, "\n{title}")?;
        writeln!(self.sink, "\n Vehicle: {vehicle}")?;
        self.cols = row::columns(store, |_, def| def.output.has_screen());
        let mut k = 0;
        for col in &self.cols {
            write!(self.sink, "{}", row::label(store, col, FIELD, LABEL_MAX))?;
            k += 1;
            if k == PER_LINE {
                k = 0;
                writeln!(self.sink)?;
            }
        }
        writeln!(self.sink)?;
        writeln!(self.sink)
    }

    /// Emit one data row snapshotting the selected slots.
    pub fn row(&mut self, store: &VarStore) -> io::Result<()> {
        let mut values: SmallVec<[f64; 16]> = SmallVec::new();
        row::collect_values(store, &self.cols, &mut values);
        let mut k = 0;
        for v in &values {
            write!(self.sink, "{}", row::field(*v, FIELD))?;
            k += 1;
            if k == PER_LINE {
                k = 0;
                writeln!(self.sink)?;
            }
        }
        writeln!(self.sink)
    }

    /// Note an event firing in the trace.
    pub fn event_line(&mut self, time: f64, description: &str) -> io::Result<()> {
        writeln!(self.sink, "*** Event at time {time:.6}: {description} ***")
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Consume the writer and return the sink (tests).
    pub fn into_sink(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traject_core::{OutputTags, Role, SlotDef, SlotIdx, SlotKind, SlotValue, VarStore};
    use traject_math::Vec3;

    fn store() -> VarStore {
        let mut store = VarStore::new(8);
        store
            .define(
                SlotIdx(0),
                SlotDef::new(
                    "time",
                    SlotKind::Real,
                    "Time - s",
                    "executive",
                    Role::Exec,
                    OutputTags::screen(),
                ),
            )
            .unwrap();
        store
            .define(
                SlotIdx(1),
                SlotDef::new(
                    "SBEL",
                    SlotKind::Vec3,
                    "Position - m",
                    "kinematics",
                    Role::State,
                    OutputTags::screen().and(OutputTags::plot()),
                ),
            )
            .unwrap();
        store
            .define(
                SlotIdx(2),
                SlotDef::new(
                    "mprop",
                    SlotKind::Int,
                    "Motor flag",
                    "propulsion",
                    Role::Out,
                    OutputTags::screen(),
                ),
            )
            .unwrap();
        store
            .define(
                SlotIdx(3),
                SlotDef::new(
                    "hidden",
                    SlotKind::Real,
                    "Not routed",
                    "propulsion",
                    Role::Diag,
                    OutputTags::none(),
                ),
            )
            .unwrap();
        store
            .store_write(SlotIdx(1), SlotValue::Vec3(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        store.store_write(SlotIdx(2), SlotValue::Int(1)).unwrap();
        store
    }

    #[test]
    fn banner_expands_vectors_and_skips_untagged() {
        let store = store();
        let mut w = TabWriter::new(Vec::new());
        w.banner(&store, "Test run", "BALL").unwrap();
        let text = String::from_utf8(w.into_sink()).unwrap();
        assert!(text.contains("Vehicle: BALL"));
        // Vector components numbered at the end of their 15-wide field.
        for component in 1..=3 {
            let expected = format!("{}{:>11}", "SBEL", component);
            assert!(text.contains(&expected), "missing label: {expected:?}");
        }
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn row_coerces_ints_and_expands_vectors() {
        let store = store();
        let mut w = TabWriter::new(Vec::new());
        w.banner(&store, "t", "v").unwrap();
        w.row(&store).unwrap();
        let text = String::from_utf8(w.into_sink()).unwrap();
        let data_line = text.lines().last().unwrap();
        // time, 3 vector components, int-as-real: 5 fields of width 15.
        assert!(data_line.contains("1.000000"));
        assert!(data_line.contains("2.000000"));
        assert!(data_line.contains("3.000000"));
        assert_eq!(data_line.len(), 5 * 15);
    }

    #[test]
    fn event_line_carries_time_and_text() {
        let mut w: TabWriter<Vec<u8>> = TabWriter::new(Vec::new());
        w.event_line(3.25, "altitude < 100").unwrap();
        let text = String::from_utf8(w.into_sink()).unwrap();
        assert!(text.contains("Event at time 3.250000"));
        assert!(text.contains("altitude < 100"));
    }
}
