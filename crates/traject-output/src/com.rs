//! Communications-bus packet writer.

use crate::row::{self, Column};
use smallvec::SmallVec;
use std::io::{self, Write};
use traject_core::VarStore;

/// One packet per emission: vehicle id, a status flag (1 on the first
/// emission, 2 from then on), the column count, then the snapshot values
/// of every `com`-tagged slot.
///
/// This is the design hook for a multi-vehicle broadcast bus; the core
/// scheduler writes packets to a file so downstream tools (or a future
/// bus) can consume them.
pub struct ComWriter<W: Write> {
    sink: W,
    vehicle_id: String,
    cols: Vec<Column>,
    emissions: u64,
}

impl<W: Write> ComWriter<W> {
    /// Wrap a sink for the given vehicle id.
    pub fn new(sink: W, vehicle_id: impl Into<String>) -> Self {
        Self {
            sink,
            vehicle_id: vehicle_id.into(),
            cols: Vec::new(),
            emissions: 0,
        }
    }

    /// Capture the `com`-tagged column selection.
    pub fn banner(&mut self, store: &VarStore) -> io::Result<()> {
        self.cols = row::columns(store, |_, def| def.output.has_com());
        Ok(())
    }

    /// Emit one packet.
    pub fn packet(&mut self, store: &VarStore) -> io::Result<()> {
        self.emissions += 1;
        let status = if self.emissions == 1 { 1 } else { 2 };
        let mut values: SmallVec<[f64; 16]> = SmallVec::new();
        row::collect_values(store, &self.cols, &mut values);
        write!(self.sink, "{} {} {}", self.vehicle_id, status, values.len())?;
        for v in &values {
            write!(self.sink, " {v:.6}")?;
        }
        writeln!(self.sink)
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

    fn store() -> VarStore {
        let mut store = VarStore::new(4);
        store
            .define(
                SlotIdx(0),
                SlotDef::new(
                    "altitude",
                    SlotKind::Real,
                    "Altitude - m",
                    "kinematics",
                    Role::Out,
                    OutputTags::com(),
                ),
            )
            .unwrap();
        store
            .store_write(SlotIdx(0), SlotValue::Real(125.5))
            .unwrap();
        store
    }

    #[test]
    fn status_is_one_then_two() {
        let store = store();
        let mut w = ComWriter::new(Vec::new(), "ball_1");
        w.banner(&store).unwrap();
        w.packet(&store).unwrap();
        w.packet(&store).unwrap();
        w.packet(&store).unwrap();
        let text = String::from_utf8(w.into_sink()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ball_1 1 1 125.5"));
        assert!(lines[1].starts_with("ball_1 2 1 125.5"));
        assert!(lines[2].starts_with("ball_1 2 1 125.5"));
    }
}
