//! Plot-file writer.

use crate::row::{self, Column};
use smallvec::SmallVec;
use std::io::{self, Write};
use traject_core::VarStore;

/// Field width of one plot column.
const FIELD: usize = 16;
/// Columns per output line.
const PER_LINE: usize = 5;
/// Labels longer than this are truncated.
const LABEL_MAX: usize = 8;

/// Plot-file writer: a two-line header (title line, then a column count
/// that includes vector expansion), labels and data five 16-wide fields
/// per line. Column selection is `plot`-tagged slots.
pub struct PlotWriter<W: Write> {
    sink: W,
    cols: Vec<Column>,
}

impl<W: Write> PlotWriter<W> {
    /// Wrap a sink.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            cols: Vec::new(),
        }
    }

    /// Write the plot header and label block; capture the column
    /// selection for subsequent rows.
    pub fn banner(&mut self, store: &VarStore, title: &str, vehicle: &str) -> io::Result<()> {
        self.cols = row::columns(store, |_, def| def.output.has_plot());
        writeln!(self.sink, "1{title} '{vehicle}'")?;
        writeln!(self.sink, "  0  0 {}", self.cols.len())?;
        let mut k = 0;
        for col in &self.cols {
            write!(self.sink, "{}", row::label(store, col, FIELD, LABEL_MAX))?;
            k += 1;
            if k == PER_LINE {
                k = 0;
                writeln!(self.sink)?;
            }
        }
        if self.cols.len() % PER_LINE != 0 {
            writeln!(self.sink)?;
        }
        Ok(())
    }

    /// Emit one data row.
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
        if values.len() % PER_LINE != 0 {
            writeln!(self.sink)?;
        }
        Ok(())
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
