//! Scenario loading errors.

use std::error::Error;
use std::fmt;
use std::io;
use traject_core::StoreError;
use traject_engine::{ConfigError, EventError};
use traject_table::TableError;

/// Errors from scenario parsing and binding.
///
/// Parse-side variants carry the 1-based line number of the offending
/// text; bind-side variants wrap the subsystem error they surfaced from.
/// All are fatal at load — the run never starts.
#[derive(Debug)]
pub enum ScenarioError {
    /// Malformed scenario text.
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
    /// A `MODULES` entry names a module the library does not provide.
    UnknownModule {
        /// 1-based line number.
        line: usize,
        /// The unknown name.
        name: String,
    },
    /// A `MODULES` entry carries an unparseable phase list.
    BadPhaseList {
        /// 1-based line number.
        line: usize,
        /// The offending phase-list text.
        text: String,
    },
    /// A `DATA` assignment or event names a slot nothing defined.
    UnknownSlot {
        /// 1-based line number.
        line: usize,
        /// The unknown name.
        name: String,
    },
    /// Event binding failed (kind mismatch, equality on a real slot, …).
    Event {
        /// 1-based line number of the `IF` line.
        line: usize,
        /// The underlying bind error.
        source: EventError,
    },
    /// Deck parsing failed.
    Table(TableError),
    /// Reading a deck file failed.
    DeckIo {
        /// The deck file name as written in the scenario.
        file: String,
        /// The I/O failure.
        source: io::Error,
    },
    /// Scheduler construction failed.
    Config(ConfigError),
    /// A privileged load write failed.
    Store(StoreError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { line, message } => write!(f, "scenario line {line}: {message}"),
            Self::UnknownModule { line, name } => {
                write!(f, "scenario line {line}: unknown module '{name}'")
            }
            Self::BadPhaseList { line, text } => {
                write!(f, "scenario line {line}: bad phase list '{text}'")
            }
            Self::UnknownSlot { line, name } => {
                write!(f, "scenario line {line}: unknown slot name '{name}'")
            }
            Self::Event { line, source } => {
                write!(f, "scenario line {line}: {source}")
            }
            Self::Table(e) => write!(f, "{e}"),
            Self::DeckIo { file, source } => write!(f, "deck '{file}': {source}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ScenarioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Event { source, .. } => Some(source),
            Self::Table(e) => Some(e),
            Self::DeckIo { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TableError> for ScenarioError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

impl From<ConfigError> for ScenarioError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StoreError> for ScenarioError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
