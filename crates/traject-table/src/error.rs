//! Error types for table construction, lookup, and deck parsing.

use std::error::Error;
use std::fmt;

/// Errors from table construction, lookup, and deck parsing.
#[derive(Clone, Debug, PartialEq)]
pub enum TableError {
    /// Lookup named a table the deck does not hold.
    UnknownTable {
        /// The requested table name.
        name: String,
    },
    /// Lookup arity does not match the table's dimension.
    DimensionMismatch {
        /// The table name.
        name: String,
        /// The table's dimension.
        table_dim: usize,
        /// The number of arguments supplied.
        requested_dim: usize,
    },
    /// An axis is not strictly monotonically increasing.
    NonMonotonicAxis {
        /// The table name.
        name: String,
        /// Which axis (1-based).
        axis: usize,
    },
    /// An axis has no values.
    EmptyAxis {
        /// The table name.
        name: String,
        /// Which axis (1-based).
        axis: usize,
    },
    /// Data array length differs from the product of the axis lengths.
    DataLengthMismatch {
        /// The table name.
        name: String,
        /// Expected length (product of axis lengths).
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// Dimension outside 1..=3.
    InvalidDimension {
        /// The table name.
        name: String,
        /// The offending dimension.
        dim: usize,
    },
    /// Two tables in one deck share a name.
    DuplicateTable {
        /// The contested name.
        name: String,
    },
    /// Malformed deck text.
    Parse {
        /// 1-based line number of the offending token.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTable { name } => write!(f, "unknown table '{name}'"),
            Self::DimensionMismatch {
                name,
                table_dim,
                requested_dim,
            } => write!(
                f,
                "table '{name}' is {table_dim}-dimensional, looked up with {requested_dim} argument(s)"
            ),
            Self::NonMonotonicAxis { name, axis } => {
                write!(f, "table '{name}' axis {axis} is not strictly increasing")
            }
            Self::EmptyAxis { name, axis } => {
                write!(f, "table '{name}' axis {axis} is empty")
            }
            Self::DataLengthMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "table '{name}' data length {found}, expected {expected}"
            ),
            Self::InvalidDimension { name, dim } => {
                write!(f, "table '{name}' dimension {dim} outside 1..=3")
            }
            Self::DuplicateTable { name } => write!(f, "duplicate table '{name}' in deck"),
            Self::Parse { line, message } => write!(f, "deck parse error, line {line}: {message}"),
        }
    }
}

impl Error for TableError {}
