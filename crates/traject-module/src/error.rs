//! Error type returned by module phase entry points.

use std::error::Error;
use std::fmt;
use traject_core::StoreError;
use traject_math::MathError;
use traject_table::TableError;

/// Failure of a module's `init` or `exec` entry point.
///
/// Wraps the subsystem errors a module can hit (store access, table
/// lookup, numerics) plus a free-form variant for physics-level failures
/// the module itself detects.
#[derive(Clone, Debug, PartialEq)]
pub enum ModuleError {
    /// Slot access failed.
    Store(StoreError),
    /// Table lookup failed.
    Table(TableError),
    /// A numerical operation failed.
    Math(MathError),
    /// Module-detected failure.
    Failed {
        /// Human-readable description.
        reason: String,
    },
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Table(e) => write!(f, "table: {e}"),
            Self::Math(e) => write!(f, "math: {e}"),
            Self::Failed { reason } => write!(f, "{reason}"),
        }
    }
}

impl Error for ModuleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Table(e) => Some(e),
            Self::Math(e) => Some(e),
            Self::Failed { .. } => None,
        }
    }
}

impl From<StoreError> for ModuleError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<TableError> for ModuleError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

impl From<MathError> for ModuleError {
    fn from(e: MathError) -> Self {
        Self::Math(e)
    }
}
