//! Error type for numerical failures.

use std::error::Error;
use std::fmt;

/// Numerical failures surfaced by the algebra layer.
///
/// Near-zero guards in physics code (seeker range, speed denominators)
/// are deliberately *not* here — those are per-module policy. This type
/// covers only operations that are undefined on their input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MathError {
    /// Matrix inversion was requested for a singular matrix.
    Singular {
        /// The determinant that failed the invertibility test.
        determinant: f64,
    },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singular { determinant } => {
                write!(f, "matrix is singular (determinant {determinant})")
            }
        }
    }
}

impl Error for MathError {}
