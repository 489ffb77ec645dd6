//! Small dense vector/matrix algebra for the traject workspace.
//!
//! This is a leaf crate with no internal dependencies. It provides the two
//! value types every physics module and integrator works with: [`Vec3`] and
//! [`Mat3`]. Both are `Copy`, carry exactly their 3 or 9 components on the
//! stack, and never allocate.
//!
//! The operation set is deliberately the one flight-dynamics code needs and
//! nothing more: componentwise arithmetic, matrix products, transpose,
//! cofactor inverse, norms, the skew-symmetric (cross-product) builder,
//! polar/Cartesian conversion, and the 3-2-1 Euler-angle direction cosine
//! matrix.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod mat3;
pub mod vec3;

pub use error::MathError;
pub use mat3::Mat3;
pub use vec3::{Polar, Vec3};
