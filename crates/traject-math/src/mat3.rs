//! 3×3 matrix with the rotation-oriented operation set.

use crate::error::MathError;
use crate::vec3::Vec3;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// Determinant magnitude below which a matrix is treated as singular.
const SINGULARITY_EPS: f64 = 1e-12;

/// A 3×3 matrix of `f64`, stored row-major.
///
/// Used throughout the framework for direction cosine matrices, inertia
/// tensors, and the matrix form of the trapezoidal integrator. Indexable
/// as `m[(row, col)]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mat3(pub [f64; 9]);

impl Mat3 {
    /// Construct from nine components in row-major order.
    pub const fn new(e: [f64; 9]) -> Self {
        Self(e)
    }

    /// The zero matrix.
    pub const fn zero() -> Self {
        Self([0.0; 9])
    }

    /// The identity matrix.
    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    /// Skew-symmetric cross-product matrix: `skew(v) * w == v × w`.
    pub fn skew(v: &Vec3) -> Self {
        Self([
            0.0, -v[2], v[1], //
            v[2], 0.0, -v[0], //
            -v[1], v[0], 0.0,
        ])
    }

    /// Direction cosine matrix of the 3-2-1 Euler sequence (yaw `psi`,
    /// pitch `theta`, roll `phi`, radians). Transforms a vector from the
    /// reference frame into the rotated (body) frame.
    pub fn euler_321(psi: f64, theta: f64, phi: f64) -> Self {
        let (spsi, cpsi) = psi.sin_cos();
        let (stht, ctht) = theta.sin_cos();
        let (sphi, cphi) = phi.sin_cos();
        Self([
            ctht * cpsi,
            ctht * spsi,
            -stht,
            sphi * stht * cpsi - cphi * spsi,
            sphi * stht * spsi + cphi * cpsi,
            sphi * ctht,
            cphi * stht * cpsi + sphi * spsi,
            cphi * stht * spsi - sphi * cpsi,
            cphi * ctht,
        ])
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        let m = &self.0;
        Self([
            m[0], m[3], m[6], //
            m[1], m[4], m[7], //
            m[2], m[5], m[8],
        ])
    }

    /// Determinant.
    pub fn det(&self) -> f64 {
        let m = &self.0;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// Inverse via the cofactor (adjugate) method.
    ///
    /// Fails with [`MathError::Singular`] when the determinant magnitude
    /// is below the singularity threshold.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let d = self.det();
        if d.abs() < SINGULARITY_EPS {
            return Err(MathError::Singular { determinant: d });
        }
        let m = &self.0;
        let inv_d = 1.0 / d;
        // Adjugate: transposed cofactor matrix.
        Ok(Self([
            (m[4] * m[8] - m[5] * m[7]) * inv_d,
            (m[2] * m[7] - m[1] * m[8]) * inv_d,
            (m[1] * m[5] - m[2] * m[4]) * inv_d,
            (m[5] * m[6] - m[3] * m[8]) * inv_d,
            (m[0] * m[8] - m[2] * m[6]) * inv_d,
            (m[2] * m[3] - m[0] * m[5]) * inv_d,
            (m[3] * m[7] - m[4] * m[6]) * inv_d,
            (m[1] * m[6] - m[0] * m[7]) * inv_d,
            (m[0] * m[4] - m[1] * m[3]) * inv_d,
        ]))
    }

    /// Componentwise scale.
    pub fn scale(&self, k: f64) -> Self {
        let mut out = self.0;
        for e in &mut out {
            *e *= k;
        }
        Self(out)
    }

    /// Frobenius norm (root of the sum of squared components).
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|e| e * e).sum::<f64>().sqrt()
    }
}

impl Index<(usize, usize)> for Mat3 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.0[row * 3 + col]
    }
}

impl IndexMut<(usize, usize)> for Mat3 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.0[row * 3 + col]
    }
}

impl Add for Mat3 {
    type Output = Mat3;

    fn add(self, rhs: Mat3) -> Mat3 {
        let mut out = self.0;
        for (e, r) in out.iter_mut().zip(rhs.0.iter()) {
            *e += r;
        }
        Mat3(out)
    }
}

impl Sub for Mat3 {
    type Output = Mat3;

    fn sub(self, rhs: Mat3) -> Mat3 {
        let mut out = self.0;
        for (e, r) in out.iter_mut().zip(rhs.0.iter()) {
            *e -= r;
        }
        Mat3(out)
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                let mut acc = 0.0;
                for k in 0..3 {
                    acc += self.0[row * 3 + k] * rhs.0[k * 3 + col];
                }
                out[row * 3 + col] = acc;
            }
        }
        Mat3(out)
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0] * v[0] + m[1] * v[1] + m[2] * v[2],
            m[3] * v[0] + m[4] * v[1] + m[5] * v[2],
            m[6] * v[0] + m[7] * v[1] + m[8] * v[2],
        )
    }
}

impl Mul<f64> for Mat3 {
    type Output = Mat3;

    fn mul(self, k: f64) -> Mat3 {
        self.scale(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mat_close(a: &Mat3, b: &Mat3, tol: f64) -> bool {
        a.0.iter().zip(b.0.iter()).all(|(x, y)| (x - y).abs() < tol)
    }

    #[test]
    fn identity_is_multiplicative_unit() {
        let m = Mat3::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0]);
        assert_eq!(Mat3::identity() * m, m);
        assert_eq!(m * Mat3::identity(), m);
    }

    #[test]
    fn inverse_times_original_is_identity() {
        let m = Mat3::new([2.0, 0.0, 1.0, 1.0, 3.0, 0.0, 0.0, 1.0, 4.0]);
        let inv = m.inverse().unwrap();
        assert!(mat_close(&(inv * m), &Mat3::identity(), 1e-12));
    }

    #[test]
    fn singular_matrix_fails_to_invert() {
        // Second row is twice the first.
        let m = Mat3::new([1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0]);
        match m.inverse() {
            Err(MathError::Singular { .. }) => {}
            other => panic!("expected Singular, got {other:?}"),
        }
    }

    #[test]
    fn skew_reproduces_cross_product() {
        let a = Vec3::new(1.0, -2.0, 0.5);
        let b = Vec3::new(0.3, 4.0, -1.0);
        let via_skew = Mat3::skew(&a) * b;
        let direct = a.cross(&b);
        for i in 0..3 {
            assert!((via_skew[i] - direct[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn euler_321_zero_angles_is_identity() {
        assert!(mat_close(
            &Mat3::euler_321(0.0, 0.0, 0.0),
            &Mat3::identity(),
            1e-15,
        ));
    }

    #[test]
    fn euler_321_pure_pitch_rotates_forward_axis_down() {
        // Pitch 90° up: the reference +x axis maps to body +z... in a
        // z-down frame the body x axis sees the reference -z direction.
        let dcm = Mat3::euler_321(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        let x_ref = Vec3::new(1.0, 0.0, 0.0);
        let in_body = dcm * x_ref;
        assert!((in_body[0] - 0.0).abs() < 1e-12);
        assert!((in_body[2] - -1.0).abs() < 1e-12);
    }

    fn arb_angles() -> impl Strategy<Value = (f64, f64, f64)> {
        // Keep pitch away from ±90° where the 3-2-1 sequence is singular.
        (
            -3.0..3.0f64,
            -1.4..1.4f64,
            -3.0..3.0f64,
        )
    }

    proptest! {
        #[test]
        fn transpose_is_involutive(e in prop::array::uniform9(-1e2..1e2f64)) {
            let m = Mat3::new(e);
            prop_assert_eq!(m.transpose().transpose(), m);
        }

        #[test]
        fn euler_dcm_is_orthonormal((psi, tht, phi) in arb_angles()) {
            let dcm = Mat3::euler_321(psi, tht, phi);
            prop_assert!(mat_close(&(dcm * dcm.transpose()), &Mat3::identity(), 1e-12));
            prop_assert!((dcm.det() - 1.0).abs() < 1e-12);
        }

        #[test]
        fn dcm_inverse_equals_transpose((psi, tht, phi) in arb_angles()) {
            let dcm = Mat3::euler_321(psi, tht, phi);
            let inv = dcm.inverse().unwrap();
            prop_assert!(mat_close(&inv, &dcm.transpose(), 1e-9));
        }
    }
}
