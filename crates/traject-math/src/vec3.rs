//! 3-component column vector.

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// A 3-component column vector of `f64`.
///
/// Indexable with `v[0..3]`; most call sites use the named accessors.
/// All arithmetic is componentwise except [`Vec3::dot`] and [`Vec3::cross`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3(pub [f64; 3]);

impl Vec3 {
    /// Construct from three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    /// The zero vector.
    pub const fn zero() -> Self {
        Self([0.0; 3])
    }

    /// First component.
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    /// Second component.
    pub fn y(&self) -> f64 {
        self.0[1]
    }

    /// Third component.
    pub fn z(&self) -> f64 {
        self.0[2]
    }

    /// Dot product.
    pub fn dot(&self, rhs: &Self) -> f64 {
        self.0[0] * rhs.0[0] + self.0[1] * rhs.0[1] + self.0[2] * rhs.0[2]
    }

    /// Cross product `self × rhs`.
    pub fn cross(&self, rhs: &Self) -> Self {
        Self([
            self.0[1] * rhs.0[2] - self.0[2] * rhs.0[1],
            self.0[2] * rhs.0[0] - self.0[0] * rhs.0[2],
            self.0[0] * rhs.0[1] - self.0[1] * rhs.0[0],
        ])
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Componentwise scale.
    pub fn scale(&self, k: f64) -> Self {
        Self([self.0[0] * k, self.0[1] * k, self.0[2] * k])
    }

    /// Convert to polar form: magnitude, azimuth, elevation.
    ///
    /// Azimuth is measured in the x-y plane from +x toward +y; elevation
    /// is positive above the x-y plane (toward −z in a z-down frame the
    /// caller interprets; this routine is frame-agnostic). The zero
    /// vector maps to all-zero polar components.
    pub fn to_polar(&self) -> Polar {
        let magnitude = self.norm();
        if magnitude == 0.0 {
            return Polar {
                magnitude: 0.0,
                azimuth: 0.0,
                elevation: 0.0,
            };
        }
        let azimuth = self.0[1].atan2(self.0[0]);
        let elevation = (-self.0[2]).atan2((self.0[0] * self.0[0] + self.0[1] * self.0[1]).sqrt());
        Polar {
            magnitude,
            azimuth,
            elevation,
        }
    }

    /// Build a Cartesian vector from polar components (inverse of
    /// [`Vec3::to_polar`]).
    pub fn from_polar(polar: Polar) -> Self {
        let (sa, ca) = polar.azimuth.sin_cos();
        let (se, ce) = polar.elevation.sin_cos();
        Self([
            polar.magnitude * ce * ca,
            polar.magnitude * ce * sa,
            -polar.magnitude * se,
        ])
    }
}

/// Polar decomposition of a [`Vec3`]: magnitude, azimuth, elevation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Polar {
    /// Vector magnitude.
    pub magnitude: f64,
    /// Azimuth angle in radians.
    pub azimuth: f64,
    /// Elevation angle in radians.
    pub elevation: f64,
}

impl Index<usize> for Vec3 {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Vec3 {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
        ])
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3([
            self.0[0] - rhs.0[0],
            self.0[1] - rhs.0[1],
            self.0[2] - rhs.0[2],
        ])
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Vec3) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, k: f64) -> Vec3 {
        self.scale(k)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.0[0], self.0[1], self.0[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn cross_of_basis_vectors() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn norm_of_pythagorean_triple() {
        assert_eq!(Vec3::new(3.0, 4.0, 0.0).norm(), 5.0);
    }

    #[test]
    fn zero_vector_polar_is_zero() {
        let p = Vec3::zero().to_polar();
        assert_eq!(p.magnitude, 0.0);
        assert_eq!(p.azimuth, 0.0);
        assert_eq!(p.elevation, 0.0);
    }

    fn arb_vec3() -> impl Strategy<Value = Vec3> {
        (-1e3..1e3f64, -1e3..1e3f64, -1e3..1e3f64).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn add_commutative(a in arb_vec3(), b in arb_vec3()) {
            prop_assert_eq!(a + b, b + a);
        }

        #[test]
        fn cross_is_anticommutative(a in arb_vec3(), b in arb_vec3()) {
            let ab = a.cross(&b);
            let ba = b.cross(&a);
            for i in 0..3 {
                prop_assert!(close(ab[i], -ba[i]));
            }
        }

        #[test]
        fn cross_orthogonal_to_operands(a in arb_vec3(), b in arb_vec3()) {
            let c = a.cross(&b);
            // |a·(a×b)| scales with |a||a||b|; normalize the tolerance.
            let scale = 1.0 + a.norm() * a.norm() * b.norm();
            prop_assert!(a.dot(&c).abs() / scale < 1e-9);
            prop_assert!(b.dot(&c).abs() / scale < 1e-9);
        }

        #[test]
        fn polar_round_trip(v in arb_vec3()) {
            let back = Vec3::from_polar(v.to_polar());
            for i in 0..3 {
                prop_assert!(close(v[i], back[i]), "component {i}: {} vs {}", v[i], back[i]);
            }
        }

        #[test]
        fn scale_by_norm_reciprocal_is_unit(v in arb_vec3()) {
            prop_assume!(v.norm() > 1e-6);
            let u = v.scale(1.0 / v.norm());
            prop_assert!(close(u.norm(), 1.0));
        }
    }
}
