//! Trapezoidal integration — the only integration contract in the system.
//!
//! Every dynamic module (translational equations of motion, actuator lags,
//! fuel depletion, DCM propagation) advances its states through these three
//! entry points and nothing else.
//!
//! # First-step convention
//!
//! The trapezoid needs the previous step's derivative. On the first step
//! there is none; callers prime the previous-derivative slot with the first
//! computed derivative in their `init`, which degenerates the first step to
//! forward Euler. Subsequent steps are true trapezoidal. The integrator
//! itself stays stateless — per-state first-call tracking would move module
//! state out of the store.

use traject_math::{Mat3, Vec3};

/// Advance a scalar state one step by the trapezoidal rule:
///
/// `new = prev + step/2 · (prev_derivative + new_derivative)`.
///
/// With `step == 0` the previous value is returned unchanged.
pub fn integrate(new_derivative: f64, prev_derivative: f64, prev_value: f64, step: f64) -> f64 {
    prev_value + 0.5 * step * (prev_derivative + new_derivative)
}

/// Componentwise trapezoidal step for a vector state.
pub fn integrate_vec3(
    new_derivative: &Vec3,
    prev_derivative: &Vec3,
    prev_value: &Vec3,
    step: f64,
) -> Vec3 {
    *prev_value + (*prev_derivative + *new_derivative) * (0.5 * step)
}

/// Componentwise trapezoidal step for a matrix state.
pub fn integrate_mat3(
    new_derivative: &Mat3,
    prev_derivative: &Mat3,
    prev_value: &Mat3,
    step: f64,
) -> Mat3 {
    *prev_value + (*prev_derivative + *new_derivative) * (0.5 * step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_step_returns_previous_value() {
        assert_eq!(integrate(5.0, 3.0, 7.0, 0.0), 7.0);
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(integrate_vec3(&v, &v, &v, 0.0), v);
    }

    #[test]
    fn constant_derivative_is_exact() {
        // d/dt x = 2 from x = 1: after 0.5 s, x = 2.
        assert_eq!(integrate(2.0, 2.0, 1.0, 0.5), 2.0);
    }

    #[test]
    fn linear_derivative_is_exact() {
        // d/dt x = t: x(t) = t²/2. The trapezoid is exact for linear
        // integrands regardless of step size.
        let mut x = 0.0;
        let mut prev_d = 0.0;
        let dt = 0.25;
        for k in 1..=8 {
            let t = k as f64 * dt;
            let new_d = t;
            x = integrate(new_d, prev_d, x, dt);
            prev_d = new_d;
        }
        let t_end = 2.0;
        assert!((x - t_end * t_end / 2.0).abs() < 1e-12);
    }

    #[test]
    fn quadratic_derivative_converges_second_order() {
        // d/dt x = t²: exact x(1) = 1/3. Error should shrink ~4x when
        // the step is halved.
        fn run(dt: f64) -> f64 {
            let mut x = 0.0;
            let mut prev_d = 0.0;
            let steps = (1.0 / dt).round() as usize;
            for k in 1..=steps {
                let t = k as f64 * dt;
                let new_d = t * t;
                x = integrate(new_d, prev_d, x, dt);
                prev_d = new_d;
            }
            x
        }
        let e1 = (run(0.01) - 1.0 / 3.0).abs();
        let e2 = (run(0.005) - 1.0 / 3.0).abs();
        let ratio = e1 / e2;
        assert!(
            (3.5..4.5).contains(&ratio),
            "expected ~4x error reduction, got {ratio}"
        );
    }

    #[test]
    fn matrix_integration_is_componentwise() {
        let d = Mat3::identity();
        let out = integrate_mat3(&d, &d, &Mat3::zero(), 2.0);
        assert_eq!(out, Mat3::identity() * 2.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The trapezoid weights both derivatives equally.
            #[test]
            fn symmetric_in_the_two_derivatives(
                new_d in -1e3..1e3f64,
                prev_d in -1e3..1e3f64,
                prev in -1e3..1e3f64,
                step in 0.0..1.0f64,
            ) {
                prop_assert_eq!(
                    integrate(new_d, prev_d, prev, step),
                    integrate(prev_d, new_d, prev, step),
                );
            }

            /// Zero step is the identity, for any state.
            #[test]
            fn zero_step_identity(
                new_d in -1e3..1e3f64,
                prev_d in -1e3..1e3f64,
                prev in -1e3..1e3f64,
            ) {
                prop_assert_eq!(integrate(new_d, prev_d, prev, 0.0), prev);
            }

            /// Vector integration agrees with per-component scalar
            /// integration.
            #[test]
            fn vector_matches_componentwise_scalar(
                c in prop::array::uniform9(-1e3..1e3f64),
                step in 0.0..1.0f64,
            ) {
                let new_d = Vec3::new(c[0], c[1], c[2]);
                let prev_d = Vec3::new(c[3], c[4], c[5]);
                let prev = Vec3::new(c[6], c[7], c[8]);
                let whole = integrate_vec3(&new_d, &prev_d, &prev, step);
                for i in 0..3 {
                    prop_assert_eq!(
                        whole[i],
                        integrate(new_d[i], prev_d[i], prev[i], step),
                    );
                }
            }
        }
    }
}
