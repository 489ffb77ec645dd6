//! A single interpolation table.

use crate::error::TableError;

/// A 1-, 2-, or 3-dimensional interpolation table.
///
/// Axes are strictly monotonically increasing; data is stored flat in
/// x1-major order (`data[i1 * n2 * n3 + i2 * n3 + i3]`). Construction
/// validates everything so lookup never fails structurally — only the
/// arity of the query is checked at call time.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    name: String,
    dim: usize,
    axes: Vec<Vec<f64>>,
    data: Vec<f64>,
}

impl Table {
    /// Build a validated table.
    ///
    /// `axes` must hold exactly `dim` axis vectors; `data.len()` must be
    /// the product of the axis lengths.
    pub fn new(
        name: impl Into<String>,
        axes: Vec<Vec<f64>>,
        data: Vec<f64>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        let dim = axes.len();
        if !(1..=3).contains(&dim) {
            return Err(TableError::InvalidDimension { name, dim });
        }
        for (k, axis) in axes.iter().enumerate() {
            if axis.is_empty() {
                return Err(TableError::EmptyAxis { name, axis: k + 1 });
            }
            if axis.windows(2).any(|w| w[0] >= w[1]) {
                return Err(TableError::NonMonotonicAxis { name, axis: k + 1 });
            }
        }
        let expected: usize = axes.iter().map(Vec::len).product();
        if data.len() != expected {
            return Err(TableError::DataLengthMismatch {
                name,
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            name,
            dim,
            axes,
            data,
        })
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table dimension (1..=3).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// 1-D lookup.
    pub fn look_up1(&self, x1: f64) -> Result<f64, TableError> {
        self.check_dim(1)?;
        let (i, u) = bracket(&self.axes[0], x1);
        Ok(lerp(self.at1(i), self.at1(i + 1), u))
    }

    /// 2-D lookup (bilinear in the bracketing rectangle).
    pub fn look_up2(&self, x1: f64, x2: f64) -> Result<f64, TableError> {
        self.check_dim(2)?;
        let (i, u) = bracket(&self.axes[0], x1);
        let (j, v) = bracket(&self.axes[1], x2);
        let lo = lerp(self.at2(i, j), self.at2(i, j + 1), v);
        let hi = lerp(self.at2(i + 1, j), self.at2(i + 1, j + 1), v);
        Ok(lerp(lo, hi, u))
    }

    /// 3-D lookup (trilinear in the bracketing cube).
    pub fn look_up3(&self, x1: f64, x2: f64, x3: f64) -> Result<f64, TableError> {
        self.check_dim(3)?;
        let (i, u) = bracket(&self.axes[0], x1);
        let (j, v) = bracket(&self.axes[1], x2);
        let (k, w) = bracket(&self.axes[2], x3);
        let c00 = lerp(self.at3(i, j, k), self.at3(i, j, k + 1), w);
        let c01 = lerp(self.at3(i, j + 1, k), self.at3(i, j + 1, k + 1), w);
        let c10 = lerp(self.at3(i + 1, j, k), self.at3(i + 1, j, k + 1), w);
        let c11 = lerp(self.at3(i + 1, j + 1, k), self.at3(i + 1, j + 1, k + 1), w);
        Ok(lerp(lerp(c00, c01, v), lerp(c10, c11, v), u))
    }

    fn check_dim(&self, requested: usize) -> Result<(), TableError> {
        if self.dim != requested {
            return Err(TableError::DimensionMismatch {
                name: self.name.clone(),
                table_dim: self.dim,
                requested_dim: requested,
            });
        }
        Ok(())
    }

    // Flat accessors clamp the trailing index so a single-point axis
    // (bracket returns i = 0, u = 0 with i + 1 out of range) stays in
    // bounds; the weight is zero there, so the value is exact.
    fn at1(&self, i: usize) -> f64 {
        self.data[i.min(self.axes[0].len() - 1)]
    }

    fn at2(&self, i: usize, j: usize) -> f64 {
        let n2 = self.axes[1].len();
        self.data[i.min(self.axes[0].len() - 1) * n2 + j.min(n2 - 1)]
    }

    fn at3(&self, i: usize, j: usize, k: usize) -> f64 {
        let n2 = self.axes[1].len();
        let n3 = self.axes[2].len();
        self.data[i.min(self.axes[0].len() - 1) * n2 * n3 + j.min(n2 - 1) * n3 + k.min(n3 - 1)]
    }
}

/// Locate the bracketing interval of `x` on a sorted axis.
///
/// Returns `(i, u)` where `axis[i] <= x <= axis[i + 1]` and `u` is the
/// interpolation fraction. Out-of-range queries clamp: below the first
/// point → `(0, 0.0)`; above the last → `(n - 2, 1.0)` (or `(0, 0.0)`
/// for a single-point axis).
fn bracket(axis: &[f64], x: f64) -> (usize, f64) {
    let n = axis.len();
    if n == 1 || x <= axis[0] {
        return (0, 0.0);
    }
    if x >= axis[n - 1] {
        return (n - 2, 1.0);
    }
    // partition_point: number of points <= x; x is strictly inside the range.
    let upper = axis.partition_point(|&a| a <= x);
    let i = upper - 1;
    let u = (x - axis[i]) / (axis[i + 1] - axis[i]);
    (i, u)
}

fn lerp(a: f64, b: f64, u: f64) -> f64 {
    a + (b - a) * u
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drag_table() -> Table {
        // cd vs mach
        Table::new(
            "cd_mach",
            vec![vec![0.0, 0.8, 1.2, 2.0]],
            vec![0.30, 0.35, 0.60, 0.45],
        )
        .unwrap()
    }

    fn thrust_table() -> Table {
        // thrust vs (altitude, mach), x1-major
        Table::new(
            "thrust",
            vec![vec![0.0, 10_000.0], vec![0.0, 1.0, 2.0]],
            vec![
                100.0, 110.0, 120.0, // alt 0
                80.0, 90.0, 100.0, // alt 10000
            ],
        )
        .unwrap()
    }

    #[test]
    fn exact_breakpoints_return_data() {
        let t = drag_table();
        assert_eq!(t.look_up1(0.8).unwrap(), 0.35);
        assert_eq!(t.look_up1(2.0).unwrap(), 0.45);
    }

    #[test]
    fn midpoint_interpolates_linearly() {
        let t = drag_table();
        assert!((t.look_up1(1.0).unwrap() - 0.475).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_clamps_to_endpoints() {
        let t = drag_table();
        assert_eq!(t.look_up1(-5.0).unwrap(), 0.30);
        assert_eq!(t.look_up1(99.0).unwrap(), 0.45);
    }

    #[test]
    fn bilinear_center_of_cell() {
        let t = thrust_table();
        // Center of the (alt, mach) cell [0,10000]x[0,1]: mean of 4 corners.
        let v = t.look_up2(5_000.0, 0.5).unwrap();
        assert!((v - (100.0 + 110.0 + 80.0 + 90.0) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn wrong_arity_is_dimension_mismatch() {
        let t = thrust_table();
        match t.look_up1(0.0) {
            Err(TableError::DimensionMismatch {
                table_dim,
                requested_dim,
                ..
            }) => {
                assert_eq!(table_dim, 2);
                assert_eq!(requested_dim, 1);
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn non_monotonic_axis_rejected() {
        match Table::new("bad", vec![vec![0.0, 1.0, 1.0]], vec![0.0, 0.0, 0.0]) {
            Err(TableError::NonMonotonicAxis { axis, .. }) => assert_eq!(axis, 1),
            other => panic!("expected NonMonotonicAxis, got {other:?}"),
        }
    }

    #[test]
    fn data_length_checked() {
        match Table::new("bad", vec![vec![0.0, 1.0]], vec![0.0]) {
            Err(TableError::DataLengthMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected DataLengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn single_point_axis_is_constant() {
        let t = Table::new("k", vec![vec![5.0]], vec![7.5]).unwrap();
        assert_eq!(t.look_up1(0.0).unwrap(), 7.5);
        assert_eq!(t.look_up1(5.0).unwrap(), 7.5);
        assert_eq!(t.look_up1(100.0).unwrap(), 7.5);
    }

    #[test]
    fn trilinear_recovers_corner_values() {
        let axes = vec![vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0]];
        let data: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let t = Table::new("cube", axes, data).unwrap();
        assert_eq!(t.look_up3(0.0, 0.0, 0.0).unwrap(), 0.0);
        assert_eq!(t.look_up3(1.0, 1.0, 1.0).unwrap(), 7.0);
        assert_eq!(t.look_up3(1.0, 0.0, 1.0).unwrap(), 5.0);
        // Cube center: mean of all eight corners.
        assert!((t.look_up3(0.5, 0.5, 0.5).unwrap() - 3.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn lookup_is_idempotent(x in -10.0..10.0f64) {
            let t = drag_table();
            let a = t.look_up1(x).unwrap();
            let b = t.look_up1(x).unwrap();
            // Bit-identical, not merely close.
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }

        #[test]
        fn lookup_stays_within_data_hull(x in -10.0..10.0f64) {
            let t = drag_table();
            let v = t.look_up1(x).unwrap();
            prop_assert!((0.30..=0.60).contains(&v));
        }
    }
}
