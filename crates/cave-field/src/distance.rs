//! Squared nearest-curve distance over a grid.

use cave_geometry::SampledCurve;
use cave_math::Point2;
use rayon::prelude::*;
use serde::Serialize;

use crate::grid::Grid;
use crate::nearest::{IndexKind, NearestPoint};

/// Squared distance from every grid sample to the nearest curve point,
/// row-major and co-indexed with the [`Grid`] it was computed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceField {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl DistanceField {
    /// Query every grid sample in order on the calling thread.
    pub fn compute(grid: &Grid, index: &dyn NearestPoint) -> Self {
        let values = grid
            .points()
            .map(|p| index.nearest_distance_sq(p))
            .collect();
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            values,
        }
    }

    /// Same result as [`DistanceField::compute`], with grid rows spread
    /// over the rayon thread pool. Each worker writes only its own row.
    pub fn compute_parallel(grid: &Grid, index: &dyn NearestPoint) -> Self {
        let cols = grid.cols();
        let mut values = vec![0.0; grid.len()];
        values
            .par_chunks_mut(cols)
            .zip(grid.zs().par_iter())
            .for_each(|(row, &z)| {
                for (slot, &x) in row.iter_mut().zip(grid.xs()) {
                    *slot = index.nearest_distance_sq(Point2::new(x, z));
                }
            });
        Self {
            rows: grid.rows(),
            cols,
            values,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Build the index selected by `kind` over `curve` and evaluate the
/// squared distance field on `grid`.
pub fn nearest_distance_field(
    grid: &Grid,
    curve: &SampledCurve,
    kind: IndexKind,
    parallel: bool,
) -> DistanceField {
    let index = kind.build(curve);
    log::debug!(
        "distance field: {} grid samples against {} curve points ({:?}, parallel={})",
        grid.len(),
        index.len(),
        kind,
        parallel
    );
    if parallel {
        DistanceField::compute_parallel(grid, index.as_ref())
    } else {
        DistanceField::compute(grid, index.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSpec;
    use approx::assert_abs_diff_eq;
    use cave_math::dvec2;

    fn small_grid() -> Grid {
        GridSpec {
            x_range: [0.0, 4.0],
            z_range: [0.0, 2.0],
            resolution_x: 5,
            resolution_z: 3,
            z_margin: 0.0,
        }
        .build()
        .unwrap()
    }

    #[test]
    fn test_single_point_curve() {
        let grid = small_grid();
        let curve = SampledCurve::from_points(vec![dvec2(2.0, 1.0)]).unwrap();
        let field = nearest_distance_field(&grid, &curve, IndexKind::BruteForce, false);
        assert_eq!(field.rows(), 3);
        assert_eq!(field.cols(), 5);
        assert_eq!(field.get(1, 2), 0.0);
        assert_eq!(field.get(0, 0), 5.0);
        assert_eq!(field.get(2, 4), 5.0);
        assert_eq!(field.max(), 5.0);
    }

    #[test]
    fn test_non_negative_and_zero_on_curve_points() {
        let grid = small_grid();
        let curve =
            SampledCurve::from_points(vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0), dvec2(3.0, 2.0)])
                .unwrap();
        let field = nearest_distance_field(&grid, &curve, IndexKind::KdTree, false);
        for (i, p) in grid.points().enumerate() {
            let d = field.values()[i];
            assert!(d >= 0.0);
            let on_curve = curve.iter().any(|c| *c == p);
            assert_eq!(d == 0.0, on_curve, "sample {:?} has distance {}", p, d);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let grid = small_grid();
        let curve = SampledCurve::from_points(vec![dvec2(0.3, 1.7), dvec2(2.2, 0.4)]).unwrap();
        let seq = nearest_distance_field(&grid, &curve, IndexKind::BruteForce, false);
        let par = nearest_distance_field(&grid, &curve, IndexKind::BruteForce, true);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_values_are_squared() {
        let grid = small_grid();
        let curve = SampledCurve::from_points(vec![dvec2(-3.0, 0.0)]).unwrap();
        let field = nearest_distance_field(&grid, &curve, IndexKind::BruteForce, false);
        // (0, 0) is 3 away, so the stored value is 9.
        assert_abs_diff_eq!(field.get(0, 0), 9.0, epsilon = 1e-12);
    }
}
