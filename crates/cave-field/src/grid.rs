//! Regular sample grids over the cave cross-section.

use cave_core::traits::Validate;
use cave_core::{CaveError, Result};
use cave_math::{Aabb2, Point2};
use serde::{Deserialize, Serialize};

/// Parameters of a sample grid.
///
/// The grid spans `[min(x_range), max(x_range)]` horizontally and
/// `[min(z_range) - z_margin, max(z_range) + z_margin]` vertically. Only
/// the z-extent is padded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub x_range: [f64; 2],
    pub z_range: [f64; 2],
    /// Number of columns (samples along x).
    pub resolution_x: usize,
    /// Number of rows (samples along z).
    pub resolution_z: usize,
    pub z_margin: f64,
}

impl GridSpec {
    pub const DEFAULT_RESOLUTION_X: usize = 350;
    pub const DEFAULT_RESOLUTION_Z: usize = 250;
    pub const DEFAULT_Z_MARGIN: f64 = 10.0;

    /// Take the ranges from a bounding box, typically the cave outline's.
    pub fn from_bounds(
        bounds: &Aabb2,
        resolution_x: usize,
        resolution_z: usize,
        z_margin: f64,
    ) -> Self {
        Self {
            x_range: bounds.x_range(),
            z_range: bounds.z_range(),
            resolution_x,
            resolution_z,
            z_margin,
        }
    }

    pub fn build(&self) -> Result<Grid> {
        self.validate()?;

        let extent = Aabb2::new(
            Point2::new(self.x_range[0].min(self.x_range[1]), self.z_range[0].min(self.z_range[1])),
            Point2::new(self.x_range[0].max(self.x_range[1]), self.z_range[0].max(self.z_range[1])),
        )
        .padded(0.0, self.z_margin);
        let [x_min, x_max] = extent.x_range();
        let [z_min, z_max] = extent.z_range();

        let grid = Grid {
            xs: linspace(x_min, x_max, self.resolution_x),
            zs: linspace(z_min, z_max, self.resolution_z),
        };
        log::debug!(
            "grid {}x{} over x [{}, {}], z [{}, {}]",
            grid.cols(),
            grid.rows(),
            x_min,
            x_max,
            z_min,
            z_max
        );
        Ok(grid)
    }
}

impl Validate for GridSpec {
    fn validate(&self) -> Result<()> {
        if self.resolution_x == 0 || self.resolution_z == 0 {
            return Err(CaveError::configuration(format!(
                "grid resolution must be at least 1x1, got {}x{}",
                self.resolution_x, self.resolution_z
            )));
        }
        if !self.x_range.iter().chain(&self.z_range).all(|v| v.is_finite()) {
            return Err(CaveError::configuration("grid ranges must be finite"));
        }
        if !(self.z_margin.is_finite() && self.z_margin >= 0.0) {
            return Err(CaveError::configuration(format!(
                "z_margin must be finite and non-negative, got {}",
                self.z_margin
            )));
        }
        Ok(())
    }
}

/// Evenly spaced values from `start` to `end` inclusive; `end` is written
/// exactly. A single sample yields `start`.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start];
    }
    let step = (end - start) / (count - 1) as f64;
    let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
    values[count - 1] = end;
    values
}

/// A rectilinear grid stored as its two axes.
///
/// Flattened data over the grid is row-major: rows run along z, columns
/// along x, so the sample at `(row, col)` is `(xs[col], zs[row])`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    xs: Vec<f64>,
    zs: Vec<f64>,
}

impl Grid {
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn zs(&self) -> &[f64] {
        &self.zs
    }

    pub fn cols(&self) -> usize {
        self.xs.len()
    }

    pub fn rows(&self) -> usize {
        self.zs.len()
    }

    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols() + col
    }

    pub fn point(&self, row: usize, col: usize) -> Point2 {
        Point2::new(self.xs[col], self.zs[row])
    }

    /// All sample positions in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.zs
            .iter()
            .flat_map(move |&z| self.xs.iter().map(move |&x| Point2::new(x, z)))
    }

    /// Meshgrid X: `x_mesh()[index(r, c)] == xs[c]`.
    pub fn x_mesh(&self) -> Vec<f64> {
        self.points().map(|p| p.x).collect()
    }

    /// Meshgrid Z: `z_mesh()[index(r, c)] == zs[r]`.
    pub fn z_mesh(&self) -> Vec<f64> {
        self.points().map(|p| p.y).collect()
    }

    pub fn bounds(&self) -> Aabb2 {
        Aabb2::new(
            Point2::new(self.xs[0], self.zs[0]),
            Point2::new(self.xs[self.cols() - 1], self.zs[self.rows() - 1]),
        )
    }
}
