//! The valley field: squared path distance plus a linear drift in x.

use cave_core::traits::Validate;
use cave_core::{CaveError, Result};
use serde::{Deserialize, Serialize};

use crate::distance::DistanceField;
use crate::grid::Grid;

/// Weights of the two field terms.
///
/// `value = distance * dist_sq - drift * x`. A positive `drift` lowers the
/// field as x grows; a negative one reverses the bias.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldCoefficients {
    #[serde(rename = "distance_coefficient")]
    pub distance: f64,
    #[serde(rename = "drift_coefficient")]
    pub drift: f64,
}

impl FieldCoefficients {
    pub fn new(distance: f64, drift: f64) -> Self {
        Self { distance, drift }
    }

    pub fn distance_term(&self, dist_sq: f64) -> f64 {
        self.distance * dist_sq
    }

    pub fn drift_term(&self, x: f64) -> f64 {
        -self.drift * x
    }

    pub fn evaluate(&self, dist_sq: f64, x: f64) -> f64 {
        self.distance_term(dist_sq) + self.drift_term(x)
    }
}

impl Default for FieldCoefficients {
    fn default() -> Self {
        Self {
            distance: 1.0,
            drift: 1.0,
        }
    }
}

impl Validate for FieldCoefficients {
    fn validate(&self) -> Result<()> {
        if !(self.distance.is_finite() && self.drift.is_finite()) {
            return Err(CaveError::configuration(format!(
                "field coefficients must be finite, got distance={} drift={}",
                self.distance, self.drift
            )));
        }
        Ok(())
    }
}

/// Field values co-indexed with a [`Grid`]. Unbounded; no clamping or
/// normalisation is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarField {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl ScalarField {
    pub fn build(
        grid: &Grid,
        dist_sq: &DistanceField,
        coefficients: FieldCoefficients,
    ) -> Result<Self> {
        coefficients.validate()?;
        if dist_sq.rows() != grid.rows() || dist_sq.cols() != grid.cols() {
            return Err(CaveError::invalid_input(format!(
                "distance field is {}x{} but grid is {}x{}",
                dist_sq.cols(),
                dist_sq.rows(),
                grid.cols(),
                grid.rows()
            )));
        }

        let cols = grid.cols();
        let values = dist_sq
            .values()
            .iter()
            .enumerate()
            .map(|(i, &d)| coefficients.evaluate(d, grid.xs()[i % cols]))
            .collect();

        Ok(Self {
            rows: grid.rows(),
            cols,
            values,
        })
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

    pub fn value_at(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// `(row, col, value)` of the lowest sample; the first one on ties.
    pub fn argmin(&self) -> (usize, usize, f64) {
        let (i, v) = self
            .values
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, v)| if v < best.1 { (i, v) } else { best });
        (i / self.cols, i % self.cols, v)
    }
}
