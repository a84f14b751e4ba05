//! TOML configuration for a valley run.
//!
//! Every key is optional. Missing numeric settings fall back to the
//! defaults below and missing geometry falls back to the reference cave.

use std::path::Path;

use cave_core::traits::Validate;
use cave_core::{CaveError, Result, Tolerance};
use cave_field::{FieldCoefficients, GridSpec, IndexKind};
use cave_geometry::Waypoints;
use cave_math::{BoundaryPolygon, Point2};
use serde::{Deserialize, Serialize};

/// Route through the reference cave, in traversal order.
pub const CAVE_WAYPOINTS: [[f64; 2]; 7] = [
    [7.5, 2.5],
    [12.0, 12.0],
    [30.0, 12.0],
    [35.0, 2.0],
    [48.0, 2.0],
    [51.0, 19.5],
    [62.5, 17.5],
];

/// Closed outline of the reference cave.
pub const CAVE_BOUNDARY: [[f64; 2]; 15] = [
    [0.0, 0.0],
    [15.0, 0.0],
    [15.0, 10.0],
    [25.0, 10.0],
    [25.0, -5.0],
    [55.0, -5.0],
    [55.0, 15.0],
    [70.0, 15.0],
    [70.0, 25.0],
    [45.0, 25.0],
    [45.0, 5.0],
    [40.0, 5.0],
    [40.0, 25.0],
    [0.0, 25.0],
    [0.0, 0.0],
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    #[default]
    Uniform,
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    pub mode: SamplingMode,
    pub samples_per_segment: usize,
    /// Chord deviation bound, used only in adaptive mode.
    pub tolerance: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            mode: SamplingMode::Uniform,
            samples_per_segment: 80,
            tolerance: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub resolution_x: usize,
    pub resolution_z: usize,
    pub z_margin: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution_x: GridSpec::DEFAULT_RESOLUTION_X,
            resolution_z: GridSpec::DEFAULT_RESOLUTION_Z,
            z_margin: GridSpec::DEFAULT_Z_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    pub distance_coefficient: f64,
    pub drift_coefficient: f64,
    pub index: IndexKind,
    pub parallel: bool,
}

impl FieldConfig {
    pub fn coefficients(&self) -> FieldCoefficients {
        FieldCoefficients::new(self.distance_coefficient, self.drift_coefficient)
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        let coefficients = FieldCoefficients::default();
        Self {
            distance_coefficient: coefficients.distance,
            drift_coefficient: coefficients.drift,
            index: IndexKind::default(),
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValleyConfig {
    pub title: String,
    /// `[x, z]` pairs in traversal order.
    pub waypoints: Vec<[f64; 2]>,
    /// `[x, z]` outline vertices.
    pub boundary: Vec<[f64; 2]>,
    /// Drop coincident consecutive waypoints instead of rejecting them.
    pub merge_duplicates: bool,
    pub sampling: SamplingConfig,
    pub grid: GridConfig,
    pub field: FieldConfig,
}

impl Default for ValleyConfig {
    fn default() -> Self {
        Self {
            title: "Cave valley".to_string(),
            waypoints: CAVE_WAYPOINTS.to_vec(),
            boundary: CAVE_BOUNDARY.to_vec(),
            merge_duplicates: false,
            sampling: SamplingConfig::default(),
            grid: GridConfig::default(),
            field: FieldConfig::default(),
        }
    }
}

impl ValleyConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| CaveError::Parse(format!("invalid config: {}", e)))?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CaveError::Parse(format!("config serialization failed: {}", e)))
    }

    /// Waypoints under the configured duplicate policy.
    pub fn waypoints(&self) -> Result<Waypoints> {
        if self.merge_duplicates {
            let points = self.waypoints.iter().map(|&[x, z]| Point2::new(x, z)).collect();
            Waypoints::merge_duplicates(points, Tolerance::default())
        } else {
            Waypoints::from_xz(&self.waypoints)
        }
    }

    pub fn boundary(&self) -> Result<BoundaryPolygon> {
        BoundaryPolygon::from_xz(&self.boundary)
    }

    /// Grid spanning the outline's bounding box.
    pub fn grid_spec(&self, boundary: &BoundaryPolygon) -> GridSpec {
        GridSpec::from_bounds(
            &boundary.bounds(),
            self.grid.resolution_x,
            self.grid.resolution_z,
            self.grid.z_margin,
        )
    }
}

impl Validate for ValleyConfig {
    fn validate(&self) -> Result<()> {
        match self.sampling.mode {
            SamplingMode::Uniform if self.sampling.samples_per_segment == 0 => {
                return Err(CaveError::configuration(
                    "sampling.samples_per_segment must be at least 1",
                ));
            }
            SamplingMode::Adaptive
                if !(self.sampling.tolerance.is_finite() && self.sampling.tolerance > 0.0) =>
            {
                return Err(CaveError::configuration(format!(
                    "sampling.tolerance must be positive, got {}",
                    self.sampling.tolerance
                )));
            }
            _ => {}
        }
        let boundary = self.boundary()?;
        self.grid_spec(&boundary).validate()?;
        self.field.coefficients().validate()?;
        self.waypoints()?;
        Ok(())
    }
}
