//! Waypoints to valley field, end to end.

use cave_core::traits::{BoundingBox, Validate};
use cave_core::Result;
use cave_field::{nearest_distance_field, DistanceField, Grid, ScalarField};
use cave_geometry::{sample_adaptive, sample_uniform, BezierSpline, SampledCurve};
use cave_math::BoundaryPolygon;
use cave_render::ValleyScene;

use crate::config::{SamplingMode, ValleyConfig};

/// Every intermediate product of one pipeline run.
#[derive(Debug, Clone)]
pub struct ValleyOutput {
    pub title: String,
    pub boundary: BoundaryPolygon,
    pub spline: BezierSpline,
    pub curve: SampledCurve,
    pub grid: Grid,
    pub distance: DistanceField,
    pub field: ScalarField,
}

impl ValleyOutput {
    pub fn to_scene(&self) -> Result<ValleyScene> {
        let mut scene = ValleyScene::new(&self.title);
        scene.set_boundary(self.boundary.clone());
        scene.set_path(&self.spline, &self.curve);
        scene.set_surface(&self.grid, &self.distance, &self.field)?;
        Ok(scene)
    }
}

/// Run spline construction, sampling, grid construction, the distance
/// query and the field formula.
///
/// The whole configuration is validated first, so either every stage
/// succeeds or nothing is produced.
pub fn build_valley(config: &ValleyConfig) -> Result<ValleyOutput> {
    config.validate()?;

    let waypoints = config.waypoints()?;
    let boundary = config.boundary()?;

    let spline = BezierSpline::from_waypoints(waypoints);
    let curve = match config.sampling.mode {
        SamplingMode::Uniform => sample_uniform(&spline, config.sampling.samples_per_segment)?,
        SamplingMode::Adaptive => sample_adaptive(&spline, config.sampling.tolerance)?,
    };
    let (chords, polygons) = spline.length_bounds();
    log::info!(
        "path: {} waypoints, {} segments, {} samples, length {:.3} (bounds {:.3}..{:.3})",
        spline.waypoints().len(),
        spline.segment_count(),
        curve.len(),
        curve.polyline_length(),
        chords,
        polygons
    );
    if let Some(extent) = curve.bounding_box() {
        let size = extent.extents();
        log::debug!("path extent: {:.3} x {:.3}", size.x, size.y);
    }

    let grid = config.grid_spec(&boundary).build()?;
    if let Some(route) = spline.waypoints().bounding_box() {
        let covered = grid.bounds();
        if !(covered.contains_point(route.min) && covered.contains_point(route.max)) {
            log::warn!(
                "waypoints span x {:?}, z {:?}, beyond the field grid x {:?}, z {:?}",
                route.x_range(),
                route.z_range(),
                covered.x_range(),
                covered.z_range()
            );
        }
    }
    let distance = nearest_distance_field(&grid, &curve, config.field.index, config.field.parallel);
    let field = ScalarField::build(&grid, &distance, config.field.coefficients())?;

    let (row, col, lowest) = field.argmin();
    log::info!(
        "field: {}x{} samples, lowest value {:.3} at ({:.3}, {:.3}), highest {:.3}",
        grid.cols(),
        grid.rows(),
        lowest,
        grid.xs()[col],
        grid.zs()[row],
        field.max()
    );
    log::debug!("farthest grid node: squared distance {:.3}", distance.max());

    Ok(ValleyOutput {
        title: config.title.clone(),
        boundary,
        spline,
        curve,
        grid,
        distance,
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cave_core::CaveError;

    fn small_config() -> ValleyConfig {
        let mut config = ValleyConfig::default();
        config.grid.resolution_x = 36;
        config.grid.resolution_z = 26;
        config.sampling.samples_per_segment = 20;
        config
    }

    #[test]
    fn test_default_cave_run() {
        let out = build_valley(&small_config()).unwrap();
        assert_eq!(out.spline.segment_count(), 6);
        assert_eq!(out.curve.len(), 6 * 20 + 1);
        assert_eq!(out.grid.len(), 36 * 26);
        assert_eq!(out.field.values().len(), out.grid.len());
        assert_eq!(out.grid.bounds().z_range(), [-15.0, 35.0]);
    }

    #[test]
    fn test_adaptive_run_keeps_endpoints() {
        let mut config = small_config();
        config.sampling.mode = SamplingMode::Adaptive;
        config.sampling.tolerance = 0.05;
        let out = build_valley(&config).unwrap();
        assert_eq!(out.curve.points()[0], out.spline.waypoints().first());
        assert_eq!(out.curve.points()[out.curve.len() - 1], out.spline.waypoints().last());
    }

    #[test]
    fn test_invalid_config_produces_nothing() {
        let mut config = small_config();
        config.grid.resolution_x = 0;
        assert!(matches!(build_valley(&config), Err(CaveError::Configuration(_))));
    }

    #[test]
    fn test_route_beyond_outline_still_builds() {
        let mut config = small_config();
        config.waypoints = vec![[-20.0, 0.0], [30.0, 10.0], [90.0, 0.0]];
        let out = build_valley(&config).unwrap();
        let route = out.spline.waypoints().bounding_box().unwrap();
        assert!(!out.grid.bounds().contains_point(route.min));
        assert_eq!(out.field.values().len(), 36 * 26);
    }

    #[test]
    fn test_scene_conversion() {
        let out = build_valley(&small_config()).unwrap();
        let scene = out.to_scene().unwrap();
        assert_eq!(scene.waypoints.len(), 7);
        assert_eq!(scene.curve.len(), out.curve.len());
        assert!(scene.surface.is_some());
        assert!(scene.boundary.is_some());
    }
}
