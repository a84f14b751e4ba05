use cave_core::traits::BoundingBox;
use cave_core::{CaveError, Result};
use cave_field::{DistanceField, Grid, ScalarField};
use cave_geometry::{BezierSpline, CubicBezier, SampledCurve};
use cave_math::{Aabb2, BoundaryPolygon, Point2};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Scalar field samples ready for display
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceLayer {
    /// Column coordinates
    pub xs: Vec<f64>,
    /// Row coordinates
    pub zs: Vec<f64>,
    /// Row-major field values, `zs.len() * xs.len()` entries
    pub values: Vec<f64>,
    /// Row-major squared path distance, co-indexed with `values`
    pub distance_sq: Vec<f64>,
}

impl SurfaceLayer {
    fn row(&self, r: usize) -> &[f64] {
        let cols = self.xs.len();
        &self.values[r * cols..(r + 1) * cols]
    }
}

/// Everything a viewer needs to draw the valley: the cave outline, the
/// planned path, and the field surface.
#[derive(Debug, Clone, Serialize)]
pub struct ValleyScene {
    pub title: String,
    pub boundary: Option<BoundaryPolygon>,
    pub waypoints: Vec<Point2>,
    pub segments: Vec<CubicBezier>,
    pub curve: Vec<Point2>,
    pub surface: Option<SurfaceLayer>,
}

impl ValleyScene {
    /// Create a new empty scene
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            boundary: None,
            waypoints: Vec::new(),
            segments: Vec::new(),
            curve: Vec::new(),
            surface: None,
        }
    }

    pub fn set_boundary(&mut self, boundary: BoundaryPolygon) {
        self.boundary = Some(boundary);
    }

    /// Record the spline and the polyline sampled from it
    pub fn set_path(&mut self, spline: &BezierSpline, curve: &SampledCurve) {
        self.waypoints = spline.waypoints().points().to_vec();
        self.segments = spline.segments().to_vec();
        self.curve = curve.points().to_vec();
    }

    /// Attach the field surface; all three inputs must share one shape
    pub fn set_surface(
        &mut self,
        grid: &Grid,
        distance: &DistanceField,
        field: &ScalarField,
    ) -> Result<()> {
        let shape = (grid.rows(), grid.cols());
        if (distance.rows(), distance.cols()) != shape || (field.rows(), field.cols()) != shape {
            return Err(CaveError::invalid_input(format!(
                "surface layers disagree: grid {:?}, distance {:?}, field {:?}",
                shape,
                (distance.rows(), distance.cols()),
                (field.rows(), field.cols())
            )));
        }
        self.surface = Some(SurfaceLayer {
            xs: grid.xs().to_vec(),
            zs: grid.zs().to_vec(),
            values: field.values().to_vec(),
            distance_sq: distance.values().to_vec(),
        });
        Ok(())
    }

    /// Compute scene bounding box in the (x, z) plane
    pub fn bounds(&self) -> Option<Aabb2> {
        let surface = self.surface.as_ref().and_then(|s| {
            match (s.xs.first(), s.xs.last(), s.zs.first(), s.zs.last()) {
                (Some(&x0), Some(&x1), Some(&z0), Some(&z1)) => {
                    Some(Aabb2::new(Point2::new(x0, z0), Point2::new(x1, z1)))
                }
                _ => None,
            }
        });
        [
            self.boundary.as_ref().and_then(|b| b.bounding_box()),
            Aabb2::from_points(&self.curve),
            Aabb2::from_points(&self.waypoints),
            surface,
        ]
        .into_iter()
        .flatten()
        .reduce(|a, b| a.merge(&b))
    }

    /// One-paragraph description used by the CLI `--summary` mode
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{}\n  waypoints: {}\n  segments: {}\n  curve samples: {}\n",
            self.title,
            self.waypoints.len(),
            self.segments.len(),
            self.curve.len()
        );
        if let Some(bounds) = self.bounds() {
            let size = bounds.extents();
            out.push_str(&format!("  extent: {:.3} x {:.3}\n", size.x, size.y));
        }
        if let Some(boundary) = &self.boundary {
            out.push_str(&format!("  boundary vertices: {}\n", boundary.vertices().len()));
        }
        if let Some(surface) = &self.surface {
            let min = surface.values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = surface.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            out.push_str(&format!(
                "  surface: {} x {} samples, value range [{:.3}, {:.3}]\n",
                surface.xs.len(),
                surface.zs.len(),
                min,
                max
            ));
        }
        out
    }

    /// Serialize the whole scene as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CaveError::Parse(format!("scene serialization failed: {}", e)))
    }

    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("wrote scene JSON to {}", path.display());
        Ok(())
    }

    /// Export the surface as `x,z,distance_sq,value` rows
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let surface = self
            .surface
            .as_ref()
            .ok_or_else(|| CaveError::invalid_input("scene has no surface to export"))?;

        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        writeln!(file, "x,z,distance_sq,value")?;
        let cols = surface.xs.len();
        for (r, &z) in surface.zs.iter().enumerate() {
            for (c, &x) in surface.xs.iter().enumerate() {
                let i = r * cols + c;
                writeln!(file, "{},{},{},{}", x, z, surface.distance_sq[i], surface.values[i])?;
            }
        }
        file.flush()?;
        log::info!("wrote {} surface rows to {}", surface.values.len(), path.display());
        Ok(())
    }

    /// Export scene as a standalone HTML file with an embedded Plotly viewer.
    ///
    /// The surface is drawn in 3-D; path, waypoints and outline are laid
    /// at height zero.
    pub fn export_html(&self, path: &Path) -> Result<()> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        let title_json = script_json(&self.title)?;

        write!(file, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            margin: 0;
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: #1a1a1a;
        }}
        #plot {{
            width: 100vw;
            height: 100vh;
        }}
        #error {{
            position: absolute;
            top: 50%;
            left: 50%;
            transform: translate(-50%, -50%);
            background: rgba(200, 0, 0, 0.9);
            color: white;
            padding: 20px;
            border-radius: 5px;
            display: none;
        }}
    </style>
</head>
<body>
    <div id="plot"></div>
    <div id="error">Failed to load Plotly from CDN. Please check your internet connection.</div>

    <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
    <script>
        if (typeof Plotly === 'undefined') document.getElementById('error').style.display='block';
"#, title = escape_html(&self.title))?;

        let traces = self.plot_traces()?;
        writeln!(file, "        const traces = {};", traces)?;

        write!(file, r#"
        Plotly.newPlot('plot', traces, {{
            title: {title},
            paper_bgcolor: '#1a1a1a',
            font: {{ color: '#ddd' }},
            scene: {{
                xaxis: {{ title: 'x' }},
                yaxis: {{ title: 'z' }},
                zaxis: {{ title: 'surface value' }}
            }}
        }});
    </script>
</body>
</html>
"#, title = title_json)?;

        file.flush()?;
        log::info!("wrote HTML viewer to {}", path.display());
        Ok(())
    }

    fn plot_traces(&self) -> Result<String> {
        use serde_json::json;

        let mut traces = Vec::new();

        if let Some(surface) = &self.surface {
            let rows: Vec<&[f64]> = (0..surface.zs.len()).map(|r| surface.row(r)).collect();
            traces.push(json!({
                "type": "surface",
                "name": "field",
                "x": surface.xs,
                "y": surface.zs,
                "z": rows,
                "opacity": 0.85,
                "showscale": false,
            }));
        }

        let line = |name: &str, pts: &[Point2], mode: &str, width: f64| {
            json!({
                "type": "scatter3d",
                "name": name,
                "mode": mode,
                "x": pts.iter().map(|p| p.x).collect::<Vec<_>>(),
                "y": pts.iter().map(|p| p.y).collect::<Vec<_>>(),
                "z": vec![0.0; pts.len()],
                "line": { "width": width },
                "marker": { "size": 4 },
            })
        };

        if !self.curve.is_empty() {
            traces.push(line("path", &self.curve, "lines", 6.0));
        }
        if !self.waypoints.is_empty() {
            traces.push(line("waypoints", &self.waypoints, "markers", 0.0));
        }
        if let Some(boundary) = &self.boundary {
            traces.push(line("cave", &boundary.closed_ring(), "lines", 6.0));
        }

        script_json(&traces)
    }
}

/// Escape text for an HTML element body.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JSON safe to embed inside a `<script>` element; `<` never appears raw,
/// so user text cannot close the element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map(|json| json.replace('<', "\\u003c"))
        .map_err(|e| CaveError::Parse(format!("script JSON serialization failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cave_field::{nearest_distance_field, FieldCoefficients, GridSpec, IndexKind};
    use cave_geometry::{sample_uniform, Waypoints};

    fn build_scene() -> ValleyScene {
        let boundary =
            BoundaryPolygon::from_xz(&[[0.0, 0.0], [20.0, 0.0], [20.0, 10.0], [0.0, 10.0]])
                .unwrap();
        let spline = BezierSpline::from_waypoints(
            Waypoints::from_xz(&[[2.0, 2.0], [10.0, 8.0], [18.0, 3.0]]).unwrap(),
        );
        let curve = sample_uniform(&spline, 10).unwrap();
        let grid = GridSpec::from_bounds(&boundary.bounds(), 6, 4, 2.0)
            .build()
            .unwrap();
        let dist = nearest_distance_field(&grid, &curve, IndexKind::KdTree, false);
        let field = ScalarField::build(&grid, &dist, FieldCoefficients::default()).unwrap();

        let mut scene = ValleyScene::new("Test Valley");
        scene.set_boundary(boundary);
        scene.set_path(&spline, &curve);
        scene.set_surface(&grid, &dist, &field).unwrap();
        scene
    }

    #[test]
    fn test_empty_scene() {
        let scene = ValleyScene::new("Empty");
        assert!(scene.bounds().is_none());
        assert!(scene.surface.is_none());
        assert!(scene.summary().contains("segments: 0"));
    }

    #[test]
    fn test_set_path_and_bounds() {
        let scene = build_scene();
        assert_eq!(scene.waypoints.len(), 3);
        assert_eq!(scene.segments.len(), 2);
        assert_eq!(scene.curve.len(), 21);
        let b = scene.bounds().unwrap();
        assert_eq!(b.x_range(), [0.0, 20.0]);
        assert_eq!(b.z_range(), [-2.0, 12.0]);
    }

    #[test]
    fn test_surface_shape_mismatch() {
        let mut scene = build_scene();
        let curve = SampledCurve::from_points(scene.curve.clone()).unwrap();
        let small_spec = GridSpec {
            x_range: [0.0, 1.0],
            z_range: [0.0, 1.0],
            resolution_x: 2,
            resolution_z: 2,
            z_margin: 0.0,
        };
        let small = small_spec.build().unwrap();
        let big = GridSpec {
            resolution_x: 3,
            ..small_spec
        }
        .build()
        .unwrap();
        let dist = nearest_distance_field(&small, &curve, IndexKind::BruteForce, false);
        let field = ScalarField::build(&small, &dist, FieldCoefficients::default()).unwrap();
        assert!(scene.set_surface(&big, &dist, &field).is_err());
    }

    #[test]
    fn test_json_export_round_trips_through_serde_json() {
        let scene = build_scene();
        let json = scene.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["title"], "Test Valley");
        assert_eq!(parsed["waypoints"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["segments"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["surface"]["xs"].as_array().unwrap().len(), 6);
        assert_eq!(parsed["surface"]["values"].as_array().unwrap().len(), 24);
    }

    #[test]
    fn test_html_export() {
        let scene = build_scene();
        let dir = tempfile::tempdir().unwrap();
        let html_path = dir.path().join("valley.html");

        scene.export_html(&html_path).unwrap();

        let content = std::fs::read_to_string(&html_path).unwrap();
        assert!(content.contains("<!DOCTYPE html>"));
        assert!(content.contains("plotly"));
        assert!(content.contains("Test Valley"));
        assert!(content.contains("\"surface\""));
        assert!(content.contains("\"waypoints\""));
    }

    #[test]
    fn test_html_export_escapes_title() {
        let mut scene = build_scene();
        scene.title = "Pit <B> & \"shaft\" </script>".to_string();
        let dir = tempfile::tempdir().unwrap();
        let html_path = dir.path().join("valley.html");

        scene.export_html(&html_path).unwrap();

        let content = std::fs::read_to_string(&html_path).unwrap();
        assert!(content
            .contains("<title>Pit &lt;B&gt; &amp; &quot;shaft&quot; &lt;/script&gt;</title>"));
        assert!(content.contains(r#"title: "Pit \u003cB> & \"shaft\" \u003c/script>""#));
        assert_eq!(content.matches("</script>").count(), 2);
    }

    #[test]
    fn test_csv_export() {
        let scene = build_scene();
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("valley.csv");

        scene.export_csv(&csv_path).unwrap();

        let content = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "x,z,distance_sq,value");
        assert_eq!(lines.len(), 1 + 24);
        assert!(lines[1].starts_with("0,-2,"));
    }

    #[test]
    fn test_csv_requires_surface() {
        let scene = ValleyScene::new("No surface");
        let dir = tempfile::tempdir().unwrap();
        assert!(scene.export_csv(&dir.path().join("x.csv")).is_err());
    }
}
