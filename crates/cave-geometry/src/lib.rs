//! cavepath geometry: curves, waypoint splines, and sampling.

pub mod curve;
pub mod spline;
pub mod tessellate;
pub mod waypoints;

pub use curve::{CubicBezier, Curve, Line};
pub use spline::{catmull_rom_segments, BezierSpline};
pub use tessellate::{sample_adaptive, sample_uniform, SampledCurve};
pub use waypoints::Waypoints;
