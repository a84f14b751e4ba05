//! cavepath fields: sample grids, nearest-curve distance, and the valley field.

pub mod distance;
pub mod grid;
pub mod nearest;
pub mod scalar;

pub use distance::{nearest_distance_field, DistanceField};
pub use grid::{Grid, GridSpec};
pub use nearest::{BruteForceIndex, IndexKind, KdTreeIndex, NearestPoint};
pub use scalar::{FieldCoefficients, ScalarField};
