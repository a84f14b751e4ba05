pub mod scene;

// Re-export main types
pub use scene::{SurfaceLayer, ValleyScene};
