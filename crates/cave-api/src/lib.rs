//! cavepath pipeline: configuration and the waypoint-to-valley pipeline.

pub mod config;
pub mod valley_pipeline;

pub use config::{FieldConfig, GridConfig, SamplingConfig, SamplingMode, ValleyConfig};
pub use valley_pipeline::{build_valley, ValleyOutput};
