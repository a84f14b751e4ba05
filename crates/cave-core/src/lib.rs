//! cavepath core: error type, tolerances, and shared traits.

pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{CaveError, Result};
pub use tolerance::Tolerance;
