/// Tolerance management for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Linear tolerance for distance comparisons (in model units)
    pub linear: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-9;

    pub fn new(linear: f64) -> Self {
        Self { linear }
    }

    pub fn default_precision() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
        }
    }

    /// Check if a value is zero within linear tolerance
    pub fn is_zero(self, v: f64) -> bool {
        v.abs() <= self.linear
    }

    /// Check if two points given as `(x, z)` pairs coincide.
    ///
    /// Compares the Euclidean distance, not each coordinate separately.
    pub fn points_coincide(self, a: (f64, f64), b: (f64, f64)) -> bool {
        let dx = a.0 - b.0;
        let dz = a.1 - b.1;
        self.is_zero((dx * dx + dz * dz).sqrt())
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
