use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaveError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate segment: waypoint {index} at ({x}, {z}) coincides with its predecessor")]
    DegenerateSegment { index: usize, x: f64, z: f64 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaveError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_message_names_index() {
        let err = CaveError::DegenerateSegment {
            index: 3,
            x: 1.0,
            z: 2.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("waypoint 3"), "unexpected message: {}", msg);
        assert!(msg.contains("(1, 2)"));
    }

    #[test]
    fn test_io_conversion() {
        fn open_missing() -> Result<()> {
            std::fs::read("/definitely/not/here.toml")?;
            Ok(())
        }
        assert!(matches!(open_missing(), Err(CaveError::Io(_))));
    }
}
