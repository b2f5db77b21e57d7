use std::fmt;

/// Failures surfaced by level construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// A tile access fell outside the grid. Fatal to the generation call.
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    InvalidConfig(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "tile ({x}, {y}) is outside the {width}x{height} grid"
            ),
            LevelError::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for LevelError {}
