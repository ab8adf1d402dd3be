use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("cell vector size mismatch: expected {expected}, got {got}")]
    GridSizeMismatch { expected: usize, got: usize },
    #[error("invalid generation config: {0}")]
    InvalidConfig(&'static str),
    #[error("no room survived size filtering for seed {seed}; retry with another seed")]
    NoSurvivingRooms { seed: u64 },
}
