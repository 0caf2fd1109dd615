//! Error types for Quadbin operations.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuadbinError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuadbinError {
    /// Resolution outside `[0, 26]`, or a parent/child resolution on the wrong side
    /// of the cell's own resolution.
    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Wrong direction argument passed to sibling: {0:?}")]
    InvalidDirection(String),

    #[error("Invalid negative distance: {0}")]
    InvalidDistance(i32),

    #[error("Geometry type not supported: {0}")]
    UnsupportedGeometryType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cover exceeds the configured limit of {limit} cells at resolution {resolution}")]
    CoverTooLarge { limit: usize, resolution: u8 },

    #[error("Serialization error: {0}")]
    SerializationErrorWithContext(String),
}

impl QuadbinError {
    pub(crate) fn resolution_out_of_range(resolution: u8) -> Self {
        QuadbinError::InvalidResolution(format!(
            "{} should be between 0 and {}",
            resolution,
            crate::codec::MAX_RESOLUTION
        ))
    }
}
