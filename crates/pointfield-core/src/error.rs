//! Error types for pointfield-core
//!
//! Errors only surface from construction and configuration:
//! - Dataset assembly from rows or columns
//! - Configuration parsing and validation
//!
//! The interactive loop itself never fails; bad numeric input is clamped or
//! ignored there.

use pointfield_curves::CurveError;
use thiserror::Error;

/// Main error type for pointfield operations
#[derive(Error, Debug)]
pub enum PointfieldError {
    /// Dataset construction errors
    #[error("Invalid dataset: {0}")]
    Dataset(#[from] DatasetError),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Connection curve errors
    #[error("Curve generation failed: {0}")]
    Curve(#[from] CurveError),
}

/// Errors related to dataset construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// A row carries fewer than the two position channels
    #[error("Row {row} has {channels} channels, at least 2 (x, y) are required")]
    TooFewChannels { row: usize, channels: usize },

    /// Columns of different lengths
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Point ids would not fit the id type
    #[error("Dataset exceeds size limit: {size} points (max: {max})")]
    TooLarge { size: usize, max: usize },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML parsing failed
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("Failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// JSON parsing or serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value lies outside its permitted range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// A [min, max] pair with min > max
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),
}

/// Result type alias for pointfield operations
pub type PointfieldResult<T> = Result<T, PointfieldError>;

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Largest number of points addressable by a `u32` id
    pub const MAX_POINTS: usize = u32::MAX as usize;

    /// Validate dataset size
    pub fn validate_dataset_size(size: usize) -> DatasetResult<()> {
        if size > MAX_POINTS {
            return Err(DatasetError::TooLarge {
                size,
                max: MAX_POINTS,
            });
        }
        Ok(())
    }

    /// Validate that a value is finite and strictly positive
    pub fn validate_positive(field: &str, value: f64) -> ConfigResult<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "{} must be a positive finite number, got {}",
                field, value
            )));
        }
        Ok(())
    }

    /// Validate that a value is finite and not negative
    pub fn validate_non_negative(field: &str, value: f64) -> ConfigResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "{} must be a non-negative finite number, got {}",
                field, value
            )));
        }
        Ok(())
    }

    /// Validate a [min, max] pair
    pub fn validate_bounds(field: &str, bounds: [f64; 2]) -> ConfigResult<()> {
        if bounds[0].is_nan() || bounds[1].is_nan() || bounds[0] > bounds[1] {
            return Err(ConfigError::InvalidBounds(format!(
                "{} has min {} above max {}",
                field, bounds[0], bounds[1]
            )));
        }
        Ok(())
    }
}
