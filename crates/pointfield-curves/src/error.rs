//! Error types for curve generation

use thiserror::Error;

/// Errors produced while generating connection curves
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// The request carried no points at all
    #[error("No points provided")]
    EmptyInput,

    /// The worker task has shut down and can no longer accept requests
    #[error("Curve worker is no longer running")]
    WorkerClosed,

    /// The blocking computation panicked or was cancelled
    #[error("Curve computation failed: {0}")]
    WorkerFailed(String),
}

/// Result type alias for curve operations
pub type CurveResult<T> = Result<T, CurveError>;
