//! Error types for acuity-chart operations.

use thiserror::Error;

/// Result type alias for acuity-chart operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while calibrating or configuring a chart.
///
/// Navigation never fails; out-of-range moves are no-ops.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Calibration inputs are not usable yet (non-positive or non-numeric).
    #[error("Calibration not ready: {reason}")]
    CalibrationNotReady {
        /// Which input is missing or invalid.
        reason: String,
    },

    /// No acuity level carries the requested label.
    #[error("Unknown acuity level: {0}")]
    UnknownLevel(String),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
