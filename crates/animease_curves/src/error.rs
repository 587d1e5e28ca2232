// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve editing errors.

use thiserror::Error;

/// Errors raised by curve operations on invalid input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// A time argument was NaN or infinite
    #[error("Time must be finite, got {0}")]
    NonFiniteTime(f32),

    /// A point index past the end of the curve
    #[error("Keyframe index {index} out of range for curve with {len} points")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of points on the curve
        len: usize,
    },
}

/// Result type for curve operations
pub type Result<T> = std::result::Result<T, CurveError>;

/// Reject NaN and infinite times
pub(crate) fn ensure_finite(time: f32) -> Result<f32> {
    if time.is_finite() {
        Ok(time)
    } else {
        Err(CurveError::NonFiniteTime(time))
    }
}
