//! Error types for curve editing and persistence

use serde::{Deserialize, Serialize};

use crate::keyframe::Frame;

/// Errors surfaced by [`Curve`](crate::Curve) operations.
///
/// Only caller-contract violations and unreadable documents are errors;
/// degenerate edits (handle percents outside `[0,1]`, frames that would cross
/// a neighbour) are clamped instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CurveError {
    /// Keyframe index outside `[0, len)`
    #[error("Keyframe index {index} out of range (curve has {len} keys)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Bulk frame assignment with the wrong number of frames
    #[error("Expected {expected} frames, got {actual}")]
    FrameCountMismatch { expected: usize, actual: usize },

    /// Bulk frame assignment that would place two keys on one frame
    #[error("Frame {frame} assigned to more than one keyframe")]
    DuplicateFrame { frame: Frame },

    /// Persisted curve document could not be read or written
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl CurveError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. }
            | Self::FrameCountMismatch { .. }
            | Self::DuplicateFrame { .. } => "caller",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for CurveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
