use thiserror::Error;

use crate::models::keypoint::JointId;

/// Errors raised while classifying a single frame.
///
/// None of these ever reach the caller of `ExerciseSession::classify`; the
/// session recovers locally and turns them into feedback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Keypoint {0} not found")]
    MissingJoint(JointId),

    #[error("Angle {angle} is not a finite number")]
    NonFiniteAngle { angle: &'static str },

    #[error("Angle {0} is not defined for this exercise")]
    UnknownAngle(&'static str),
}

/// Configuration rejected at session construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("required_stable_frames must be at least 1")]
    ZeroStableFrames,

    #[error("max_unstable_frames must be at least 1")]
    ZeroUnstableFrames,

    #[error("min_visibility must be within [0, 1], got {0}")]
    VisibilityOutOfRange(f64),

    #[error("{exercise}: {reason}")]
    InvalidBands {
        exercise: &'static str,
        reason: String,
    },
}
