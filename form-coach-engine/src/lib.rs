//! Form Coach exercise-state engine
//!
//! Turns a per-frame stream of body keypoints into a repetition count and a
//! live posture verdict:
//! - `gate` debounces keypoint visibility into a reliable/unreliable state
//! - `exercise` holds the declarative squat and lunge threshold tables
//! - `session` runs the per-frame state machine and owns all session state
//! - `coach` derives target progress messages and cue events from frame reports

pub mod coach;
pub mod config;
pub mod error;
pub mod exercise;
pub mod gate;
pub mod geometry;
pub mod models;
pub mod session;

pub use coach::{progress_message, Cue, CueTracker};
pub use config::{EngineConfig, KeypointConfig, LungeThresholds, SquatThresholds, StabilityConfig};
pub use error::{ConfigError, EngineError};
pub use exercise::{ExerciseDefinition, ExerciseKind};
pub use gate::{GateVerdict, StabilityGate, StabilityState};
pub use models::feedback::{ExercisePhase, Feedback, FeedbackKind, FrameReport};
pub use models::keypoint::{FrameSkeleton, JointId, JointSample, Landmark};
pub use session::{step, ExerciseSession, SessionState};
