//! Visibility/stability gate
//!
//! Debounces per-frame joint availability into a "reliable" state. Entry into
//! the stable state needs N consecutive fully visible frames; any unreliable
//! frame drops stability at once and asks the exercise state machine to forget
//! its phase.

use serde::{Deserialize, Serialize};

use crate::config::StabilityConfig;
use crate::models::keypoint::{FrameSkeleton, JointId};

pub const NOT_VISIBLE_MESSAGE: &str =
    "You are not visible to the camera. Stand in front of it to begin.";
pub const PARTIALLY_VISIBLE_MESSAGE: &str =
    "Some body points are not visible. Make sure your whole body is in frame.";
pub const LOST_TOO_LONG_MESSAGE: &str =
    "Visibility lost for too long. Reposition and hold a steady position.";
pub const STABLE_NOTICE: &str = "Stable. You may begin the exercise!";

/// Debounce counters, written only by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StabilityState {
    pub consecutive_reliable_frames: u32,
    pub consecutive_unreliable_frames: u32,
    pub is_stable: bool,
}

/// Outcome of evaluating one frame
#[derive(Debug, Clone, PartialEq)]
pub struct GateVerdict {
    pub state: StabilityState,
    /// Whether classification may run on this frame
    pub ready: bool,
    /// Guidance for the user; empty when ready
    pub message: String,
    /// One-time notice on the frame stability is acquired
    pub notice: Option<String>,
    /// Stability was lost on this frame; the exercise phase must return to unset
    pub reset_phase: bool,
}

/// Stability gate shared by every exercise, parameterized by required joints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityGate {
    required_stable_frames: u32,
    max_unstable_frames: u32,
}

impl StabilityGate {
    pub fn new(required_stable_frames: u32, max_unstable_frames: u32) -> Self {
        Self {
            required_stable_frames: required_stable_frames.max(1),
            max_unstable_frames: max_unstable_frames.max(1),
        }
    }

    pub fn from_config(config: &StabilityConfig) -> Self {
        Self::new(config.required_stable_frames, config.max_unstable_frames)
    }

    pub fn required_stable_frames(&self) -> u32 {
        self.required_stable_frames
    }

    pub fn max_unstable_frames(&self) -> u32 {
        self.max_unstable_frames
    }

    /// Evaluate one frame against the prior stability state
    pub fn evaluate(
        &self,
        prior: StabilityState,
        skeleton: &FrameSkeleton,
        required: &[JointId],
    ) -> GateVerdict {
        match visibility_problem(skeleton, required) {
            Some(message) => self.unreliable(prior, message),
            None => self.reliable(prior),
        }
    }

    /// Drop stability after classification found the skeleton inconsistent with
    /// what the gate accepted. Entry has to be debounced again.
    pub fn invalidate(&self, prior: StabilityState) -> StabilityState {
        if prior.is_stable {
            tracing::warn!("Stability invalidated after a keypoint lookup failure");
        }
        StabilityState {
            consecutive_reliable_frames: 0,
            consecutive_unreliable_frames: prior.consecutive_unreliable_frames,
            is_stable: false,
        }
    }

    fn reliable(&self, prior: StabilityState) -> GateVerdict {
        let reliable_frames = prior.consecutive_reliable_frames.saturating_add(1);

        if reliable_frames >= self.required_stable_frames {
            let just_stabilized = !prior.is_stable;
            if just_stabilized {
                tracing::info!(frames = reliable_frames, "Keypoints stable");
            }

            GateVerdict {
                state: StabilityState {
                    consecutive_reliable_frames: reliable_frames,
                    consecutive_unreliable_frames: 0,
                    is_stable: true,
                },
                ready: true,
                message: String::new(),
                notice: just_stabilized.then(|| STABLE_NOTICE.to_string()),
                reset_phase: false,
            }
        } else {
            GateVerdict {
                state: StabilityState {
                    consecutive_reliable_frames: reliable_frames,
                    consecutive_unreliable_frames: 0,
                    is_stable: false,
                },
                ready: false,
                message: format!(
                    "Hold a steady position ({}/{})...",
                    reliable_frames, self.required_stable_frames
                ),
                notice: None,
                reset_phase: false,
            }
        }
    }

    fn unreliable(&self, prior: StabilityState, visibility_message: &str) -> GateVerdict {
        let unreliable_frames = prior.consecutive_unreliable_frames.saturating_add(1);

        if prior.is_stable {
            tracing::warn!(
                unreliable_frames,
                "Stability lost, resetting exercise phase"
            );
        }

        let message = if unreliable_frames >= self.max_unstable_frames {
            LOST_TOO_LONG_MESSAGE
        } else {
            visibility_message
        };

        GateVerdict {
            state: StabilityState {
                consecutive_reliable_frames: 0,
                consecutive_unreliable_frames: unreliable_frames,
                is_stable: false,
            },
            ready: false,
            message: message.to_string(),
            notice: None,
            reset_phase: prior.is_stable,
        }
    }
}

impl Default for StabilityGate {
    fn default() -> Self {
        Self::from_config(&StabilityConfig::default())
    }
}

fn visibility_problem(skeleton: &FrameSkeleton, required: &[JointId]) -> Option<&'static str> {
    if skeleton.is_empty() {
        return Some(NOT_VISIBLE_MESSAGE);
    }

    let missing = skeleton.missing(required);
    if missing.is_empty() {
        None
    } else if missing.len() == required.len() {
        Some(NOT_VISIBLE_MESSAGE)
    } else {
        tracing::trace!(?missing, "Required joints missing");
        Some(PARTIALLY_VISIBLE_MESSAGE)
    }
}
