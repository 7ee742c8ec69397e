use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse exercise state, tracked independently of frame-level correctness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExercisePhase {
    #[default]
    Unset,
    Up,
    Down,
}

impl fmt::Display for ExercisePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExercisePhase::Unset => write!(f, "unset"),
            ExercisePhase::Up => write!(f, "up"),
            ExercisePhase::Down => write!(f, "down"),
        }
    }
}

/// What produced a frame's message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// Visibility or stability guidance from the gate
    NotReady,
    /// Extended position without a completed rep
    Prompt,
    RepCompleted,
    /// Valid bottom position with every posture check passing
    Good,
    /// Posture check failure or over-flexion
    Violation,
    /// Angle between bands
    Transitional,
    /// Recovered classification failure
    Error,
    Reset,
}

/// Per-frame verdict handed to the feedback sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub is_correct: bool,
    pub message: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn correct(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            is_correct: true,
            message: message.into(),
            kind,
        }
    }

    pub fn incorrect(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            message: message.into(),
            kind,
        }
    }
}

/// Named joint angle measured on a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleReading {
    pub name: &'static str,
    pub degrees: f32,
}

/// Everything the engine knows about one classified frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub feedback: Feedback,
    pub phase: ExercisePhase,
    pub rep_count: u32,
    pub is_stable: bool,
    /// True only on the frame whose Down→Up transition incremented the counter
    pub rep_completed: bool,
    /// One-time gate notice, set on the frame stability is acquired
    pub notice: Option<String>,
    pub angles: Vec<AngleReading>,
}

impl FrameReport {
    pub fn is_correct(&self) -> bool {
        self.feedback.is_correct
    }

    pub fn message(&self) -> &str {
        &self.feedback.message
    }

    pub fn angle(&self, name: &str) -> Option<f32> {
        self.angles
            .iter()
            .find(|reading| reading.name == name)
            .map(|reading| reading.degrees)
    }
}
