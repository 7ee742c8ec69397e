//! Per-frame exercise state machine
//!
//! `step` is a pure function from the prior session state and one frame to the
//! next state and a frame report. `ExerciseSession` is the single owning handle
//! a display loop holds for one exercise session.
//!
//! Phase transitions:
//! - `Unset -> Up` on the first extended frame
//! - `Up -> Down` on the first target or over-flexed frame
//! - `Down -> Up` on an extended frame, the only transition that counts a rep
//! - `* -> Unset` when the gate reports stability loss or classification fails

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::exercise::{BandKind, ExerciseDefinition, ExerciseKind, Severity};
use crate::gate::{StabilityGate, StabilityState};
use crate::models::feedback::{AngleReading, ExercisePhase, Feedback, FeedbackKind, FrameReport};
use crate::models::keypoint::{FrameSkeleton, Landmark};

pub const READY_MESSAGE: &str = "Ready to start!";
pub const RESET_MESSAGE: &str = "Counter reset. Get ready.";

/// Everything that persists between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub stability: StabilityState,
    pub phase: ExercisePhase,
    pub rep_count: u32,
}

struct Classification {
    phase: ExercisePhase,
    rep_completed: bool,
    feedback: Feedback,
}

/// Advance the session by one frame
pub fn step(
    definition: &ExerciseDefinition,
    gate: &StabilityGate,
    prior: SessionState,
    skeleton: &FrameSkeleton,
) -> (SessionState, FrameReport) {
    let verdict = gate.evaluate(prior.stability, skeleton, &definition.required_joints);

    let phase = if verdict.reset_phase {
        ExercisePhase::Unset
    } else {
        prior.phase
    };
    let gated = SessionState {
        stability: verdict.state,
        phase,
        rep_count: prior.rep_count,
    };

    if !verdict.ready {
        return (
            gated,
            report(
                gated,
                Feedback::incorrect(FeedbackKind::NotReady, verdict.message),
                false,
                None,
                Vec::new(),
            ),
        );
    }

    let angles = match definition.measure(skeleton) {
        Ok(angles) => angles,
        Err(err) => return recover(definition, gate, gated, err),
    };

    match classify(definition, gated, &angles) {
        Ok(classification) => {
            if classification.phase != gated.phase {
                tracing::debug!(
                    exercise = %definition.kind,
                    from = %gated.phase,
                    to = %classification.phase,
                    "Phase transition"
                );
            }

            let next = SessionState {
                stability: gated.stability,
                phase: classification.phase,
                rep_count: gated.rep_count + u32::from(classification.rep_completed),
            };
            if classification.rep_completed {
                tracing::info!(exercise = %definition.kind, reps = next.rep_count, "Rep completed");
            }

            (
                next,
                report(
                    next,
                    classification.feedback,
                    classification.rep_completed,
                    verdict.notice,
                    angles,
                ),
            )
        }
        Err(err) => recover(definition, gate, gated, err),
    }
}

fn classify(
    definition: &ExerciseDefinition,
    state: SessionState,
    angles: &[AngleReading],
) -> Result<Classification, EngineError> {
    let band = definition.match_band(angles)?;

    let classification = match band {
        Some(band) if band.kind == BandKind::Extended => {
            let rep_completed = state.phase == ExercisePhase::Down;
            let feedback = if rep_completed {
                Feedback::correct(
                    FeedbackKind::RepCompleted,
                    format!("Great! Rep {} completed.", state.rep_count + 1),
                )
            } else {
                Feedback::correct(FeedbackKind::Prompt, band.message.clone())
            };

            Classification {
                phase: ExercisePhase::Up,
                rep_completed,
                feedback,
            }
        }
        Some(band) if band.kind == BandKind::Target => {
            let feedback = match definition.posture_violation(angles, Severity::Warning)? {
                Some(check) => Feedback::incorrect(FeedbackKind::Violation, check.message.clone()),
                None => Feedback::correct(FeedbackKind::Good, band.message.clone()),
            };

            Classification {
                phase: ExercisePhase::Down,
                rep_completed: false,
                feedback,
            }
        }
        Some(band) => {
            let feedback = critical_override(definition, angles)?.unwrap_or_else(|| {
                Feedback::incorrect(FeedbackKind::Violation, band.message.clone())
            });

            Classification {
                phase: ExercisePhase::Down,
                rep_completed: false,
                feedback,
            }
        }
        None => {
            let messages = &definition.transitional;
            let message = match state.phase {
                ExercisePhase::Up => &messages.descend,
                ExercisePhase::Down => &messages.complete,
                ExercisePhase::Unset => &messages.get_ready,
            };

            let override_feedback = if state.phase == ExercisePhase::Down {
                critical_override(definition, angles)?
            } else {
                None
            };

            Classification {
                phase: state.phase,
                rep_completed: false,
                feedback: override_feedback.unwrap_or_else(|| {
                    Feedback::incorrect(FeedbackKind::Transitional, message.clone())
                }),
            }
        }
    };

    Ok(classification)
}

/// Critical posture failures take priority over any band message while down
fn critical_override(
    definition: &ExerciseDefinition,
    angles: &[AngleReading],
) -> Result<Option<Feedback>, EngineError> {
    Ok(definition
        .posture_violation(angles, Severity::Critical)?
        .map(|check| Feedback::incorrect(FeedbackKind::Violation, check.message.clone())))
}

fn recover(
    definition: &ExerciseDefinition,
    gate: &StabilityGate,
    state: SessionState,
    err: EngineError,
) -> (SessionState, FrameReport) {
    tracing::warn!(
        exercise = %definition.kind,
        error = %err,
        "Frame classification failed, phase reset"
    );

    let (stability, message) = match &err {
        EngineError::MissingJoint(joint) => (
            gate.invalidate(state.stability),
            format!("Keypoint {} not found. Reposition.", joint),
        ),
        other => (
            state.stability,
            format!("Error while analysing the {}: {}. Reposition.", definition.kind, other),
        ),
    };

    let next = SessionState {
        stability,
        phase: ExercisePhase::Unset,
        rep_count: state.rep_count,
    };
    (
        next,
        report(next, Feedback::incorrect(FeedbackKind::Error, message), false, None, Vec::new()),
    )
}

fn report(
    state: SessionState,
    feedback: Feedback,
    rep_completed: bool,
    notice: Option<String>,
    angles: Vec<AngleReading>,
) -> FrameReport {
    FrameReport {
        feedback,
        phase: state.phase,
        rep_count: state.rep_count,
        is_stable: state.stability.is_stable,
        rep_completed,
        notice,
        angles,
    }
}

/// Owning handle for one exercise session.
///
/// Frames must be fed in arrival order; `&mut self` keeps a session on a
/// single caller.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    definition: ExerciseDefinition,
    gate: StabilityGate,
    min_visibility: f32,
    state: SessionState,
    feedback: Feedback,
}

impl ExerciseSession {
    /// Create a session for one of the built-in exercises
    pub fn new(kind: ExerciseKind, config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        tracing::debug!(exercise = %kind, "Creating exercise session");

        Ok(Self::with_definition(
            kind.definition(config),
            StabilityGate::from_config(&config.stability),
            config.keypoints.min_visibility as f32,
        ))
    }

    /// Create a session from hand-built tables
    pub fn with_definition(
        definition: ExerciseDefinition,
        gate: StabilityGate,
        min_visibility: f32,
    ) -> Self {
        Self {
            definition,
            gate,
            min_visibility,
            state: SessionState::default(),
            feedback: Feedback::incorrect(FeedbackKind::NotReady, READY_MESSAGE),
        }
    }

    /// Classify one frame and return `(is_correct, message)` as feedback
    pub fn classify(&mut self, skeleton: &FrameSkeleton) -> Feedback {
        self.process(skeleton).feedback
    }

    /// Classify one frame and return the full report
    pub fn process(&mut self, skeleton: &FrameSkeleton) -> FrameReport {
        let (state, report) = step(&self.definition, &self.gate, self.state, skeleton);
        self.state = state;
        self.feedback = report.feedback.clone();
        report
    }

    /// Classify raw estimator landmarks (normalized coordinates)
    pub fn process_landmarks(
        &mut self,
        landmarks: &[Landmark],
        width: f32,
        height: f32,
    ) -> FrameReport {
        let skeleton = FrameSkeleton::from_landmarks(landmarks, width, height, self.min_visibility);
        self.process(&skeleton)
    }

    /// Zero the counter, forget the phase and require stability again
    pub fn reset(&mut self) {
        if self.state != SessionState::default() {
            tracing::info!(
                exercise = %self.definition.kind,
                reps = self.state.rep_count,
                "Session reset"
            );
        }
        self.state = SessionState::default();
        self.feedback = Feedback::correct(FeedbackKind::Reset, RESET_MESSAGE);
    }

    pub fn rep_count(&self) -> u32 {
        self.state.rep_count
    }

    pub fn phase(&self) -> ExercisePhase {
        self.state.phase
    }

    pub fn is_stable(&self) -> bool {
        self.state.stability.is_stable
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Feedback from the latest frame (or the reset/initial message)
    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn kind(&self) -> ExerciseKind {
        self.definition.kind
    }

    pub fn definition(&self) -> &ExerciseDefinition {
        &self.definition
    }
}
