//! Coaching layer on top of frame reports
//!
//! Target progress messages and cue events for an audio layer. Playback itself
//! lives outside the engine; this module only decides when a cue is due.

use serde::{Deserialize, Serialize};

use crate::models::feedback::{FeedbackKind, FrameReport};

/// Discrete events an audio or haptic layer can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Tracking is stable and the user is invited to begin
    Start,
    Rep,
    FormError,
    TargetReached,
}

/// Motivational line for the current progress toward `target` reps.
///
/// A target of zero means no goal was set.
pub fn progress_message(reps: u32, target: u32) -> Option<String> {
    if target == 0 {
        return None;
    }

    let (wide_reps, wide_target) = (u64::from(reps), u64::from(target));
    let message = if reps >= target {
        format!("CONGRATULATIONS! Target of {} reps reached!", target)
    } else if target > 1 && reps == target - 1 {
        "This is the last one!".to_string()
    } else if target > 2 && reps == target - 2 {
        "Almost done, just two more!".to_string()
    } else if reps > 0 && wide_reps * 4 >= wide_target * 3 {
        format!("Keep it up, you're very close ({}/{})!", reps, target)
    } else if reps > 0 && wide_reps * 2 >= wide_target {
        format!("Great! More than halfway ({}/{})! Keep going!", reps, target)
    } else if reps > 0 {
        format!("Good! Keep going toward {} ({}/{}).", target, reps, target)
    } else {
        return None;
    };

    Some(message)
}

/// Tracks which cues already fired so each plays once per occasion
#[derive(Debug, Clone, Default)]
pub struct CueTracker {
    target: u32,
    last_rep: u32,
    start_played: bool,
    error_played: bool,
    target_played: bool,
}

impl CueTracker {
    pub fn new(target: u32) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Cues due for this frame, in playback order
    pub fn observe(&mut self, report: &FrameReport) -> Vec<Cue> {
        let mut cues = Vec::new();

        if report.is_stable {
            let invites_start =
                report.notice.is_some() || report.feedback.kind == FeedbackKind::Prompt;
            if invites_start && !self.start_played {
                cues.push(Cue::Start);
                self.start_played = true;
            }

            if report.feedback.kind == FeedbackKind::Violation {
                if !self.error_played {
                    cues.push(Cue::FormError);
                    self.error_played = true;
                }
            } else if report.feedback.is_correct {
                self.error_played = false;
            }
        } else {
            self.start_played = false;
            self.error_played = false;
        }

        if report.rep_count > self.last_rep {
            cues.push(Cue::Rep);
            self.error_played = false;
        }
        // follows resets as well as reps
        self.last_rep = report.rep_count;

        if self.target > 0 && report.rep_count >= self.target && !self.target_played {
            cues.push(Cue::TargetReached);
            self.target_played = true;
        }

        cues
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.target);
    }
}
