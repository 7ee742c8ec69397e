use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use form_coach_engine::{ExerciseKind, FeedbackKind, FrameReport};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Totals for one replayed session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub exercise: ExerciseKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub frames: u64,
    pub stable_frames: u64,
    pub correct_frames: u64,
    pub error_frames: u64,
    pub reps: u32,
    /// Zero when no target was set
    pub target: u32,
    pub target_reached: bool,
    /// Posture violations by message, counted once per occurrence
    pub violations: BTreeMap<String, u32>,

    #[serde(skip)]
    active_violation: Option<String>,
}

impl SessionSummary {
    pub fn new(exercise: ExerciseKind, target: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            exercise,
            started_at: Utc::now(),
            finished_at: None,
            frames: 0,
            stable_frames: 0,
            correct_frames: 0,
            error_frames: 0,
            reps: 0,
            target,
            target_reached: false,
            violations: BTreeMap::new(),
            active_violation: None,
        }
    }

    pub fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        if report.is_stable {
            self.stable_frames += 1;
        }
        if report.is_correct() {
            self.correct_frames += 1;
        }

        match report.feedback.kind {
            FeedbackKind::Violation => {
                let message = report.message();
                if self.active_violation.as_deref() != Some(message) {
                    *self.violations.entry(message.to_string()).or_insert(0) += 1;
                    self.active_violation = Some(message.to_string());
                }
            }
            FeedbackKind::Error => {
                self.error_frames += 1;
                self.active_violation = None;
            }
            _ => self.active_violation = None,
        }

        self.reps = report.rep_count;
        if self.target > 0 && self.reps >= self.target {
            self.target_reached = true;
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Share of stable frames that were classified correct
    pub fn accuracy(&self) -> Option<f64> {
        (self.stable_frames > 0).then(|| self.correct_frames as f64 / self.stable_frames as f64)
    }
}
