//! Declarative exercise tables
//!
//! An exercise is data: the joints it needs, the angles it measures, an
//! ordered list of phase bands and an ordered list of posture checks. The
//! state machine in `session` interprets these tables; nothing here mutates
//! state.

pub mod lunge;
pub mod squat;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::geometry::{joint_angle, midpoint, Point};
use crate::models::feedback::AngleReading;
use crate::models::keypoint::{FrameSkeleton, JointId};

/// Exercises the engine can track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Squat,
    Lunge,
}

impl ExerciseKind {
    pub fn all() -> [Self; 2] {
        [Self::Squat, Self::Lunge]
    }

    /// Build this exercise's threshold tables from configuration
    pub fn definition(&self, config: &EngineConfig) -> ExerciseDefinition {
        match self {
            Self::Squat => squat::definition(&config.squat),
            Self::Lunge => lunge::definition(&config.lunge),
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseKind::Squat => write!(f, "squat"),
            ExerciseKind::Lunge => write!(f, "lunge"),
        }
    }
}

impl FromStr for ExerciseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squat" => Ok(Self::Squat),
            "lunge" => Ok(Self::Lunge),
            other => Err(format!("Unknown exercise: {}", other)),
        }
    }
}

/// A position fed into an angle: a joint, or the midpoint of two joints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointRef {
    Joint(JointId),
    Midpoint(JointId, JointId),
}

impl JointRef {
    fn resolve(&self, skeleton: &FrameSkeleton) -> Result<Point, EngineError> {
        match *self {
            JointRef::Joint(joint) => Ok(skeleton.require(joint)?.point()),
            JointRef::Midpoint(a, b) => Ok(midpoint(
                skeleton.require(a)?.point(),
                skeleton.require(b)?.point(),
            )),
        }
    }
}

/// Named angle measured at `vertex` between `first` and `last`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleSpec {
    pub name: &'static str,
    pub first: JointRef,
    pub vertex: JointRef,
    pub last: JointRef,
}

impl AngleSpec {
    pub fn measure(&self, skeleton: &FrameSkeleton) -> Result<f32, EngineError> {
        let degrees = joint_angle(
            self.first.resolve(skeleton)?,
            self.vertex.resolve(skeleton)?,
            self.last.resolve(skeleton)?,
        );

        if degrees.is_finite() {
            Ok(degrees)
        } else {
            Err(EngineError::NonFiniteAngle { angle: self.name })
        }
    }
}

/// Contiguous range of angle values, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleRange {
    /// Strictly greater than the bound
    Above(f32),
    /// Strictly less than the bound
    Below(f32),
    /// Inclusive on both ends
    Between(f32, f32),
}

impl AngleRange {
    pub fn contains(&self, degrees: f32) -> bool {
        match *self {
            AngleRange::Above(min) => degrees > min,
            AngleRange::Below(max) => degrees < max,
            AngleRange::Between(min, max) => (min..=max).contains(&degrees),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    /// The "up" configuration
    Extended,
    /// The valid "down" configuration
    Target,
    /// Below the target band; still "down" but incorrect
    OverFlexed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandCondition {
    pub angle: &'static str,
    pub range: AngleRange,
}

/// One row of the band table. Every condition must hold for the band to match.
///
/// `message` is the begin prompt for extended bands, the praise for target
/// bands and the correction for over-flexed bands.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseBand {
    pub kind: BandKind,
    pub conditions: Vec<BandCondition>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Only checked inside the target band
    Warning,
    /// Checked whenever the phase is down
    Critical,
}

/// Secondary check; fires when the angle falls inside `violation`
#[derive(Debug, Clone, PartialEq)]
pub struct PostureCheck {
    pub angle: &'static str,
    pub violation: AngleRange,
    pub severity: Severity,
    pub message: String,
}

/// Messages for frames that match no band
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionalMessages {
    /// Coming from up
    pub descend: String,
    /// Coming from down
    pub complete: String,
    /// No phase yet
    pub get_ready: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDefinition {
    pub kind: ExerciseKind,
    pub required_joints: Vec<JointId>,
    pub angles: Vec<AngleSpec>,
    /// Evaluated in order, first match wins
    pub bands: Vec<PhaseBand>,
    /// Evaluated in priority order, first violation wins
    pub posture_checks: Vec<PostureCheck>,
    pub transitional: TransitionalMessages,
}

impl ExerciseDefinition {
    /// Measure every angle of interest on a gated frame
    pub fn measure(&self, skeleton: &FrameSkeleton) -> Result<Vec<AngleReading>, EngineError> {
        self.angles
            .iter()
            .map(|spec| {
                spec.measure(skeleton).map(|degrees| AngleReading {
                    name: spec.name,
                    degrees,
                })
            })
            .collect()
    }

    /// First band whose conditions all hold, or `None` for the transitional zone
    pub fn match_band(&self, readings: &[AngleReading]) -> Result<Option<&PhaseBand>, EngineError> {
        for band in &self.bands {
            let mut matched = true;
            for condition in &band.conditions {
                if !condition.range.contains(reading(readings, condition.angle)?) {
                    matched = false;
                    break;
                }
            }
            if matched {
                return Ok(Some(band));
            }
        }
        Ok(None)
    }

    /// First failing posture check at or above `min_severity`
    pub fn posture_violation(
        &self,
        readings: &[AngleReading],
        min_severity: Severity,
    ) -> Result<Option<&PostureCheck>, EngineError> {
        for check in self.posture_checks.iter().filter(|c| c.severity >= min_severity) {
            if check.violation.contains(reading(readings, check.angle)?) {
                return Ok(Some(check));
            }
        }
        Ok(None)
    }
}

fn reading(readings: &[AngleReading], name: &'static str) -> Result<f32, EngineError> {
    readings
        .iter()
        .find(|r| r.name == name)
        .map(|r| r.degrees)
        .ok_or(EngineError::UnknownAngle(name))
}
