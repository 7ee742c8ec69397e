use crate::config::SquatThresholds;
use crate::models::keypoint::JointId;

use super::{
    AngleRange, AngleSpec, BandCondition, BandKind, ExerciseDefinition, ExerciseKind, JointRef,
    PhaseBand, PostureCheck, Severity, TransitionalMessages,
};

pub const KNEE_ANGLE: &str = "knee";
pub const TORSO_ANGLE: &str = "torso";

pub const BEGIN_MESSAGE: &str = "Bend your knees to start the squat.";
pub const GOOD_POSITION_MESSAGE: &str = "Great squat position!";
pub const TOO_DEEP_MESSAGE: &str = "Squat too deep, come up a little without locking out.";
pub const BACK_CRITICAL_MESSAGE: &str = "Watch your back! Keep it straighter.";
pub const LEANING_FORWARD_MESSAGE: &str =
    "Keep your back straighter, don't bend your torso too far forward.";
pub const LEANING_BACK_MESSAGE: &str = "Lean your torso slightly forward, don't lean back.";

const HIPS: JointRef = JointRef::Midpoint(JointId::LeftHip, JointId::RightHip);
const SHOULDERS: JointRef = JointRef::Midpoint(JointId::LeftShoulder, JointId::RightShoulder);

/// Squat: knee flexion drives the phase, torso lean is the posture check.
///
/// Only the left leg is tracked; the camera is expected to see the user from
/// the front or the left side.
pub fn definition(thresholds: &SquatThresholds) -> ExerciseDefinition {
    ExerciseDefinition {
        kind: ExerciseKind::Squat,
        required_joints: vec![
            JointId::LeftShoulder,
            JointId::RightShoulder,
            JointId::LeftHip,
            JointId::RightHip,
            JointId::LeftKnee,
            JointId::LeftAnkle,
        ],
        angles: vec![
            AngleSpec {
                name: KNEE_ANGLE,
                first: HIPS,
                vertex: JointRef::Joint(JointId::LeftKnee),
                last: JointRef::Joint(JointId::LeftAnkle),
            },
            AngleSpec {
                name: TORSO_ANGLE,
                first: SHOULDERS,
                vertex: HIPS,
                last: JointRef::Joint(JointId::LeftKnee),
            },
        ],
        bands: vec![
            PhaseBand {
                kind: BandKind::Extended,
                conditions: vec![knee(AngleRange::Above(thresholds.extended_min as f32))],
                message: BEGIN_MESSAGE.to_string(),
            },
            PhaseBand {
                kind: BandKind::Target,
                conditions: vec![knee(AngleRange::Between(
                    thresholds.target_min as f32,
                    thresholds.target_max as f32,
                ))],
                message: GOOD_POSITION_MESSAGE.to_string(),
            },
            PhaseBand {
                kind: BandKind::OverFlexed,
                conditions: vec![knee(AngleRange::Below(thresholds.target_min as f32))],
                message: TOO_DEEP_MESSAGE.to_string(),
            },
        ],
        posture_checks: vec![
            PostureCheck {
                angle: TORSO_ANGLE,
                violation: AngleRange::Below(thresholds.torso_critical_min as f32),
                severity: Severity::Critical,
                message: BACK_CRITICAL_MESSAGE.to_string(),
            },
            PostureCheck {
                angle: TORSO_ANGLE,
                violation: AngleRange::Below(thresholds.torso_forward_min as f32),
                severity: Severity::Warning,
                message: LEANING_FORWARD_MESSAGE.to_string(),
            },
            PostureCheck {
                angle: TORSO_ANGLE,
                violation: AngleRange::Above(thresholds.torso_backward_max as f32),
                severity: Severity::Warning,
                message: LEANING_BACK_MESSAGE.to_string(),
            },
        ],
        transitional: TransitionalMessages {
            descend: "Lower yourself with control.".to_string(),
            complete: "Complete the movement by rising or going lower correctly.".to_string(),
            get_ready: "Get ready for the squat.".to_string(),
        },
    }
}

fn knee(range: AngleRange) -> BandCondition {
    BandCondition {
        angle: KNEE_ANGLE,
        range,
    }
}
