use crate::config::LungeThresholds;
use crate::models::keypoint::JointId;

use super::{
    AngleRange, AngleSpec, BandCondition, BandKind, ExerciseDefinition, ExerciseKind, JointRef,
    PhaseBand, TransitionalMessages,
};

pub const RIGHT_KNEE_ANGLE: &str = "right_knee";
pub const LEFT_KNEE_ANGLE: &str = "left_knee";

pub const BEGIN_MESSAGE: &str = "Take a step to start the lunge.";
pub const RIGHT_FORWARD_MESSAGE: &str = "Good lunge position (right leg forward)!";
pub const LEFT_FORWARD_MESSAGE: &str = "Good lunge position (left leg forward)!";
pub const TOO_DEEP_MESSAGE: &str = "Lunge too deep or wrong position, come up a little.";

/// Lunge: both knees are tracked and either leg may lead.
///
/// The down position is asymmetric, one knee inside the front band and the
/// other inside the wider back band.
pub fn definition(thresholds: &LungeThresholds) -> ExerciseDefinition {
    let front = AngleRange::Between(thresholds.front_min as f32, thresholds.front_max as f32);
    let back = AngleRange::Between(thresholds.back_min as f32, thresholds.back_max as f32);

    ExerciseDefinition {
        kind: ExerciseKind::Lunge,
        required_joints: vec![
            JointId::LeftHip,
            JointId::RightHip,
            JointId::LeftKnee,
            JointId::RightKnee,
            JointId::LeftAnkle,
            JointId::RightAnkle,
        ],
        angles: vec![
            AngleSpec {
                name: RIGHT_KNEE_ANGLE,
                first: JointRef::Joint(JointId::RightHip),
                vertex: JointRef::Joint(JointId::RightKnee),
                last: JointRef::Joint(JointId::RightAnkle),
            },
            AngleSpec {
                name: LEFT_KNEE_ANGLE,
                first: JointRef::Joint(JointId::LeftHip),
                vertex: JointRef::Joint(JointId::LeftKnee),
                last: JointRef::Joint(JointId::LeftAnkle),
            },
        ],
        bands: vec![
            PhaseBand {
                kind: BandKind::Extended,
                conditions: both(AngleRange::Above(thresholds.extended_min as f32)),
                message: BEGIN_MESSAGE.to_string(),
            },
            PhaseBand {
                kind: BandKind::Target,
                conditions: vec![
                    condition(RIGHT_KNEE_ANGLE, front),
                    condition(LEFT_KNEE_ANGLE, back),
                ],
                message: RIGHT_FORWARD_MESSAGE.to_string(),
            },
            PhaseBand {
                kind: BandKind::Target,
                conditions: vec![
                    condition(LEFT_KNEE_ANGLE, front),
                    condition(RIGHT_KNEE_ANGLE, back),
                ],
                message: LEFT_FORWARD_MESSAGE.to_string(),
            },
            PhaseBand {
                kind: BandKind::OverFlexed,
                conditions: both(AngleRange::Below(thresholds.over_flexed_max as f32)),
                message: TOO_DEEP_MESSAGE.to_string(),
            },
        ],
        posture_checks: Vec::new(),
        transitional: TransitionalMessages {
            descend: "Lower into the lunge...".to_string(),
            complete: "Complete the lunge by rising or going lower correctly.".to_string(),
            get_ready: "Get ready for the lunge.".to_string(),
        },
    }
}

fn condition(angle: &'static str, range: AngleRange) -> BandCondition {
    BandCondition { angle, range }
}

fn both(range: AngleRange) -> Vec<BandCondition> {
    vec![condition(RIGHT_KNEE_ANGLE, range), condition(LEFT_KNEE_ANGLE, range)]
}
