// Shared skeleton builders for the engine integration tests
#![allow(dead_code)]

use form_coach_engine::{
    EngineConfig, ExerciseKind, ExerciseSession, FrameSkeleton, JointId, JointSample,
};

const SEGMENT: f32 = 100.0;
const VISIBLE: f32 = 0.9;

/// Rotate `v` by `degrees`
fn rotate(v: (f32, f32), degrees: f32) -> (f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (v.0 * cos - v.1 * sin, v.0 * sin + v.1 * cos)
}

fn sample(p: (f32, f32)) -> JointSample {
    JointSample::new(p.0, p.1, VISIBLE)
}

/// Leg placed so the knee angle is exactly `knee_deg`; returns (hip, knee, ankle)
fn leg(knee: (f32, f32), knee_deg: f32) -> ((f32, f32), (f32, f32), (f32, f32)) {
    let ankle = (knee.0, knee.1 + SEGMENT);
    let towards_hip = rotate((0.0, 1.0), knee_deg);
    let hip = (knee.0 + SEGMENT * towards_hip.0, knee.1 + SEGMENT * towards_hip.1);
    (hip, knee, ankle)
}

/// Squat frame with the given knee and torso angles
pub fn squat_frame(knee_deg: f32, torso_deg: f32) -> FrameSkeleton {
    let (hip, knee, ankle) = leg((320.0, 300.0), knee_deg);
    let towards_knee = ((knee.0 - hip.0) / SEGMENT, (knee.1 - hip.1) / SEGMENT);
    let towards_shoulder = rotate(towards_knee, torso_deg);
    let shoulder = (
        hip.0 + SEGMENT * towards_shoulder.0,
        hip.1 + SEGMENT * towards_shoulder.1,
    );

    FrameSkeleton::new()
        .with_joint(JointId::LeftShoulder, sample((shoulder.0 - 10.0, shoulder.1)))
        .with_joint(JointId::RightShoulder, sample((shoulder.0 + 10.0, shoulder.1)))
        .with_joint(JointId::LeftHip, sample((hip.0 - 10.0, hip.1)))
        .with_joint(JointId::RightHip, sample((hip.0 + 10.0, hip.1)))
        .with_joint(JointId::LeftKnee, sample(knee))
        .with_joint(JointId::LeftAnkle, sample(ankle))
}

/// Squat frame with a neutral torso
pub fn squat(knee_deg: f32) -> FrameSkeleton {
    squat_frame(knee_deg, 90.0)
}

/// Lunge frame with independent knee angles
pub fn lunge_frame(right_knee_deg: f32, left_knee_deg: f32) -> FrameSkeleton {
    let (r_hip, r_knee, r_ankle) = leg((360.0, 300.0), right_knee_deg);
    let (l_hip, l_knee, l_ankle) = leg((280.0, 300.0), left_knee_deg);

    FrameSkeleton::new()
        .with_joint(JointId::RightHip, sample(r_hip))
        .with_joint(JointId::RightKnee, sample(r_knee))
        .with_joint(JointId::RightAnkle, sample(r_ankle))
        .with_joint(JointId::LeftHip, sample(l_hip))
        .with_joint(JointId::LeftKnee, sample(l_knee))
        .with_joint(JointId::LeftAnkle, sample(l_ankle))
}

pub fn config(required_stable_frames: u32, max_unstable_frames: u32) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.stability.required_stable_frames = required_stable_frames;
    config.stability.max_unstable_frames = max_unstable_frames;
    config
}

pub fn session(kind: ExerciseKind, config: &EngineConfig) -> ExerciseSession {
    ExerciseSession::new(kind, config).expect("valid test config")
}

/// Feed `frame` until the gate reports stability
pub fn stabilize(session: &mut ExerciseSession, frame: &FrameSkeleton) {
    for _ in 0..1_000 {
        session.process(frame);
        if session.is_stable() {
            return;
        }
    }
    panic!("session never became stable");
}
