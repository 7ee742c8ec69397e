pub mod feedback;
pub mod keypoint;

pub use feedback::{AngleReading, ExercisePhase, Feedback, FeedbackKind, FrameReport};
pub use keypoint::{FrameSkeleton, JointId, JointSample, Landmark};
