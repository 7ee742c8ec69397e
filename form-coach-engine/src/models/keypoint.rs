/// Keypoint models consumed by the exercise engine
///
/// This module provides the per-frame joint representation handed over by the
/// keypoint estimator, plus conversion from raw normalized landmarks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::EngineError;
use crate::geometry::Point;

/// Joints the engine reasons about.
///
/// Landmark indices follow the 33-point MediaPipe pose topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointId {
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl JointId {
    /// Get joint name
    pub fn name(&self) -> &'static str {
        match self {
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Index of this joint in the estimator's landmark list
    pub fn landmark_index(&self) -> usize {
        match self {
            Self::LeftShoulder => 11,
            Self::RightShoulder => 12,
            Self::LeftHip => 23,
            Self::RightHip => 24,
            Self::LeftKnee => 25,
            Self::RightKnee => 26,
            Self::LeftAnkle => 27,
            Self::RightAnkle => 28,
        }
    }

    /// Map a landmark index back to a joint; indices the engine ignores yield `None`
    pub fn from_landmark_index(index: usize) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|joint| joint.landmark_index() == index)
    }

    /// Get all joints
    pub fn all() -> [Self; 8] {
        [
            Self::LeftShoulder,
            Self::RightShoulder,
            Self::LeftHip,
            Self::RightHip,
            Self::LeftKnee,
            Self::RightKnee,
            Self::LeftAnkle,
            Self::RightAnkle,
        ]
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single joint observation in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    pub x: f32,
    pub y: f32,
    /// Relative depth, when the estimator provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    /// Detection confidence (0-1)
    pub visibility: f32,
}

impl JointSample {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility,
        }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    /// Planar position, depth is never used for angles
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Raw landmark as emitted by the pose estimator (normalized 0-1 coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: Option<f32>,
    pub visibility: f32,
}

impl Landmark {
    /// Denormalize coordinates to pixel space
    ///
    /// Angles are only meaningful in pixel space: a non-square image scales the
    /// two axes differently.
    pub fn denormalize(&self, width: f32, height: f32) -> JointSample {
        JointSample {
            x: self.x * width,
            y: self.y * height,
            z: self.z,
            visibility: self.visibility,
        }
    }
}

/// All joints observed in one frame. Empty when no body was detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameSkeleton {
    joints: BTreeMap<JointId, JointSample>,
}

impl FrameSkeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a skeleton from estimator landmarks.
    ///
    /// Landmarks outside the engine's joint set are skipped, and joints whose
    /// visibility is below `min_visibility` are treated as absent.
    pub fn from_landmarks(
        landmarks: &[Landmark],
        width: f32,
        height: f32,
        min_visibility: f32,
    ) -> Self {
        landmarks
            .iter()
            .filter(|lm| lm.visibility >= min_visibility)
            .filter_map(|lm| {
                JointId::from_landmark_index(lm.index)
                    .map(|joint| (joint, lm.denormalize(width, height)))
            })
            .collect()
    }

    pub fn insert(&mut self, joint: JointId, sample: JointSample) -> Option<JointSample> {
        self.joints.insert(joint, sample)
    }

    pub fn remove(&mut self, joint: JointId) -> Option<JointSample> {
        self.joints.remove(&joint)
    }

    /// Builder-style insert
    pub fn with_joint(mut self, joint: JointId, sample: JointSample) -> Self {
        self.joints.insert(joint, sample);
        self
    }

    pub fn get(&self, joint: JointId) -> Option<&JointSample> {
        self.joints.get(&joint)
    }

    /// Lookup used by classification, where absence is a contract violation
    pub fn require(&self, joint: JointId) -> Result<&JointSample, EngineError> {
        self.get(joint).ok_or(EngineError::MissingJoint(joint))
    }

    pub fn contains(&self, joint: JointId) -> bool {
        self.joints.contains_key(&joint)
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Required joints absent from this frame, in the order given
    pub fn missing(&self, required: &[JointId]) -> Vec<JointId> {
        required
            .iter()
            .copied()
            .filter(|joint| !self.contains(*joint))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JointId, &JointSample)> {
        self.joints.iter()
    }
}

impl FromIterator<(JointId, JointSample)> for FrameSkeleton {
    fn from_iter<I: IntoIterator<Item = (JointId, JointSample)>>(iter: I) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}
