//! Planar joint angle calculation
//!
//! Angles are measured from the difference of the two rays' `atan2`
//! directions and folded into `[0, 180]` degrees.

use serde::{Deserialize, Serialize};

/// 2-D position in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Midpoint of two positions (e.g. shoulder centre)
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Unsigned angle at `vertex` between ray `vertex→a` and ray `vertex→b`, in degrees.
///
/// Returns a value in `[0, 180]`. A coincident point yields a direction of 0
/// from `atan2(0, 0)`, so degenerate input produces a finite angle rather than
/// a panic. Non-finite coordinates propagate as NaN.
pub fn joint_angle(a: Point, vertex: Point, b: Point) -> f32 {
    let radians = (b.y - vertex.y).atan2(b.x - vertex.x) - (a.y - vertex.y).atan2(a.x - vertex.x);
    let angle = radians.to_degrees().abs();

    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}
