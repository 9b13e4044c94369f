//! Per-frame pose landmarks as produced by the external landmark source.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::Joint;

/// Default visibility below which a landmark is treated as missing.
pub const DEFAULT_VISIBILITY_FLOOR: f32 = 0.5;

/// A 2D point in pixel space (y grows downward).
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub visibility: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// True when the landmark is finite and at least as visible as `floor`.
    pub fn is_reliable(&self, floor: f32) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.visibility >= floor
    }
}

/// All landmarks for one decoded frame.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct FrameLandmarks {
    /// Absolute index into the source video.
    pub frame_number: u32,
    pub joints: FxHashMap<Joint, Landmark>,
    /// Frame-difference motion energy computed by the decoder, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion_energy: Option<f32>,
}

impl FrameLandmarks {
    pub fn new(frame_number: u32) -> Self {
        Self {
            frame_number,
            joints: FxHashMap::default(),
            motion_energy: None,
        }
    }

    pub fn with_joint(mut self, joint: Joint, landmark: Landmark) -> Self {
        self.joints.insert(joint, landmark);
        self
    }

    pub fn with_motion_energy(mut self, energy: f32) -> Self {
        self.motion_energy = Some(energy);
        self
    }

    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.joints.get(&joint)
    }

    /// Point of `joint` if present and reliable, `None` otherwise.
    pub fn reliable(&self, joint: Joint, floor: f32) -> Option<Point> {
        self.joints
            .get(&joint)
            .filter(|lm| lm.is_reliable(floor))
            .map(Landmark::point)
    }
}
