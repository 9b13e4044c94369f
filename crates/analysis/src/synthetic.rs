//! Synthetic side-view jump shots for tests, benches, and demos.
//!
//! The clip runs at 30 fps: the shooter stands still for a second, dips to
//! `knee_depth` over half a second, then jumps. The shooting arm holds a
//! fixed pose given by `elbow_angle` and `wrist_snap` throughout, so every
//! phase sees the same arm metrics.

use serde::{Deserialize, Serialize};
use swish_core::{FrameLandmarks, Joint, Landmark, Point};

pub const SYNTHETIC_FPS: f32 = 30.0;

/// Frames from the start of the dip to the deepest point.
const DIP_FRAMES: u32 = 15;
/// Frames from the deepest point back to full extension.
const RISE_FRAMES: u32 = 7;
/// Vertical lift per frame of the jump, px.
const JUMP_LIFT: [f32; 7] = [0.0, 4.0, 12.0, 26.0, 42.0, 54.0, 60.0];

const STANDING_KNEE: f32 = 175.0;
const TORSO_PX: f32 = 120.0;
const UPPER_ARM_PX: f32 = 60.0;
const FOREARM_PX: f32 = 55.0;
const VISIBILITY: f32 = 0.95;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotProfile {
    /// Number of the first generated frame.
    pub first_frame: u32,
    /// Still frames before the dip begins.
    pub lead_in: u32,
    /// Frames after the jump completes.
    pub tail: u32,
    pub knee_depth: f32,
    pub elbow_angle: f32,
    pub wrist_snap: f32,
    /// Guide wrist height above the shooting wrist, percent of torso.
    pub guide_hand_height: f32,
    pub guide_thumb_angle: f32,
}

impl Default for ShotProfile {
    fn default() -> Self {
        Self::clean()
    }
}

impl ShotProfile {
    pub fn clean() -> Self {
        Self {
            first_frame: 0,
            lead_in: 30,
            tail: 23,
            knee_depth: 120.0,
            elbow_angle: 170.0,
            wrist_snap: 75.0,
            guide_hand_height: -40.0,
            guide_thumb_angle: 30.0,
        }
    }

    pub fn flared_elbow() -> Self {
        Self {
            elbow_angle: 120.0,
            ..Self::clean()
        }
    }

    pub fn shallow_knees() -> Self {
        Self {
            knee_depth: 150.0,
            ..Self::clean()
        }
    }

    pub fn deep_knees() -> Self {
        Self {
            knee_depth: 95.0,
            ..Self::clean()
        }
    }

    pub fn stiff_wrist() -> Self {
        Self {
            wrist_snap: 35.0,
            ..Self::clean()
        }
    }

    pub fn guide_hand_on_top() -> Self {
        Self {
            guide_hand_height: 30.0,
            ..Self::clean()
        }
    }

    pub fn thumb_flick() -> Self {
        Self {
            guide_thumb_angle: 80.0,
            ..Self::clean()
        }
    }

    pub fn total_frames(&self) -> u32 {
        self.lead_in + DIP_FRAMES + RISE_FRAMES + self.tail
    }

    /// Frame number of the deepest knee bend.
    pub fn deepest_frame(&self) -> u32 {
        self.first_frame + self.lead_in + DIP_FRAMES - 1
    }

    /// Frame number of the fastest upward wrist movement.
    pub fn release_frame(&self) -> u32 {
        self.deepest_frame() + 5
    }

    /// Knee angle at clip offset `i`.
    fn knee_at(&self, i: u32) -> f32 {
        let dip_start = self.lead_in;
        let bottom = dip_start + DIP_FRAMES - 1;
        let range = STANDING_KNEE - self.knee_depth;
        if i < dip_start {
            STANDING_KNEE
        } else if i <= bottom {
            STANDING_KNEE - range * (i + 1 - dip_start) as f32 / DIP_FRAMES as f32
        } else if i <= bottom + RISE_FRAMES {
            self.knee_depth + range * (i - bottom) as f32 / RISE_FRAMES as f32
        } else {
            STANDING_KNEE
        }
    }

    /// Upward body offset at clip offset `i`, px.
    fn lift_at(&self, i: u32) -> f32 {
        let takeoff = self.lead_in + DIP_FRAMES;
        match i.checked_sub(takeoff) {
            None => 0.0,
            Some(k) => JUMP_LIFT[(k as usize).min(JUMP_LIFT.len() - 1)],
        }
    }
}

/// Builds the landmark sequence for `profile`.
pub fn generate(profile: &ShotProfile) -> Vec<FrameLandmarks> {
    let arm = ArmPose::new(profile.elbow_angle, profile.wrist_snap);
    (0..profile.total_frames())
        .map(|i| frame(profile, &arm, i))
        .collect()
}

/// Shooting-arm joint positions relative to the right shoulder.
struct ArmPose {
    elbow: Point,
    wrist: Point,
}

impl ArmPose {
    fn new(elbow_angle: f32, wrist_snap: f32) -> Self {
        // Forearm tilted `wrist_snap` from vertical, pointing up and forward.
        let (sin_f, cos_f) = wrist_snap.to_radians().sin_cos();
        let forearm = (sin_f, -cos_f);
        // Upper arm direction from elbow to shoulder.
        let (sin_e, cos_e) = elbow_angle.to_radians().sin_cos();
        let to_shoulder = (
            cos_e * forearm.0 - sin_e * forearm.1,
            sin_e * forearm.0 + cos_e * forearm.1,
        );
        let elbow = Point::new(-UPPER_ARM_PX * to_shoulder.0, -UPPER_ARM_PX * to_shoulder.1);
        let wrist = Point::new(
            elbow.x + FOREARM_PX * forearm.0,
            elbow.y + FOREARM_PX * forearm.1,
        );
        Self { elbow, wrist }
    }
}

fn frame(profile: &ShotProfile, arm: &ArmPose, i: u32) -> FrameLandmarks {
    let lift = profile.lift_at(i);
    let at = |x: f32, y: f32| Landmark::new(x, y - lift, VISIBILITY);

    let shoulder = Point::new(360.0, 200.0);
    let elbow = Point::new(shoulder.x + arm.elbow.x, shoulder.y + arm.elbow.y);
    let wrist = Point::new(shoulder.x + arm.wrist.x, shoulder.y + arm.wrist.y);

    let knee_half = ((180.0 - profile.knee_at(i)) / 2.0).to_radians();
    let knee_dx = 100.0 * knee_half.tan();

    let guide_wrist = Point::new(
        wrist.x - 15.0,
        wrist.y - profile.guide_hand_height / 100.0 * TORSO_PX,
    );
    let (sin_t, cos_t) = profile.guide_thumb_angle.to_radians().sin_cos();

    FrameLandmarks::new(profile.first_frame + i)
        .with_joint(Joint::Nose, at(355.0, 150.0))
        .with_joint(Joint::LeftShoulder, at(350.0, 200.0))
        .with_joint(Joint::RightShoulder, at(shoulder.x, shoulder.y))
        .with_joint(Joint::RightElbow, at(elbow.x, elbow.y))
        .with_joint(Joint::RightWrist, at(wrist.x, wrist.y))
        .with_joint(Joint::LeftWrist, at(guide_wrist.x, guide_wrist.y))
        .with_joint(Joint::LeftThumb, at(guide_wrist.x + 20.0, guide_wrist.y))
        .with_joint(
            Joint::LeftIndex,
            at(guide_wrist.x + 20.0 * cos_t, guide_wrist.y - 20.0 * sin_t),
        )
        .with_joint(Joint::LeftHip, at(350.0, 200.0 + TORSO_PX))
        .with_joint(Joint::RightHip, at(360.0, 200.0 + TORSO_PX))
        .with_joint(Joint::LeftKnee, at(350.0 + knee_dx, 420.0))
        .with_joint(Joint::RightKnee, at(360.0 + knee_dx, 420.0))
        .with_joint(Joint::LeftAnkle, at(350.0, 520.0))
        .with_joint(Joint::RightAnkle, at(360.0, 520.0))
}
