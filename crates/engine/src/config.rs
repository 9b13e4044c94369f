//! Tunables for metric extraction, shot boundary detection, and phase
//! segmentation. Time-based values are in seconds and converted to frame
//! counts with the source frame rate.

use serde::{Deserialize, Serialize};
use swish_core::{Side, DEFAULT_VISIBILITY_FLOOR};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub shooting_hand: Side,
    /// Landmarks less visible than this are treated as missing.
    pub visibility_floor: f32,
    /// Minimum shoulder-width / torso-length ratio for front-view metrics.
    pub front_view_min_ratio: f32,
    /// Distance of the synthetic vertical reference below the wrist, px.
    pub snap_reference_offset_px: f32,
}

impl ExtractorConfig {
    pub fn right_handed() -> Self {
        Self {
            shooting_hand: Side::Right,
            visibility_floor: DEFAULT_VISIBILITY_FLOOR,
            front_view_min_ratio: 0.45,
            snap_reference_offset_px: 50.0,
        }
    }

    pub fn left_handed() -> Self {
        Self {
            shooting_hand: Side::Left,
            ..Self::right_handed()
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::right_handed()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Context kept before the detected onset.
    pub pre_roll_secs: f32,
    /// Leading window used as the at-rest baseline.
    pub baseline_secs: f32,
    /// Consecutive frames a signal must stay above threshold.
    pub sustain_frames: u32,
    /// Knee deviation from baseline that counts as motion, degrees.
    pub knee_onset_deg: f32,
    /// Elbow deviation from baseline that counts as motion, degrees.
    pub elbow_onset_deg: f32,
    /// Wrist speed that counts as motion, torso lengths per second.
    pub wrist_speed_onset: f32,
    /// Motion energy must exceed the baseline mean by this factor.
    pub motion_energy_factor: f32,
    /// Absolute floor for the motion energy threshold.
    pub min_motion_energy: f32,
    /// Estimates this close together agree with each other.
    pub consensus_secs: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            pre_roll_secs: 0.8,
            baseline_secs: 0.3,
            sustain_frames: 3,
            knee_onset_deg: 8.0,
            elbow_onset_deg: 15.0,
            wrist_speed_onset: 1.0,
            motion_energy_factor: 3.0,
            min_motion_energy: 1.0,
            consensus_secs: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// How far after shot start to look for the deepest knee bend.
    pub load_search_secs: f32,
    /// Load/Dip length before its key moment.
    pub load_lookback_secs: f32,
    /// Minimum Load/Dip duration.
    pub load_min_secs: f32,
    /// Release frames kept before the release key moment.
    pub release_lead_frames: u32,
    /// Release frames kept after the release key moment.
    pub release_trail_frames: u32,
    /// Follow-Through frames that start before the release key moment.
    pub follow_through_lead_frames: u32,
    /// Follow-Through length after the release key moment.
    pub follow_through_secs: f32,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            load_search_secs: 1.5,
            load_lookback_secs: 1.0,
            load_min_secs: 0.5,
            release_lead_frames: 3,
            release_trail_frames: 5,
            follow_through_lead_frames: 1,
            follow_through_secs: 0.4,
        }
    }
}

/// Converts a duration to a whole number of frames at `fps`.
pub fn secs_to_frames(secs: f32, fps: f32) -> u32 {
    let frames = (secs * fps).round();
    if frames.is_finite() && frames > 0.0 {
        frames as u32
    } else {
        0
    }
}
