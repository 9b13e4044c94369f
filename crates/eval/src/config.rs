//! Ideal joint ranges and per-flaw detector thresholds.

use serde::{Deserialize, Serialize};

/// Inclusive ideal range for an angle, degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdealRange {
    pub min: f32,
    pub max: f32,
}

impl IdealRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdealRanges {
    pub elbow: IdealRange,
    pub knee: IdealRange,
    pub wrist: IdealRange,
}

impl Default for IdealRanges {
    fn default() -> Self {
        Self {
            elbow: IdealRange::new(160.0, 180.0),
            knee: IdealRange::new(110.0, 130.0),
            wrist: IdealRange::new(70.0, 90.0),
        }
    }
}

/// Margins, severity scales, and corroboration rules for every detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlawThresholds {
    /// Fraction of evaluable frames that must fire for window-wide flaws.
    pub corroboration_fraction: f32,
    /// Minimum firing frames for any corroborated finding.
    pub min_evidence_frames: u32,

    // Elbow flare
    pub elbow_side_margin: f32,
    /// Side-view elbow angle must also be below this absolute cap.
    pub elbow_side_cap: f32,
    pub elbow_side_scale: f32,
    pub flare_ratio_limit: f32,
    pub flare_ratio_scale: f32,
    pub lateral_angle_limit: f32,
    pub lateral_angle_scale: f32,

    // Knee bend
    /// Frames either side of the Load/Dip key moment.
    pub knee_window_frames: u32,
    pub insufficient_knee_margin: f32,
    pub insufficient_knee_scale: f32,
    pub excessive_knee_margin: f32,
    pub excessive_knee_scale: f32,

    // Wrist snap
    /// Frames either side of the Follow-Through key moment.
    pub wrist_window_frames: u32,
    pub wrist_snap_margin: f32,
    pub wrist_snap_offset: f32,
    pub wrist_snap_scale: f32,
    /// Severity a lone key-moment frame needs to count on its own.
    pub peak_moment_min_severity: f32,

    // Guide hand
    /// Follow-Through progress where guide-hand checks begin.
    pub late_follow_through_progress: f32,
    pub guide_hand_limit: f32,
    pub guide_hand_scale: f32,
    pub thumb_angle_limit: f32,
    pub thumb_angle_scale: f32,
}

impl Default for FlawThresholds {
    fn default() -> Self {
        Self {
            corroboration_fraction: 0.6,
            min_evidence_frames: 2,
            elbow_side_margin: 20.0,
            elbow_side_cap: 140.0,
            elbow_side_scale: 1.5,
            flare_ratio_limit: 80.0,
            flare_ratio_scale: 0.5,
            lateral_angle_limit: 25.0,
            lateral_angle_scale: 1.5,
            knee_window_frames: 3,
            insufficient_knee_margin: 25.0,
            insufficient_knee_scale: 1.2,
            excessive_knee_margin: 5.0,
            excessive_knee_scale: 1.5,
            wrist_window_frames: 2,
            wrist_snap_margin: 20.0,
            wrist_snap_offset: 15.0,
            wrist_snap_scale: 1.8,
            peak_moment_min_severity: 20.0,
            late_follow_through_progress: 0.6,
            guide_hand_limit: 15.0,
            guide_hand_scale: 0.8,
            thumb_angle_limit: 45.0,
            thumb_angle_scale: 0.6,
        }
    }
}

/// No corroborated finding may rest on fewer firing frames than this.
pub const MIN_EVIDENCE_FRAMES: u32 = 2;

impl FlawThresholds {
    /// `min_evidence_frames`, never below [`MIN_EVIDENCE_FRAMES`].
    pub fn evidence_floor(&self) -> u32 {
        self.min_evidence_frames.max(MIN_EVIDENCE_FRAMES)
    }
}

/// Everything a detector needs besides the metrics themselves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub ideal_ranges: IdealRanges,
    pub thresholds: FlawThresholds,
}

impl DetectorConfig {
    /// Side-view elbow angles below this fire `elbow_flare`.
    pub fn elbow_side_limit(&self) -> f32 {
        (self.ideal_ranges.elbow.min - self.thresholds.elbow_side_margin)
            .min(self.thresholds.elbow_side_cap)
    }

    /// Knee angles strictly above this fire `insufficient_knee_bend`.
    pub fn insufficient_knee_limit(&self) -> f32 {
        self.ideal_ranges.knee.min + self.thresholds.insufficient_knee_margin
    }

    /// Knee angles strictly below this fire `excessive_knee_bend`.
    pub fn excessive_knee_limit(&self) -> f32 {
        self.ideal_ranges.knee.min - self.thresholds.excessive_knee_margin
    }

    /// Wrist-snap angles strictly below this fire `poor_wrist_snap`.
    pub fn wrist_snap_limit(&self) -> f32 {
        self.ideal_ranges.wrist.min - self.thresholds.wrist_snap_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = DetectorConfig::default();
        assert_eq!(config.elbow_side_limit(), 140.0);
        assert_eq!(config.insufficient_knee_limit(), 135.0);
        assert_eq!(config.excessive_knee_limit(), 105.0);
        assert_eq!(config.wrist_snap_limit(), 50.0);
    }

    #[test]
    fn test_side_cap_applies_to_loose_ideal() {
        let mut config = DetectorConfig::default();
        config.ideal_ranges.elbow = IdealRange::new(175.0, 180.0);
        assert_eq!(config.elbow_side_limit(), 140.0);
        config.ideal_ranges.elbow = IdealRange::new(150.0, 180.0);
        assert_eq!(config.elbow_side_limit(), 130.0);
    }

    #[test]
    fn test_evidence_floor() {
        let mut t = FlawThresholds::default();
        assert_eq!(t.evidence_floor(), 2);
        t.min_evidence_frames = 1;
        assert_eq!(t.evidence_floor(), 2);
        t.min_evidence_frames = 4;
        assert_eq!(t.evidence_floor(), 4);
    }
}
