//! Analyzer configuration: every component's tunables in one
//! serde-friendly object.

use serde::{Deserialize, Serialize};
use swish_engine::{BoundaryConfig, ExtractorConfig, SegmentConfig};
use swish_eval::{DetectorConfig, IdealRange, MIN_EVIDENCE_FRAMES};
use swish_search::SelectorConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub extractor: ExtractorConfig,
    pub boundary: BoundaryConfig,
    pub segment: SegmentConfig,
    pub detector: DetectorConfig,
    pub selector: SelectorConfig,
    /// Run the detector bank on the rayon pool.
    pub parallel_detectors: bool,
}

impl AnalyzerConfig {
    pub fn left_handed() -> Self {
        Self {
            extractor: ExtractorConfig::left_handed(),
            ..Self::default()
        }
    }

    /// Parses and validates. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.extractor;
        validate_unit_range(e.visibility_floor, "extractor.visibility_floor")?;
        validate_positive(e.front_view_min_ratio, "extractor.front_view_min_ratio")?;
        validate_positive(e.snap_reference_offset_px, "extractor.snap_reference_offset_px")?;

        let b = &self.boundary;
        validate_non_negative(b.pre_roll_secs, "boundary.pre_roll_secs")?;
        validate_positive(b.baseline_secs, "boundary.baseline_secs")?;
        validate_at_least(b.sustain_frames, 1, "boundary.sustain_frames")?;
        validate_positive(b.knee_onset_deg, "boundary.knee_onset_deg")?;
        validate_positive(b.elbow_onset_deg, "boundary.elbow_onset_deg")?;
        validate_positive(b.wrist_speed_onset, "boundary.wrist_speed_onset")?;
        validate_positive(b.motion_energy_factor, "boundary.motion_energy_factor")?;
        validate_non_negative(b.min_motion_energy, "boundary.min_motion_energy")?;
        validate_non_negative(b.consensus_secs, "boundary.consensus_secs")?;

        let s = &self.segment;
        validate_positive(s.load_search_secs, "segment.load_search_secs")?;
        validate_non_negative(s.load_lookback_secs, "segment.load_lookback_secs")?;
        validate_non_negative(s.load_min_secs, "segment.load_min_secs")?;
        validate_non_negative(s.follow_through_secs, "segment.follow_through_secs")?;

        let ideal = &self.detector.ideal_ranges;
        validate_angle_range(ideal.elbow, "detector.ideal_ranges.elbow")?;
        validate_angle_range(ideal.knee, "detector.ideal_ranges.knee")?;
        validate_angle_range(ideal.wrist, "detector.ideal_ranges.wrist")?;

        let t = &self.detector.thresholds;
        validate_unit_range(
            t.corroboration_fraction,
            "detector.thresholds.corroboration_fraction",
        )?;
        validate_at_least(
            t.min_evidence_frames,
            MIN_EVIDENCE_FRAMES,
            "detector.thresholds.min_evidence_frames",
        )?;
        validate_unit_range(
            t.late_follow_through_progress,
            "detector.thresholds.late_follow_through_progress",
        )?;
        for (value, field) in [
            (t.elbow_side_scale, "detector.thresholds.elbow_side_scale"),
            (t.flare_ratio_scale, "detector.thresholds.flare_ratio_scale"),
            (t.lateral_angle_scale, "detector.thresholds.lateral_angle_scale"),
            (t.insufficient_knee_scale, "detector.thresholds.insufficient_knee_scale"),
            (t.excessive_knee_scale, "detector.thresholds.excessive_knee_scale"),
            (t.wrist_snap_scale, "detector.thresholds.wrist_snap_scale"),
            (t.guide_hand_scale, "detector.thresholds.guide_hand_scale"),
            (t.thumb_angle_scale, "detector.thresholds.thumb_angle_scale"),
        ] {
            validate_positive(value, field)?;
        }

        validate_non_negative(self.selector.severity_weight, "selector.severity_weight")?;
        Ok(())
    }
}

/// Validate that a value falls within `[0.0, 1.0]`.
pub fn validate_unit_range(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, format!("must be between 0.0 and 1.0, got {value}")));
    }
    Ok(())
}

fn validate_positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(field, format!("must be a positive number, got {value}")));
    }
    Ok(())
}

fn validate_non_negative(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(invalid(field, format!("must be zero or more, got {value}")));
    }
    Ok(())
}

fn validate_at_least(value: u32, min: u32, field: &'static str) -> Result<(), ConfigError> {
    if value < min {
        return Err(invalid(field, format!("must be at least {min}, got {value}")));
    }
    Ok(())
}

fn validate_angle_range(range: IdealRange, field: &'static str) -> Result<(), ConfigError> {
    let in_bounds = |v: f32| (0.0..=180.0).contains(&v);
    if !(in_bounds(range.min) && in_bounds(range.max) && range.min <= range.max) {
        return Err(invalid(
            field,
            format!("must satisfy 0 <= min <= max <= 180, got {}..{}", range.min, range.max),
        ));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
