//! Named per-frame scalar metrics derived from landmarks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Shoulder-elbow-wrist angle of the shooting arm, degrees.
    ElbowAngle,
    /// Hip-knee-ankle angle, degrees, averaged over reliable legs.
    KneeAngle,
    /// Wrist-snap angle against a vertical reference below the wrist, degrees.
    WristAngle,
    /// Elbow offset from the shoulder midline as % of shoulder width.
    #[serde(rename = "elbow_flare_front_view")]
    ElbowFlareRatio,
    /// Elbow deviation from vertical under the shoulder midpoint, degrees.
    ElbowLateralAngle,
    /// Upward shooting-wrist velocity, px/s.
    WristVelocityY,
    /// Shooting-wrist speed, torso lengths per second.
    WristSpeed,
    /// Shooting wrist height above the shoulder midpoint, px.
    WristHeight,
    /// Guide wrist height above the shooting wrist, % of torso length.
    GuideHandHeight,
    /// Thumb-wrist-index angle of the guide hand, degrees.
    GuideThumbAngle,
}

/// Metrics computed for one frame. A missing key means "not computable".
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub frame_number: u32,
    pub values: BTreeMap<Metric, f32>,
}

impl FrameMetrics {
    pub fn new(frame_number: u32) -> Self {
        Self {
            frame_number,
            values: BTreeMap::new(),
        }
    }

    /// Adds `metric` when `value` is finite; non-finite values are dropped.
    pub fn with(mut self, metric: Metric, value: f32) -> Self {
        if value.is_finite() {
            self.values.insert(metric, value);
        }
        self
    }

    pub fn with_opt(self, metric: Metric, value: Option<f32>) -> Self {
        match value {
            Some(v) => self.with(metric, v),
            None => self,
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f32> {
        self.values.get(&metric).copied()
    }

    pub fn has(&self, metric: Metric) -> bool {
        self.values.contains_key(&metric)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Slice of `metrics` whose frame numbers fall in `start..=end`.
///
/// `metrics` must be ordered by frame number.
pub fn frames_in_range(metrics: &[FrameMetrics], start: u32, end: u32) -> &[FrameMetrics] {
    if start > end {
        return &[];
    }
    let lo = metrics.partition_point(|m| m.frame_number < start);
    let hi = metrics.partition_point(|m| m.frame_number <= end);
    &metrics[lo..hi.max(lo)]
}
