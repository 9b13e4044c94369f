//! Shot boundary detection.
//!
//! Three independent onset heuristics look for the first sustained
//! departure from an at-rest baseline:
//!
//! - pose: knee or elbow angle leaves its baseline,
//! - landmark velocity: shooting wrist speed rises,
//! - frame difference: decoder-supplied motion energy rises.
//!
//! Combination policy: the earliest estimate that another heuristic agrees
//! with (within `consensus_secs`) wins. Without agreement the pose estimate
//! is primary, then landmark velocity, then frame difference. The winning
//! onset is moved back by `pre_roll_secs` and floored at the first frame.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use swish_core::{FrameLandmarks, FrameMetrics, Metric};

use crate::config::{secs_to_frames, BoundaryConfig};
use crate::error::BoundaryError;

/// Onset heuristics in fallback priority order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnsetHeuristic {
    Pose,
    LandmarkVelocity,
    FrameDifference,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OnsetEstimate {
    pub heuristic: OnsetHeuristic,
    pub frame: u32,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ShotBoundary {
    /// Shot start after the pre-roll buffer.
    pub start_frame: u32,
    /// Onset frame before the pre-roll buffer.
    pub raw_onset: u32,
    pub chosen: OnsetHeuristic,
    pub consensus: bool,
    pub estimates: SmallVec<[OnsetEstimate; 3]>,
}

pub struct ShotBoundaryDetector {
    pub config: BoundaryConfig,
}

impl ShotBoundaryDetector {
    pub fn new(config: BoundaryConfig) -> Self {
        Self { config }
    }

    /// Finds the shot start. `landmarks` and `metrics` must be index-aligned
    /// and ordered by frame number.
    pub fn detect(
        &self,
        landmarks: &[FrameLandmarks],
        metrics: &[FrameMetrics],
        fps: f32,
    ) -> Result<ShotBoundary, BoundaryError> {
        if landmarks.len() != metrics.len() {
            return Err(BoundaryError::LengthMismatch {
                landmarks: landmarks.len(),
                metrics: metrics.len(),
            });
        }
        let Some(first) = metrics.first() else {
            return Err(BoundaryError::ShotStartNotFound { frames: 0 });
        };
        let first_frame = first.frame_number;
        let baseline_end =
            first_frame.saturating_add(secs_to_frames(self.config.baseline_secs, fps).max(1));

        let mut estimates: SmallVec<[OnsetEstimate; 3]> = SmallVec::new();
        let heuristics = [
            (OnsetHeuristic::Pose, self.pose_onset(metrics, baseline_end)),
            (
                OnsetHeuristic::LandmarkVelocity,
                self.velocity_onset(metrics, baseline_end),
            ),
            (
                OnsetHeuristic::FrameDifference,
                self.frame_difference_onset(landmarks, baseline_end),
            ),
        ];
        for (heuristic, onset) in heuristics {
            tracing::debug!("{:?} onset: {:?}", heuristic, onset);
            if let Some(frame) = onset {
                estimates.push(OnsetEstimate { heuristic, frame });
            }
        }

        let window = secs_to_frames(self.config.consensus_secs, fps);
        let Some((chosen, consensus)) = combine(&estimates, window) else {
            return Err(BoundaryError::ShotStartNotFound {
                frames: metrics.len(),
            });
        };

        let pre_roll = secs_to_frames(self.config.pre_roll_secs, fps);
        let start_frame = chosen.frame.saturating_sub(pre_roll).max(first_frame);

        tracing::info!(
            "shot start at frame {} (onset {} by {:?}{}, pre-roll {} frames)",
            start_frame,
            chosen.frame,
            chosen.heuristic,
            if consensus { ", consensus" } else { "" },
            pre_roll
        );

        Ok(ShotBoundary {
            start_frame,
            raw_onset: chosen.frame,
            chosen: chosen.heuristic,
            consensus,
            estimates,
        })
    }

    fn pose_onset(&self, metrics: &[FrameMetrics], baseline_end: u32) -> Option<u32> {
        let knee_base = baseline_mean(metrics, baseline_end, |m| m.get(Metric::KneeAngle));
        let elbow_base = baseline_mean(metrics, baseline_end, |m| m.get(Metric::ElbowAngle));
        if knee_base.is_none() && elbow_base.is_none() {
            return None;
        }

        let moving = metrics
            .iter()
            .filter(|m| m.frame_number >= baseline_end)
            .map(|m| {
                let knee_moved =
                    deviates(knee_base, m.get(Metric::KneeAngle), self.config.knee_onset_deg);
                let elbow_moved =
                    deviates(elbow_base, m.get(Metric::ElbowAngle), self.config.elbow_onset_deg);
                (m.frame_number, knee_moved || elbow_moved)
            });
        first_sustained(moving, self.config.sustain_frames)
    }

    fn velocity_onset(&self, metrics: &[FrameMetrics], baseline_end: u32) -> Option<u32> {
        let threshold = self.config.wrist_speed_onset;
        let moving = metrics
            .iter()
            .filter(|m| m.frame_number >= baseline_end)
            .map(|m| {
                let fast = m.get(Metric::WristSpeed).is_some_and(|s| s > threshold);
                (m.frame_number, fast)
            });
        first_sustained(moving, self.config.sustain_frames)
    }

    fn frame_difference_onset(
        &self,
        landmarks: &[FrameLandmarks],
        baseline_end: u32,
    ) -> Option<u32> {
        let baseline: Vec<f32> = landmarks
            .iter()
            .filter(|f| f.frame_number < baseline_end)
            .filter_map(|f| f.motion_energy)
            .filter(|e| e.is_finite())
            .collect();
        if baseline.is_empty() {
            return None;
        }
        let mean = baseline.iter().sum::<f32>() / baseline.len() as f32;
        let threshold =
            (mean * self.config.motion_energy_factor).max(self.config.min_motion_energy);

        let moving = landmarks
            .iter()
            .filter(|f| f.frame_number >= baseline_end)
            .map(|f| (f.frame_number, f.motion_energy.is_some_and(|e| e > threshold)));
        first_sustained(moving, self.config.sustain_frames)
    }
}

impl Default for ShotBoundaryDetector {
    fn default() -> Self {
        Self::new(BoundaryConfig::default())
    }
}

/// Picks the winning estimate and whether it came from a consensus.
fn combine(estimates: &[OnsetEstimate], window: u32) -> Option<(OnsetEstimate, bool)> {
    let mut sorted: SmallVec<[OnsetEstimate; 3]> = estimates.iter().copied().collect();
    sorted.sort_by_key(|e| (e.frame, e.heuristic));

    for (i, e) in sorted.iter().enumerate() {
        let agreed = sorted
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && other.frame.abs_diff(e.frame) <= window);
        if agreed {
            return Some((*e, true));
        }
    }

    estimates
        .iter()
        .min_by_key(|e| e.heuristic)
        .map(|e| (*e, false))
}

fn baseline_mean(
    metrics: &[FrameMetrics],
    baseline_end: u32,
    value: impl Fn(&FrameMetrics) -> Option<f32>,
) -> Option<f32> {
    let values: Vec<f32> = metrics
        .iter()
        .take_while(|m| m.frame_number < baseline_end)
        .filter_map(value)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}

fn deviates(baseline: Option<f32>, value: Option<f32>, limit: f32) -> bool {
    match (baseline, value) {
        (Some(b), Some(v)) => (v - b).abs() > limit,
        _ => false,
    }
}

/// First frame of the first run of at least `sustain` consecutive `true`s.
/// A gap in frame numbers ends a run.
fn first_sustained(signal: impl Iterator<Item = (u32, bool)>, sustain: u32) -> Option<u32> {
    let sustain = sustain.max(1);
    let mut run_start = None;
    let mut run_len = 0u32;
    let mut prev_frame: Option<u32> = None;
    for (frame, active) in signal {
        if prev_frame.and_then(|p| p.checked_add(1)) != Some(frame) {
            run_len = 0;
            run_start = None;
        }
        prev_frame = Some(frame);
        if active {
            if run_len == 0 {
                run_start = Some(frame);
            }
            run_len += 1;
            if run_len >= sustain {
                return run_start;
            }
        } else {
            run_len = 0;
            run_start = None;
        }
    }
    None
}
