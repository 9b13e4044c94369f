//! Phase segmentation: shot start + metrics → Setup, Load/Dip, Release,
//! Follow-Through.
//!
//! Layout is computed over positions in the post-start slice and mapped back
//! to frame numbers at the end, so gaps in frame numbering never produce
//! phases that point at missing frames.

use swish_core::{FrameMetrics, Metric, PhaseName, PhaseSet, ShotPhase};

use crate::config::{secs_to_frames, SegmentConfig};
use crate::error::SegmentError;

/// One frame each for Setup, Load/Dip and Release.
pub const MIN_SHOT_FRAMES: usize = 3;

type Span = (usize, usize);

/// Phase layout as inclusive index ranges into the post-start slice.
#[derive(Debug, PartialEq)]
struct Layout {
    setup: Span,
    load: Span,
    load_key: usize,
    release: Span,
    release_key: usize,
    follow: Span,
    follow_key: usize,
}

impl Layout {
    fn into_phases(self, shot: &[FrameMetrics]) -> Result<PhaseSet, SegmentError> {
        let frame = |i: usize| shot[i].frame_number;
        let phase = |name, (start, end): Span| ShotPhase::new(name, frame(start), frame(end));

        Ok(PhaseSet::new(
            phase(PhaseName::Setup, self.setup),
            phase(PhaseName::LoadDip, self.load).with_key_moment(frame(self.load_key)),
            phase(PhaseName::Release, self.release).with_key_moment(frame(self.release_key)),
            phase(PhaseName::FollowThrough, self.follow).with_key_moment(frame(self.follow_key)),
        )?)
    }
}

pub struct PhaseSegmenter {
    pub config: SegmentConfig,
}

impl PhaseSegmenter {
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }

    /// Splits the frames from `shot_start` on into the four shot phases.
    ///
    /// `metrics` must be ordered by frame number. Short clips are compressed
    /// proportionally so every phase still exists; fewer than
    /// [`MIN_SHOT_FRAMES`] frames cannot be segmented.
    pub fn segment(
        &self,
        shot_start: u32,
        metrics: &[FrameMetrics],
        fps: f32,
    ) -> Result<PhaseSet, SegmentError> {
        let from = metrics.partition_point(|m| m.frame_number < shot_start);
        let shot = &metrics[from..];
        if shot.len() < MIN_SHOT_FRAMES {
            return Err(SegmentError::NotEnoughFrames {
                available: shot.len(),
                required: MIN_SHOT_FRAMES,
            });
        }

        let load_min = (secs_to_frames(self.config.load_min_secs, fps) as usize).max(1);
        let release_min = self.config.release_lead_frames as usize + 1;
        let natural_min = 1 + load_min + release_min;

        let layout = if shot.len() < natural_min {
            tracing::debug!(
                "compressing phases: {} frames available, {} needed",
                shot.len(),
                natural_min
            );
            compressed(shot, [1, load_min, release_min])
        } else {
            self.natural(shot, fps, load_min)
        };

        let phases = layout.into_phases(shot)?;
        for p in phases.iter() {
            tracing::debug!(
                "{}: frames {}..={} (key {:?})",
                p.name,
                p.start_frame,
                p.end_frame,
                p.key_moment_frame
            );
        }
        Ok(phases)
    }

    fn natural(&self, shot: &[FrameMetrics], fps: f32, load_min: usize) -> Layout {
        let cfg = &self.config;
        let last = shot.len() - 1;

        // First frame stays with Setup, last frame with Release.
        let search_hi = (secs_to_frames(cfg.load_search_secs, fps) as usize).clamp(1, last - 1);
        let load_key = argmin(shot, 1, search_hi, Metric::KneeAngle).unwrap_or((1 + search_hi) / 2);

        let release_key = argmax(shot, load_key + 1, last, Metric::WristVelocityY)
            .unwrap_or(load_key + 1);

        let lookback = secs_to_frames(cfg.load_lookback_secs, fps) as usize;
        let mut load_start = load_key.saturating_sub(lookback).max(1);
        let mut load_end = load_key;
        if load_end + 1 - load_start < load_min {
            load_start = (load_end + 1).saturating_sub(load_min).max(1);
            let missing = load_min.saturating_sub(load_end + 1 - load_start);
            load_end = (load_end + missing).min(release_key - 1);
        }

        let release_start = release_key
            .saturating_sub(cfg.release_lead_frames as usize)
            .max(load_end + 1);
        let release_end = (release_key + cfg.release_trail_frames as usize).min(last);

        let follow_start = release_key
            .saturating_sub(cfg.follow_through_lead_frames as usize)
            .max(release_start);
        let follow_end =
            (release_key + secs_to_frames(cfg.follow_through_secs, fps) as usize).min(last);
        let follow_key =
            argmax(shot, follow_start, follow_end, Metric::WristHeight).unwrap_or(release_key);

        Layout {
            setup: (0, load_start - 1),
            load: (load_start, load_end),
            load_key,
            release: (release_start, release_end),
            release_key,
            follow: (follow_start, follow_end),
            follow_key,
        }
    }
}

impl Default for PhaseSegmenter {
    fn default() -> Self {
        Self::new(SegmentConfig::default())
    }
}

/// Sizes Setup, Load/Dip and Release in proportion to their minimum
/// durations, at least one frame each. Follow-Through runs from the
/// Release key to the last frame.
fn compressed(shot: &[FrameMetrics], weights: [usize; 3]) -> Layout {
    let n = shot.len();
    let last = n - 1;
    let total: usize = weights.iter().sum();

    let mut sizes = weights.map(|w| (n * w / total).max(1));
    while sizes.iter().sum::<usize>() > n {
        match (0..sizes.len()).filter(|&i| sizes[i] > 1).max_by_key(|&i| sizes[i]) {
            Some(i) => sizes[i] -= 1,
            None => break,
        }
    }
    sizes[2] += n.saturating_sub(sizes.iter().sum());

    let setup = (0, sizes[0] - 1);
    let load = (sizes[0], sizes[0] + sizes[1] - 1);
    let release = (load.1 + 1, last);

    let load_key = argmin(shot, load.0, load.1, Metric::KneeAngle).unwrap_or(load.1);
    let release_key =
        argmax(shot, release.0, release.1, Metric::WristVelocityY).unwrap_or(release.0);
    let follow = (release_key, last);
    let follow_key = argmax(shot, follow.0, follow.1, Metric::WristHeight).unwrap_or(release_key);

    Layout {
        setup,
        load,
        load_key,
        release,
        release_key,
        follow,
        follow_key,
    }
}

/// Index of the smallest `metric` in `lo..=hi`, earliest on ties.
fn argmin(shot: &[FrameMetrics], lo: usize, hi: usize, metric: Metric) -> Option<usize> {
    extreme(shot, lo, hi, metric, |candidate, best| candidate < best)
}

/// Index of the largest `metric` in `lo..=hi`, earliest on ties.
fn argmax(shot: &[FrameMetrics], lo: usize, hi: usize, metric: Metric) -> Option<usize> {
    extreme(shot, lo, hi, metric, |candidate, best| candidate > best)
}

fn extreme(
    shot: &[FrameMetrics],
    lo: usize,
    hi: usize,
    metric: Metric,
    better: impl Fn(f32, f32) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for i in lo..=hi.min(shot.len().saturating_sub(1)) {
        let Some(v) = shot[i].get(metric) else { continue };
        if best.map_or(true, |(_, b)| better(v, b)) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}
