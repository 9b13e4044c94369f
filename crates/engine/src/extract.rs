//! Metric extraction: landmarks → named per-frame metrics.
//!
//! Extraction never fails. A metric whose joints are missing or below the
//! visibility floor, or whose joints coincide, is simply left out of the
//! frame's [`FrameMetrics`].

use swish_core::{FrameLandmarks, FrameMetrics, Joint, Metric, Point, Side};

use crate::angles::{
    checked_joint_angle, flare_ratio, is_segment, lateral_angle, wrist_snap_angle,
};
use crate::config::ExtractorConfig;

const MIN_TORSO_PX: f32 = 1e-3;

pub struct MetricExtractor {
    pub config: ExtractorConfig,
}

/// Reliable body reference points for one frame.
struct Frame<'a> {
    landmarks: &'a FrameLandmarks,
    floor: f32,
}

impl Frame<'_> {
    fn point(&self, joint: Joint) -> Option<Point> {
        self.landmarks.reliable(joint, self.floor)
    }

    fn shoulders(&self) -> Option<(Point, Point)> {
        Some((self.point(Joint::LeftShoulder)?, self.point(Joint::RightShoulder)?))
    }

    fn shoulder_mid(&self) -> Option<Point> {
        self.shoulders().map(|(l, r)| l.midpoint(r))
    }

    fn torso_length(&self) -> Option<f32> {
        let hip_mid = self
            .point(Joint::LeftHip)?
            .midpoint(self.point(Joint::RightHip)?);
        let len = self.shoulder_mid()?.distance(hip_mid);
        (len >= MIN_TORSO_PX).then_some(len)
    }

    fn knee_angle(&self, side: Side) -> Option<f32> {
        checked_joint_angle(
            self.point(side.hip())?,
            self.point(side.knee())?,
            self.point(side.ankle())?,
        )
    }
}

impl MetricExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Metrics for `frame`. `prev` is the preceding frame of the sequence and
    /// is only used for velocity metrics.
    pub fn extract(
        &self,
        frame: &FrameLandmarks,
        prev: Option<&FrameLandmarks>,
        fps: f32,
    ) -> FrameMetrics {
        let cur = Frame {
            landmarks: frame,
            floor: self.config.visibility_floor,
        };
        let side = self.config.shooting_hand;
        let guide = side.opposite();

        let shoulder = cur.point(side.shoulder());
        let elbow = cur.point(side.elbow());
        let wrist = cur.point(side.wrist());
        let torso = cur.torso_length();

        let mut metrics = FrameMetrics::new(frame.frame_number);

        if let (Some(s), Some(e), Some(w)) = (shoulder, elbow, wrist) {
            metrics = metrics.with_opt(Metric::ElbowAngle, checked_joint_angle(s, e, w));
        }

        let knees: Vec<f32> = [Side::Left, Side::Right]
            .into_iter()
            .filter_map(|s| cur.knee_angle(s))
            .collect();
        if !knees.is_empty() {
            let mean = knees.iter().sum::<f32>() / knees.len() as f32;
            metrics = metrics.with(Metric::KneeAngle, mean);
        }

        if let (Some(e), Some(w)) = (elbow, wrist) {
            if is_segment(w, e) {
                metrics = metrics.with(
                    Metric::WristAngle,
                    wrist_snap_angle(e, w, self.config.snap_reference_offset_px),
                );
            }
        }

        if let (Some(e), Some((ls, rs)), Some(t)) = (elbow, cur.shoulders(), torso) {
            let width = (rs.x - ls.x).abs();
            if width / t >= self.config.front_view_min_ratio {
                metrics = metrics
                    .with_opt(Metric::ElbowFlareRatio, flare_ratio(e, ls, rs))
                    .with(Metric::ElbowLateralAngle, lateral_angle(e, ls.midpoint(rs)));
            }
        }

        if let (Some(mid), Some(w)) = (cur.shoulder_mid(), wrist) {
            metrics = metrics.with(Metric::WristHeight, mid.y - w.y);
        }

        if let (Some(w), Some(prev)) = (wrist, prev) {
            let prev_wrist = prev.reliable(side.wrist(), self.config.visibility_floor);
            let dt_frames = frame.frame_number.saturating_sub(prev.frame_number);
            if let Some(pw) = prev_wrist.filter(|_| dt_frames > 0 && fps > 0.0) {
                let dt = dt_frames as f32 / fps;
                metrics = metrics.with(Metric::WristVelocityY, (pw.y - w.y) / dt);
                if let Some(t) = torso {
                    metrics = metrics.with(Metric::WristSpeed, pw.distance(w) / dt / t);
                }
            }
        }

        if let (Some(w), Some(gw), Some(t)) = (wrist, cur.point(guide.wrist()), torso) {
            metrics = metrics.with(Metric::GuideHandHeight, (w.y - gw.y) / t * 100.0);
        }

        if let (Some(gw), Some(thumb), Some(index)) = (
            cur.point(guide.wrist()),
            cur.point(guide.thumb()),
            cur.point(guide.index()),
        ) {
            metrics =
                metrics.with_opt(Metric::GuideThumbAngle, checked_joint_angle(thumb, gw, index));
        }

        metrics
    }

    /// Metrics for every frame, in input order.
    pub fn extract_all(&self, frames: &[FrameLandmarks], fps: f32) -> Vec<FrameMetrics> {
        let metrics: Vec<FrameMetrics> = frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let prev = i.checked_sub(1).map(|p| &frames[p]);
                self.extract(frame, prev, fps)
            })
            .collect();

        tracing::debug!(
            "extracted metrics for {} frames ({} empty, {} front view)",
            metrics.len(),
            metrics.iter().filter(|m| m.is_empty()).count(),
            metrics
                .iter()
                .filter(|m| m.has(Metric::ElbowFlareRatio) || m.has(Metric::ElbowLateralAngle))
                .count()
        );
        metrics
    }
}

impl Default for MetricExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}
