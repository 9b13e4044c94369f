//! One detector per flaw type.
//!
//! Every detector follows the same shape: score each frame in its legal
//! window (0 = does not fire), require corroboration across frames, then
//! report a clamped, strictly positive severity. Missing metrics make a
//! frame unevaluable; they never fail the detector.

use swish_core::{DetectionMethod, FlawFinding, FlawType, FrameMetrics, Metric};

use crate::config::{DetectorConfig, MIN_EVIDENCE_FRAMES};
use crate::window::FrameWindow;

pub trait FlawDetector {
    fn flaw_type(&self) -> FlawType;

    /// Severity contributed by a single frame, 0 when it does not fire or
    /// lacks the metrics to be judged.
    fn frame_severity(&self, frame: &FrameMetrics) -> f32;

    /// Judges the frames of `window`. `frames` holds exactly those frames.
    fn evaluate(&self, window: &FrameWindow, frames: &[FrameMetrics]) -> Option<FlawFinding>;
}

/// Per-frame severity of `flaw`, dispatched to its detector.
pub fn frame_severity(flaw: FlawType, config: &DetectorConfig, frame: &FrameMetrics) -> f32 {
    match flaw {
        FlawType::ElbowFlare => ElbowFlareDetector::new(config).frame_severity(frame),
        FlawType::InsufficientKneeBend => {
            InsufficientKneeBendDetector::new(config).frame_severity(frame)
        }
        FlawType::ExcessiveKneeBend => ExcessiveKneeBendDetector::new(config).frame_severity(frame),
        FlawType::PoorWristSnap => PoorWristSnapDetector::new(config).frame_severity(frame),
        FlawType::GuideHandOnTop => GuideHandOnTopDetector::new(config).frame_severity(frame),
        FlawType::ThumbFlick => ThumbFlickDetector::new(config).frame_severity(frame),
    }
}

/// Runs the detector for `flaw` over an already-sliced window.
pub fn evaluate(
    flaw: FlawType,
    config: &DetectorConfig,
    window: &FrameWindow,
    frames: &[FrameMetrics],
) -> Option<FlawFinding> {
    match flaw {
        FlawType::ElbowFlare => ElbowFlareDetector::new(config).evaluate(window, frames),
        FlawType::InsufficientKneeBend => {
            InsufficientKneeBendDetector::new(config).evaluate(window, frames)
        }
        FlawType::ExcessiveKneeBend => {
            ExcessiveKneeBendDetector::new(config).evaluate(window, frames)
        }
        FlawType::PoorWristSnap => PoorWristSnapDetector::new(config).evaluate(window, frames),
        FlawType::GuideHandOnTop => GuideHandOnTopDetector::new(config).evaluate(window, frames),
        FlawType::ThumbFlick => ThumbFlickDetector::new(config).evaluate(window, frames),
    }
}

/// `(excess × scale)` clamped to `[0, max]`; non-positive excess scores 0.
fn scaled(excess: f32, scale: f32, max: f32) -> f32 {
    if excess > 0.0 && excess.is_finite() {
        (excess * scale).min(max)
    } else {
        0.0
    }
}

/// Frames in a window scored against one rule.
#[derive(Debug, Default)]
struct Evidence {
    evaluable: u32,
    firing: u32,
    severity_sum: f32,
    peak: Option<(u32, f32)>,
}

impl Evidence {
    fn gather(frames: &[FrameMetrics], score: impl Fn(&FrameMetrics) -> Option<f32>) -> Self {
        let mut evidence = Self::default();
        for frame in frames {
            let Some(severity) = score(frame) else { continue };
            evidence.evaluable += 1;
            if severity > 0.0 {
                evidence.firing += 1;
                evidence.severity_sum += severity;
                if evidence.peak.map_or(true, |(_, s)| severity > s) {
                    evidence.peak = Some((frame.frame_number, severity));
                }
            }
        }
        evidence
    }

    /// At least `min_frames` (and never fewer than two) fire and they make up
    /// `fraction` of the evaluable frames.
    fn corroborated(&self, fraction: f32, min_frames: u32) -> bool {
        self.firing >= min_frames.max(MIN_EVIDENCE_FRAMES)
            && self.firing as f32 >= fraction * self.evaluable as f32
    }

    fn mean_severity(&self) -> f32 {
        if self.firing == 0 {
            0.0
        } else {
            self.severity_sum / self.firing as f32
        }
    }
}

/// Earliest frame with the highest local severity.
fn peak_frame(frames: &[FrameMetrics], severity: impl Fn(&FrameMetrics) -> f32) -> Option<u32> {
    let mut best: Option<(u32, f32)> = None;
    for frame in frames {
        let s = severity(frame);
        if s > 0.0 && best.map_or(true, |(_, b)| s > b) {
            best = Some((frame.frame_number, s));
        }
    }
    best.map(|(f, _)| f)
}

fn finding(
    flaw: FlawType,
    window: &FrameWindow,
    frame_number: u32,
    severity: f32,
    method: DetectionMethod,
    evidence_frame_count: u32,
) -> Option<FlawFinding> {
    let severity = severity.min(flaw.max_severity());
    (severity > 0.0 && severity.is_finite()).then_some(FlawFinding {
        flaw_type: flaw,
        frame_number,
        severity,
        phase_name: window.phase,
        detection_method: method,
        evidence_frame_count,
    })
}

// ---------------------------------------------------------------------------
// elbow_flare
// ---------------------------------------------------------------------------

pub struct ElbowFlareDetector<'a> {
    config: &'a DetectorConfig,
}

impl<'a> ElbowFlareDetector<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }

    /// Severity per method; `None` when the frame lacks that method's metric.
    fn method_severity(&self, method: DetectionMethod, frame: &FrameMetrics) -> Option<f32> {
        let t = &self.config.thresholds;
        let max = FlawType::ElbowFlare.max_severity();
        match method {
            DetectionMethod::SideViewExtension => {
                let angle = frame.get(Metric::ElbowAngle)?;
                Some(scaled(self.config.elbow_side_limit() - angle, t.elbow_side_scale, max))
            }
            DetectionMethod::FrontViewFlare => {
                let ratio = frame.get(Metric::ElbowFlareRatio)?;
                Some(scaled(ratio - t.flare_ratio_limit, t.flare_ratio_scale, max))
            }
            DetectionMethod::LateralAngle => {
                let angle = frame.get(Metric::ElbowLateralAngle)?;
                Some(scaled(angle - t.lateral_angle_limit, t.lateral_angle_scale, max))
            }
            _ => None,
        }
    }
}

const ELBOW_METHODS: [DetectionMethod; 3] = [
    DetectionMethod::SideViewExtension,
    DetectionMethod::FrontViewFlare,
    DetectionMethod::LateralAngle,
];

impl FlawDetector for ElbowFlareDetector<'_> {
    fn flaw_type(&self) -> FlawType {
        FlawType::ElbowFlare
    }

    fn frame_severity(&self, frame: &FrameMetrics) -> f32 {
        ELBOW_METHODS
            .iter()
            .filter_map(|&m| self.method_severity(m, frame))
            .fold(0.0, f32::max)
    }

    fn evaluate(&self, window: &FrameWindow, frames: &[FrameMetrics]) -> Option<FlawFinding> {
        let t = &self.config.thresholds;
        let mut best: Option<(DetectionMethod, Evidence)> = None;
        for method in ELBOW_METHODS {
            let evidence = Evidence::gather(frames, |f| self.method_severity(method, f));
            if !evidence.corroborated(t.corroboration_fraction, t.min_evidence_frames) {
                continue;
            }
            let better = best
                .as_ref()
                .map_or(true, |(_, b)| evidence.mean_severity() > b.mean_severity());
            if better {
                best = Some((method, evidence));
            }
        }

        let (method, evidence) = best?;
        let frame = peak_frame(frames, |f| self.frame_severity(f))?;
        finding(
            self.flaw_type(),
            window,
            frame,
            evidence.mean_severity(),
            method,
            evidence.firing,
        )
    }
}

// ---------------------------------------------------------------------------
// knee bend
// ---------------------------------------------------------------------------

/// Shared rule for both knee flaws: the Load/Dip key frame must fire and at
/// least `min_evidence_frames` frames around it must agree. Severity is read
/// at the key frame.
fn evaluate_knee(
    detector: &impl FlawDetector,
    config: &DetectorConfig,
    window: &FrameWindow,
    frames: &[FrameMetrics],
) -> Option<FlawFinding> {
    let key = window.key?;
    let key_frame = frames.iter().find(|f| f.frame_number == key)?;
    let key_severity = detector.frame_severity(key_frame);
    if key_severity <= 0.0 {
        return None;
    }

    let evidence = Evidence::gather(frames, |f| {
        f.get(Metric::KneeAngle).map(|_| detector.frame_severity(f))
    });
    if evidence.firing < config.thresholds.evidence_floor() {
        return None;
    }

    let frame = peak_frame(frames, |f| detector.frame_severity(f))?;
    finding(
        detector.flaw_type(),
        window,
        frame,
        key_severity,
        DetectionMethod::KeyMomentDepth,
        evidence.firing,
    )
}

pub struct InsufficientKneeBendDetector<'a> {
    config: &'a DetectorConfig,
}

impl<'a> InsufficientKneeBendDetector<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }
}

impl FlawDetector for InsufficientKneeBendDetector<'_> {
    fn flaw_type(&self) -> FlawType {
        FlawType::InsufficientKneeBend
    }

    fn frame_severity(&self, frame: &FrameMetrics) -> f32 {
        let Some(angle) = frame.get(Metric::KneeAngle) else {
            return 0.0;
        };
        scaled(
            angle - self.config.insufficient_knee_limit(),
            self.config.thresholds.insufficient_knee_scale,
            self.flaw_type().max_severity(),
        )
    }

    fn evaluate(&self, window: &FrameWindow, frames: &[FrameMetrics]) -> Option<FlawFinding> {
        evaluate_knee(self, self.config, window, frames)
    }
}

pub struct ExcessiveKneeBendDetector<'a> {
    config: &'a DetectorConfig,
}

impl<'a> ExcessiveKneeBendDetector<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }
}

impl FlawDetector for ExcessiveKneeBendDetector<'_> {
    fn flaw_type(&self) -> FlawType {
        FlawType::ExcessiveKneeBend
    }

    fn frame_severity(&self, frame: &FrameMetrics) -> f32 {
        let Some(angle) = frame.get(Metric::KneeAngle) else {
            return 0.0;
        };
        scaled(
            self.config.excessive_knee_limit() - angle,
            self.config.thresholds.excessive_knee_scale,
            self.flaw_type().max_severity(),
        )
    }

    fn evaluate(&self, window: &FrameWindow, frames: &[FrameMetrics]) -> Option<FlawFinding> {
        evaluate_knee(self, self.config, window, frames)
    }
}

// ---------------------------------------------------------------------------
// poor_wrist_snap
// ---------------------------------------------------------------------------

pub struct PoorWristSnapDetector<'a> {
    config: &'a DetectorConfig,
}

impl<'a> PoorWristSnapDetector<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }
}

impl FlawDetector for PoorWristSnapDetector<'_> {
    fn flaw_type(&self) -> FlawType {
        FlawType::PoorWristSnap
    }

    fn frame_severity(&self, frame: &FrameMetrics) -> f32 {
        let Some(angle) = frame.get(Metric::WristAngle) else {
            return 0.0;
        };
        if angle >= self.config.wrist_snap_limit() {
            return 0.0;
        }
        let t = &self.config.thresholds;
        scaled(
            self.config.ideal_ranges.wrist.min - angle - t.wrist_snap_offset,
            t.wrist_snap_scale,
            self.flaw_type().max_severity(),
        )
    }

    fn evaluate(&self, window: &FrameWindow, frames: &[FrameMetrics]) -> Option<FlawFinding> {
        let t = &self.config.thresholds;
        let evidence = Evidence::gather(frames, |f| {
            f.get(Metric::WristAngle).map(|_| self.frame_severity(f))
        });
        let frame = peak_frame(frames, |f| self.frame_severity(f))?;

        if evidence.firing >= t.evidence_floor() {
            return finding(
                self.flaw_type(),
                window,
                frame,
                evidence.mean_severity(),
                DetectionMethod::PeakWindow,
                evidence.firing,
            );
        }

        // A lone frame only counts at the key moment and with a clear margin.
        let (peak, severity) = evidence.peak?;
        if Some(peak) == window.key && severity >= t.peak_moment_min_severity {
            return finding(
                self.flaw_type(),
                window,
                peak,
                severity,
                DetectionMethod::PeakMoment,
                1,
            );
        }
        None
    }
}

// ---------------------------------------------------------------------------
// guide hand
// ---------------------------------------------------------------------------

/// Window-wide corroboration over the late Follow-Through, mean severity.
fn evaluate_late(
    detector: &impl FlawDetector,
    config: &DetectorConfig,
    metric: Metric,
    window: &FrameWindow,
    frames: &[FrameMetrics],
) -> Option<FlawFinding> {
    let t = &config.thresholds;
    let evidence = Evidence::gather(frames, |f| f.get(metric).map(|_| detector.frame_severity(f)));
    if !evidence.corroborated(t.corroboration_fraction, t.min_evidence_frames) {
        return None;
    }
    let frame = peak_frame(frames, |f| detector.frame_severity(f))?;
    finding(
        detector.flaw_type(),
        window,
        frame,
        evidence.mean_severity(),
        DetectionMethod::LateFollowThrough,
        evidence.firing,
    )
}

pub struct GuideHandOnTopDetector<'a> {
    config: &'a DetectorConfig,
}

impl<'a> GuideHandOnTopDetector<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }
}

impl FlawDetector for GuideHandOnTopDetector<'_> {
    fn flaw_type(&self) -> FlawType {
        FlawType::GuideHandOnTop
    }

    fn frame_severity(&self, frame: &FrameMetrics) -> f32 {
        let t = &self.config.thresholds;
        frame.get(Metric::GuideHandHeight).map_or(0.0, |v| {
            scaled(v - t.guide_hand_limit, t.guide_hand_scale, self.flaw_type().max_severity())
        })
    }

    fn evaluate(&self, window: &FrameWindow, frames: &[FrameMetrics]) -> Option<FlawFinding> {
        evaluate_late(self, self.config, Metric::GuideHandHeight, window, frames)
    }
}

pub struct ThumbFlickDetector<'a> {
    config: &'a DetectorConfig,
}

impl<'a> ThumbFlickDetector<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }
}

impl FlawDetector for ThumbFlickDetector<'_> {
    fn flaw_type(&self) -> FlawType {
        FlawType::ThumbFlick
    }

    fn frame_severity(&self, frame: &FrameMetrics) -> f32 {
        let t = &self.config.thresholds;
        frame.get(Metric::GuideThumbAngle).map_or(0.0, |v| {
            scaled(v - t.thumb_angle_limit, t.thumb_angle_scale, self.flaw_type().max_severity())
        })
    }

    fn evaluate(&self, window: &FrameWindow, frames: &[FrameMetrics]) -> Option<FlawFinding> {
        evaluate_late(self, self.config, Metric::GuideThumbAngle, window, frames)
    }
}
