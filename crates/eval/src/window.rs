//! Legal evaluation windows.
//!
//! Each flaw type may only be judged on frames inside its window. The
//! detector and the frame selector both use [`legal_window`], so a chosen
//! illustration frame can never fall outside the frames that produced the
//! finding.

use serde::{Deserialize, Serialize};
use swish_core::{frames_in_range, FlawType, FrameMetrics, PhaseName, PhaseSet, ShotPhase};

use crate::config::FlawThresholds;
use crate::error::DetectorError;

/// Inclusive frame range inside a single phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameWindow {
    pub phase: PhaseName,
    pub start: u32,
    pub end: u32,
    /// Key moment of the owning phase, when the window is anchored on it.
    pub key: Option<u32>,
}

impl FrameWindow {
    pub fn contains(&self, frame: u32) -> bool {
        frame >= self.start && frame <= self.end
    }

    /// The metrics whose frames fall inside the window.
    pub fn slice<'a>(&self, metrics: &'a [FrameMetrics]) -> &'a [FrameMetrics] {
        frames_in_range(metrics, self.start, self.end)
    }
}

pub fn legal_window(
    flaw: FlawType,
    phases: &PhaseSet,
    thresholds: &FlawThresholds,
) -> Result<FrameWindow, DetectorError> {
    let phase = phases.get(flaw.legal_phase());
    match flaw {
        FlawType::ElbowFlare => Ok(whole(phase)),
        FlawType::InsufficientKneeBend | FlawType::ExcessiveKneeBend => {
            around_key(phase, thresholds.knee_window_frames)
        }
        FlawType::PoorWristSnap => around_key(phase, thresholds.wrist_window_frames),
        FlawType::GuideHandOnTop | FlawType::ThumbFlick => {
            Ok(late(phase, thresholds.late_follow_through_progress))
        }
    }
}

fn whole(phase: &ShotPhase) -> FrameWindow {
    FrameWindow {
        phase: phase.name,
        start: phase.start_frame,
        end: phase.end_frame,
        key: phase.key_moment_frame,
    }
}

fn around_key(phase: &ShotPhase, radius: u32) -> Result<FrameWindow, DetectorError> {
    let key = phase
        .key_moment_frame
        .ok_or(DetectorError::MissingKeyMoment { phase: phase.name })?;
    Ok(FrameWindow {
        phase: phase.name,
        start: key.saturating_sub(radius).max(phase.start_frame),
        end: key.saturating_add(radius).min(phase.end_frame),
        key: Some(key),
    })
}

/// Frames whose progress through `phase` is at least `min_progress`.
fn late(phase: &ShotPhase, min_progress: f32) -> FrameWindow {
    let start = (phase.start_frame..=phase.end_frame)
        .find(|&f| phase.progress(f).is_some_and(|p| p >= min_progress))
        .unwrap_or(phase.end_frame);
    FrameWindow {
        start,
        ..whole(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases() -> PhaseSet {
        PhaseSet::new(
            ShotPhase::new(PhaseName::Setup, 0, 9),
            ShotPhase::new(PhaseName::LoadDip, 10, 25).with_key_moment(24),
            ShotPhase::new(PhaseName::Release, 26, 34).with_key_moment(29),
            ShotPhase::new(PhaseName::FollowThrough, 28, 38).with_key_moment(30),
        )
        .expect("valid phases")
    }

    fn window(flaw: FlawType) -> FrameWindow {
        legal_window(flaw, &phases(), &FlawThresholds::default()).expect("window")
    }

    #[test]
    fn test_elbow_flare_uses_whole_release() {
        let w = window(FlawType::ElbowFlare);
        assert_eq!((w.phase, w.start, w.end), (PhaseName::Release, 26, 34));
    }

    #[test]
    fn test_knee_window_clipped_to_load_dip() {
        let w = window(FlawType::InsufficientKneeBend);
        assert_eq!((w.start, w.end, w.key), (21, 25, Some(24)));
        assert_eq!(window(FlawType::ExcessiveKneeBend), w);
    }

    #[test]
    fn test_wrist_window_around_follow_through_key() {
        let w = window(FlawType::PoorWristSnap);
        assert_eq!((w.phase, w.start, w.end), (PhaseName::FollowThrough, 28, 32));
    }

    #[test]
    fn test_guide_hand_window_is_late_follow_through() {
        // 10-frame span: progress 0.6 is reached at frame 34.
        let w = window(FlawType::GuideHandOnTop);
        assert_eq!((w.start, w.end), (34, 38));
        assert_eq!(window(FlawType::ThumbFlick), w);
    }

    #[test]
    fn test_missing_key_moment_is_an_error() {
        let set = PhaseSet::new(
            ShotPhase::new(PhaseName::Setup, 0, 9),
            ShotPhase::new(PhaseName::LoadDip, 10, 25),
            ShotPhase::new(PhaseName::Release, 26, 34),
            ShotPhase::new(PhaseName::FollowThrough, 28, 38),
        )
        .expect("valid phases");
        let err = legal_window(FlawType::ExcessiveKneeBend, &set, &FlawThresholds::default())
            .unwrap_err();
        assert_eq!(err, DetectorError::MissingKeyMoment { phase: PhaseName::LoadDip });
    }

    #[test]
    fn test_single_frame_follow_through_is_late() {
        let set = PhaseSet::new(
            ShotPhase::new(PhaseName::Setup, 0, 0),
            ShotPhase::new(PhaseName::LoadDip, 1, 1).with_key_moment(1),
            ShotPhase::new(PhaseName::Release, 2, 2).with_key_moment(2),
            ShotPhase::new(PhaseName::FollowThrough, 2, 2).with_key_moment(2),
        )
        .expect("valid phases");
        let w = legal_window(FlawType::ThumbFlick, &set, &FlawThresholds::default())
            .expect("window");
        assert_eq!((w.start, w.end), (2, 2));
    }
}
