//! Flaw types and detector findings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PhaseName;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlawType {
    ElbowFlare,
    InsufficientKneeBend,
    ExcessiveKneeBend,
    PoorWristSnap,
    GuideHandOnTop,
    ThumbFlick,
}

impl FlawType {
    pub const ALL: [FlawType; 6] = [
        FlawType::ElbowFlare,
        FlawType::InsufficientKneeBend,
        FlawType::ExcessiveKneeBend,
        FlawType::PoorWristSnap,
        FlawType::GuideHandOnTop,
        FlawType::ThumbFlick,
    ];

    /// Upper bound on the severity any finding of this type may carry.
    pub fn max_severity(self) -> f32 {
        match self {
            Self::ElbowFlare => 50.0,
            Self::InsufficientKneeBend => 40.0,
            Self::ExcessiveKneeBend => 35.0,
            Self::PoorWristSnap => 30.0,
            Self::GuideHandOnTop => 25.0,
            Self::ThumbFlick => 20.0,
        }
    }

    /// The only phase in which this flaw may be evaluated.
    pub fn legal_phase(self) -> PhaseName {
        match self {
            Self::ElbowFlare => PhaseName::Release,
            Self::InsufficientKneeBend | Self::ExcessiveKneeBend => PhaseName::LoadDip,
            Self::PoorWristSnap | Self::GuideHandOnTop | Self::ThumbFlick => {
                PhaseName::FollowThrough
            }
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::ElbowFlare => "elbow_flare",
            Self::InsufficientKneeBend => "insufficient_knee_bend",
            Self::ExcessiveKneeBend => "excessive_knee_bend",
            Self::PoorWristSnap => "poor_wrist_snap",
            Self::GuideHandOnTop => "guide_hand_on_top",
            Self::ThumbFlick => "thumb_flick",
        }
    }
}

impl fmt::Display for FlawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which sub-rule of a detector produced a finding.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    SideViewExtension,
    FrontViewFlare,
    LateralAngle,
    KeyMomentDepth,
    PeakWindow,
    PeakMoment,
    LateFollowThrough,
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct FlawFinding {
    pub flaw_type: FlawType,
    /// Absolute frame chosen to illustrate the flaw.
    pub frame_number: u32,
    pub severity: f32,
    pub phase_name: PhaseName,
    pub detection_method: DetectionMethod,
    pub evidence_frame_count: u32,
}

impl FlawFinding {
    /// Copy of this finding illustrated by a different frame.
    pub fn with_frame(self, frame_number: u32) -> Self {
        Self {
            frame_number,
            ..self
        }
    }

    /// Severity as a fraction of the flaw type's maximum.
    pub fn normalized_severity(&self) -> f32 {
        (self.severity / self.flaw_type.max_severity()).clamp(0.0, 1.0)
    }
}
