use serde::{Deserialize, Serialize};
use swish_core::{FlawFinding, FlawType, PhaseName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Minor,
    Moderate,
    Major,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingMoment {
    pub frame: u32,
    pub flaw_type: FlawType,
    pub phase_name: PhaseName,
    pub band: SeverityBand,
    pub description: String,
    pub suggestion: String,
    pub impact: f32,
}

/// One coaching moment per finding, ordered by frame.
pub fn generate_moments(findings: &[FlawFinding]) -> Vec<CoachingMoment> {
    let mut moments: Vec<CoachingMoment> = findings
        .iter()
        .map(|f| CoachingMoment {
            frame: f.frame_number,
            flaw_type: f.flaw_type,
            phase_name: f.phase_name,
            band: classify_severity(f.normalized_severity()),
            description: describe(f),
            suggestion: suggest(f.flaw_type).to_string(),
            impact: f.severity,
        })
        .collect();

    moments.sort_by_key(|m| (m.frame, m.flaw_type));
    moments
}

/// 100 minus up to 20 points per finding, scaled by how close each finding
/// is to its flaw type's maximum severity.
pub fn form_score(findings: &[FlawFinding]) -> f32 {
    let penalty: f32 = findings.iter().map(|f| f.normalized_severity() * 20.0).sum();
    (100.0 - penalty).clamp(0.0, 100.0)
}

fn classify_severity(normalized: f32) -> SeverityBand {
    if normalized.is_nan() || normalized < 0.34 {
        SeverityBand::Minor
    } else if normalized < 0.67 {
        SeverityBand::Moderate
    } else {
        SeverityBand::Major
    }
}

fn describe(f: &FlawFinding) -> String {
    let what = match f.flaw_type {
        FlawType::ElbowFlare => "Shooting elbow drifts out of line",
        FlawType::InsufficientKneeBend => "Knees barely bend in the dip",
        FlawType::ExcessiveKneeBend => "Knees sink too deep in the dip",
        FlawType::PoorWristSnap => "Wrist stays stiff through the release",
        FlawType::GuideHandOnTop => "Guide hand rides over the ball",
        FlawType::ThumbFlick => "Guide thumb flicks the ball",
    };
    format!(
        "{} during {} (frame {}, severity {:.0})",
        what, f.phase_name, f.frame_number, f.severity
    )
}

fn suggest(flaw: FlawType) -> &'static str {
    match flaw {
        FlawType::ElbowFlare => "Keep the elbow under the ball and extend straight toward the rim",
        FlawType::InsufficientKneeBend => "Sit into the shot; power starts from the legs",
        FlawType::ExcessiveKneeBend => "Dip to a comfortable depth so the lift stays quick",
        FlawType::PoorWristSnap => "Finish with the wrist relaxed and fingers pointing down",
        FlawType::GuideHandOnTop => "Keep the guide hand on the side of the ball",
        FlawType::ThumbFlick => "Let the guide hand come off the ball without pushing",
    }
}
