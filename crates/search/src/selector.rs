use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use swish_core::{FlawFinding, FrameMetrics, PhaseSet};
use swish_eval::{frame_severity, legal_window, DetectorConfig, DetectorError};

use crate::bonus::total_bonus;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Weight of a frame's local severity against its phase bonus.
    pub severity_weight: f32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            severity_weight: 2.0,
        }
    }
}

/// A scored candidate frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameCandidate {
    pub frame_number: u32,
    pub bonus: f32,
    pub local_severity: f32,
    pub score: f32,
}

/// Picks the most instructive frame to illustrate each finding.
pub struct FrameSelector {
    pub config: SelectorConfig,
    pub detector: DetectorConfig,
}

impl FrameSelector {
    pub fn new(config: SelectorConfig, detector: DetectorConfig) -> Self {
        Self { config, detector }
    }

    /// Every frame the finding may be illustrated with, best first. Equal
    /// scores keep frame order.
    pub fn rank(
        &self,
        finding: &FlawFinding,
        metrics: &[FrameMetrics],
        phases: &PhaseSet,
    ) -> Result<Vec<FrameCandidate>, DetectorError> {
        let flaw = finding.flaw_type;
        let window = legal_window(flaw, phases, &self.detector.thresholds)?;

        let mut candidates: Vec<FrameCandidate> = window
            .slice(metrics)
            .iter()
            .map(|frame| {
                let bonus = total_bonus(flaw, &phases.memberships(frame.frame_number));
                let local_severity = frame_severity(flaw, &self.detector, frame);
                FrameCandidate {
                    frame_number: frame.frame_number,
                    bonus,
                    local_severity,
                    score: bonus + self.config.severity_weight * local_severity,
                }
            })
            .collect();

        candidates.sort_by(|a, b| score_cmp(a.score, b.score));
        Ok(candidates)
    }

    /// Copy of `finding` moved to its best illustration frame. Only
    /// `frame_number` changes. A window without metrics keeps the original
    /// frame.
    pub fn select(
        &self,
        finding: &FlawFinding,
        metrics: &[FrameMetrics],
        phases: &PhaseSet,
    ) -> Result<FlawFinding, DetectorError> {
        let best = self.rank(finding, metrics, phases)?.into_iter().next();
        Ok(match best {
            Some(candidate) => {
                if candidate.frame_number != finding.frame_number {
                    tracing::debug!(
                        "{} illustrated by frame {} instead of {} (score {:.1})",
                        finding.flaw_type,
                        candidate.frame_number,
                        finding.frame_number,
                        candidate.score
                    );
                }
                finding.with_frame(candidate.frame_number)
            }
            None => *finding,
        })
    }

    /// Selects frames for every finding. Findings whose window cannot be
    /// built keep their detector frame.
    pub fn select_all(
        &self,
        findings: &[FlawFinding],
        metrics: &[FrameMetrics],
        phases: &PhaseSet,
    ) -> Vec<FlawFinding> {
        findings
            .iter()
            .map(|finding| {
                self.select(finding, metrics, phases).unwrap_or_else(|e| {
                    tracing::warn!("keeping detector frame for {}: {}", finding.flaw_type, e);
                    *finding
                })
            })
            .collect()
    }
}

impl Default for FrameSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default(), DetectorConfig::default())
    }
}

fn score_cmp(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swish_core::{DetectionMethod, FlawType, Metric, PhaseName, ShotPhase};

    fn phases() -> PhaseSet {
        PhaseSet::new(
            ShotPhase::new(PhaseName::Setup, 0, 9),
            ShotPhase::new(PhaseName::LoadDip, 10, 25).with_key_moment(24),
            ShotPhase::new(PhaseName::Release, 26, 34).with_key_moment(29),
            ShotPhase::new(PhaseName::FollowThrough, 28, 40).with_key_moment(31),
        )
        .expect("valid phases")
    }

    fn finding(flaw_type: FlawType, frame_number: u32, phase_name: PhaseName) -> FlawFinding {
        FlawFinding {
            flaw_type,
            frame_number,
            severity: 20.0,
            phase_name,
            detection_method: DetectionMethod::SideViewExtension,
            evidence_frame_count: 9,
        }
    }

    fn constant(metric: Metric, value: f32) -> Vec<FrameMetrics> {
        (0..45).map(|i| FrameMetrics::new(i).with(metric, value)).collect()
    }

    #[test]
    fn test_ties_go_to_earliest_frame() {
        // Progress 0.5..0.875 all earn the top Release bonus.
        let metrics = constant(Metric::ElbowAngle, 120.0);
        let selected = FrameSelector::default()
            .select(&finding(FlawType::ElbowFlare, 26, PhaseName::Release), &metrics, &phases())
            .expect("selection");
        assert_eq!(selected.frame_number, 30);
    }

    #[test]
    fn test_only_frame_number_changes() {
        let metrics = constant(Metric::ElbowAngle, 120.0);
        let original = finding(FlawType::ElbowFlare, 26, PhaseName::Release);
        let selected = FrameSelector::default()
            .select(&original, &metrics, &phases())
            .expect("selection");
        assert_eq!(selected, original.with_frame(selected.frame_number));
    }

    #[test]
    fn test_local_severity_can_outweigh_bonus() {
        let mut metrics = constant(Metric::ElbowAngle, 130.0);
        // Early Release frame with a much worse elbow.
        metrics[27] = FrameMetrics::new(27).with(Metric::ElbowAngle, 110.0);
        let selected = FrameSelector::default()
            .select(&finding(FlawType::ElbowFlare, 30, PhaseName::Release), &metrics, &phases())
            .expect("selection");
        // 10 + 2 * 45 beats 30 + 2 * 15.
        assert_eq!(selected.frame_number, 27);
    }

    #[test]
    fn test_selection_stays_in_legal_window() {
        let set = phases();
        let selector = FrameSelector::default();
        let metrics: Vec<FrameMetrics> = (0..45)
            .map(|i| {
                FrameMetrics::new(i)
                    .with(Metric::KneeAngle, 100.0 + i as f32)
                    .with(Metric::WristAngle, 30.0)
                    .with(Metric::GuideHandHeight, 40.0)
                    .with(Metric::GuideThumbAngle, 80.0)
            })
            .collect();

        for flaw in FlawType::ALL {
            let phase = flaw.legal_phase();
            let original = finding(flaw, set.get(phase).start_frame, phase);
            let selected = selector.select(&original, &metrics, &set).expect("selection");
            let window = legal_window(flaw, &set, &selector.detector.thresholds).expect("window");
            assert!(
                window.contains(selected.frame_number),
                "{flaw} at {}",
                selected.frame_number
            );
        }
    }

    #[test]
    fn test_rank_orders_best_first() {
        let metrics = constant(Metric::GuideHandHeight, 30.0);
        let original = finding(FlawType::GuideHandOnTop, 36, PhaseName::FollowThrough);
        let ranked = FrameSelector::default()
            .rank(&original, &metrics, &phases())
            .expect("ranking");
        // Late window 36..=40; progress 0.75 is reached at frame 37.
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].frame_number, 37);
        assert_eq!(ranked.last().map(|c| c.frame_number), Some(36));
    }

    #[test]
    fn test_missing_window_keeps_frame_in_select_all() {
        let set = PhaseSet::new(
            ShotPhase::new(PhaseName::Setup, 0, 9),
            ShotPhase::new(PhaseName::LoadDip, 10, 25),
            ShotPhase::new(PhaseName::Release, 26, 34),
            ShotPhase::new(PhaseName::FollowThrough, 28, 40),
        )
        .expect("valid phases");
        let original = finding(FlawType::ExcessiveKneeBend, 20, PhaseName::LoadDip);
        let metrics = constant(Metric::KneeAngle, 90.0);
        let selected = FrameSelector::default().select_all(&[original], &metrics, &set);
        assert_eq!(selected, vec![original]);
    }

    #[test]
    fn test_empty_window_keeps_frame() {
        let original = finding(FlawType::ElbowFlare, 30, PhaseName::Release);
        let selected = FrameSelector::default()
            .select(&original, &[], &phases())
            .expect("selection");
        assert_eq!(selected, original);
    }
}
