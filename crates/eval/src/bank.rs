//! The detector bank: every flaw detector, each behind its own error
//! boundary.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use swish_core::{FlawFinding, FlawType, FrameMetrics, PhaseSet};

use crate::config::DetectorConfig;
use crate::detectors;
use crate::error::{DetectorError, DetectorFault};
use crate::window::legal_window;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BankReport {
    /// Findings in [`FlawType::ALL`] order.
    pub findings: Vec<FlawFinding>,
    pub faults: Vec<DetectorFault>,
}

pub struct DetectorBank {
    pub config: DetectorConfig,
}

impl DetectorBank {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Runs a single detector over its legal window. Panics inside the
    /// detector are caught and returned as [`DetectorError::Panicked`].
    pub fn run_one(
        &self,
        flaw: FlawType,
        metrics: &[FrameMetrics],
        phases: &PhaseSet,
    ) -> Result<Option<FlawFinding>, DetectorError> {
        isolate(flaw, || {
            let window = legal_window(flaw, phases, &self.config.thresholds)?;
            let frames = window.slice(metrics);
            Ok(detectors::evaluate(flaw, &self.config, &window, frames))
        })
    }

    /// Runs every detector in turn.
    pub fn run(&self, metrics: &[FrameMetrics], phases: &PhaseSet) -> BankReport {
        let results: Vec<_> = FlawType::ALL
            .iter()
            .map(|&flaw| (flaw, self.run_one(flaw, metrics, phases)))
            .collect();
        collect_report(results)
    }

    /// Runs every detector on the rayon pool. Same result as [`Self::run`].
    pub fn run_parallel(&self, metrics: &[FrameMetrics], phases: &PhaseSet) -> BankReport {
        let results: Vec<_> = FlawType::ALL
            .par_iter()
            .map(|&flaw| (flaw, self.run_one(flaw, metrics, phases)))
            .collect();
        collect_report(results)
    }
}

impl Default for DetectorBank {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

fn collect_report(
    results: Vec<(FlawType, Result<Option<FlawFinding>, DetectorError>)>,
) -> BankReport {
    let mut report = BankReport::default();
    for (flaw, result) in results {
        match result {
            Ok(Some(finding)) => {
                tracing::debug!(
                    "{} at frame {} severity {:.1} ({:?})",
                    flaw,
                    finding.frame_number,
                    finding.severity,
                    finding.detection_method
                );
                report.findings.push(finding);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("{} detector skipped: {}", flaw, e);
                report.faults.push(DetectorFault::new(flaw, &e));
            }
        }
    }
    report
}

/// Runs `f`, turning a panic into a [`DetectorError`].
fn isolate<T>(
    flaw: FlawType,
    f: impl FnOnce() -> Result<T, DetectorError>,
) -> Result<T, DetectorError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(DetectorError::Panicked { flaw, message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swish_core::{Metric, PhaseName, ShotPhase};

    fn phases() -> PhaseSet {
        PhaseSet::new(
            ShotPhase::new(PhaseName::Setup, 0, 9),
            ShotPhase::new(PhaseName::LoadDip, 10, 25).with_key_moment(24),
            ShotPhase::new(PhaseName::Release, 26, 34).with_key_moment(29),
            ShotPhase::new(PhaseName::FollowThrough, 28, 40).with_key_moment(31),
        )
        .expect("valid phases")
    }

    /// Bent elbow and shallow knee throughout, thumb flicking late.
    fn metrics() -> Vec<FrameMetrics> {
        (0..45)
            .map(|i| {
                FrameMetrics::new(i)
                    .with(Metric::ElbowAngle, 120.0)
                    .with(Metric::KneeAngle, 150.0)
                    .with(Metric::WristAngle, 80.0)
                    .with(Metric::GuideThumbAngle, if i >= 36 { 70.0 } else { 20.0 })
            })
            .collect()
    }

    #[test]
    fn test_run_collects_in_flaw_order() {
        let report = DetectorBank::default().run(&metrics(), &phases());
        let flaws: Vec<FlawType> = report.findings.iter().map(|f| f.flaw_type).collect();
        assert_eq!(
            flaws,
            vec![
                FlawType::ElbowFlare,
                FlawType::InsufficientKneeBend,
                FlawType::ThumbFlick
            ]
        );
        assert!(report.faults.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let bank = DetectorBank::default();
        assert_eq!(
            bank.run(&metrics(), &phases()),
            bank.run_parallel(&metrics(), &phases())
        );
    }

    #[test]
    fn test_findings_stay_inside_legal_windows() {
        let bank = DetectorBank::default();
        let set = phases();
        for finding in bank.run(&metrics(), &set).findings {
            let window = legal_window(finding.flaw_type, &set, &bank.config.thresholds)
                .expect("window");
            assert!(window.contains(finding.frame_number));
            assert!(finding.severity > 0.0);
            assert!(finding.severity <= finding.flaw_type.max_severity());
        }
    }

    fn wrist_angles(bad: impl Fn(u32) -> bool) -> Vec<FrameMetrics> {
        (0..45)
            .map(|i| {
                let angle = if bad(i) { 30.0 } else { 80.0 };
                FrameMetrics::new(i).with(Metric::WristAngle, angle)
            })
            .collect()
    }

    #[test]
    fn test_poor_wrist_outside_key_window_is_ignored() {
        // Follow-Through key 31: only frames 29..=33 are judged.
        let metrics = wrist_angles(|i| !(29..=33).contains(&i));
        let report = DetectorBank::default().run(&metrics, &phases());
        assert!(report
            .findings
            .iter()
            .all(|f| f.flaw_type != FlawType::PoorWristSnap));
        assert!(report.faults.is_empty());

        let metrics = wrist_angles(|i| (29..=33).contains(&i));
        let report = DetectorBank::default().run(&metrics, &phases());
        assert!(report
            .findings
            .iter()
            .any(|f| f.flaw_type == FlawType::PoorWristSnap));
    }

    #[test]
    fn test_missing_key_moment_is_isolated() {
        let set = PhaseSet::new(
            ShotPhase::new(PhaseName::Setup, 0, 9),
            ShotPhase::new(PhaseName::LoadDip, 10, 25),
            ShotPhase::new(PhaseName::Release, 26, 34).with_key_moment(29),
            ShotPhase::new(PhaseName::FollowThrough, 28, 40).with_key_moment(31),
        )
        .expect("valid phases");
        let report = DetectorBank::default().run(&metrics(), &set);

        let faulted: Vec<FlawType> = report.faults.iter().map(|f| f.flaw_type).collect();
        assert_eq!(
            faulted,
            vec![FlawType::InsufficientKneeBend, FlawType::ExcessiveKneeBend]
        );
        // The remaining detectors still ran.
        assert!(report.findings.iter().any(|f| f.flaw_type == FlawType::ElbowFlare));
    }

    #[test]
    fn test_isolate_catches_panics() {
        let result: Result<(), DetectorError> = isolate(FlawType::ThumbFlick, || {
            panic!("index out of range");
        });
        assert_eq!(
            result,
            Err(DetectorError::Panicked {
                flaw: FlawType::ThumbFlick,
                message: "index out of range".to_string(),
            })
        );
    }

    #[test]
    fn test_isolate_passes_results_through() {
        let result = isolate(FlawType::ElbowFlare, || Ok(7));
        assert_eq!(result, Ok(7));
    }
}
