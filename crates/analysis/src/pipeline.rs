use serde::{Deserialize, Serialize};
use swish_core::{FlawFinding, FrameLandmarks, PhaseSet};
use swish_engine::{
    BoundaryError, MetricExtractor, OnsetHeuristic, PhaseSegmenter, SegmentError,
    ShotBoundaryDetector,
};
use swish_eval::{DetectorBank, DetectorFault};
use swish_search::FrameSelector;
use thiserror::Error;

use crate::config::{AnalyzerConfig, ConfigError};
use crate::feedback::{form_score, generate_moments, CoachingMoment};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("frame rate must be a positive number, got {0}")]
    InvalidFps(f32),

    #[error("no frames to analyze")]
    NoFrames,

    #[error("frame {next} follows frame {previous}; frames must be strictly increasing")]
    UnorderedFrames { previous: u32, next: u32 },

    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Segment(#[from] SegmentError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub shot_start: u32,
    pub onset_heuristic: OnsetHeuristic,
    pub phases: PhaseSet,
    /// Findings with their illustration frames, in flaw order.
    pub findings: Vec<FlawFinding>,
    pub moments: Vec<CoachingMoment>,
    pub form_score: f32,
    pub frames_analyzed: usize,
    pub detector_faults: Vec<DetectorFault>,
}

pub struct ShotAnalyzer {
    config: AnalyzerConfig,
    extractor: MetricExtractor,
    boundary: ShotBoundaryDetector,
    segmenter: PhaseSegmenter,
    bank: DetectorBank,
    selector: FrameSelector,
}

impl ShotAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: AnalyzerConfig) -> Self {
        Self {
            extractor: MetricExtractor::new(config.extractor.clone()),
            boundary: ShotBoundaryDetector::new(config.boundary.clone()),
            segmenter: PhaseSegmenter::new(config.segment.clone()),
            bank: DetectorBank::new(config.detector.clone()),
            selector: FrameSelector::new(config.selector.clone(), config.detector.clone()),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes one shot clip. `frames` must be ordered by strictly
    /// increasing frame number.
    pub fn analyze(
        &self,
        frames: &[FrameLandmarks],
        fps: f32,
    ) -> Result<AnalysisResult, AnalysisError> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(AnalysisError::InvalidFps(fps));
        }
        if frames.is_empty() {
            return Err(AnalysisError::NoFrames);
        }
        if let Some(pair) = frames
            .windows(2)
            .find(|w| w[1].frame_number <= w[0].frame_number)
        {
            return Err(AnalysisError::UnorderedFrames {
                previous: pair[0].frame_number,
                next: pair[1].frame_number,
            });
        }

        let metrics = self.extractor.extract_all(frames, fps);
        let boundary = self.boundary.detect(frames, &metrics, fps)?;
        let phases = self.segmenter.segment(boundary.start_frame, &metrics, fps)?;

        let report = if self.config.parallel_detectors {
            self.bank.run_parallel(&metrics, &phases)
        } else {
            self.bank.run(&metrics, &phases)
        };
        let findings = self.selector.select_all(&report.findings, &metrics, &phases);
        let moments = generate_moments(&findings);
        let form_score = form_score(&findings);

        tracing::info!(
            "analyzed {} frames: shot start {}, {} findings, {} faults, form score {:.1}",
            frames.len(),
            boundary.start_frame,
            findings.len(),
            report.faults.len(),
            form_score
        );

        Ok(AnalysisResult {
            shot_start: boundary.start_frame,
            onset_heuristic: boundary.chosen,
            phases,
            findings,
            moments,
            form_score,
            frames_analyzed: frames.len(),
            detector_faults: report.faults,
        })
    }
}

impl Default for ShotAnalyzer {
    fn default() -> Self {
        Self::build(AnalyzerConfig::default())
    }
}

/// Analyzes with the default configuration.
pub fn analyze_shot(frames: &[FrameLandmarks], fps: f32) -> Result<AnalysisResult, AnalysisError> {
    ShotAnalyzer::default().analyze(frames, fps)
}
