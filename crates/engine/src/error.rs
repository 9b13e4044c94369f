use swish_core::PhaseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundaryError {
    #[error("cannot determine shot start: no onset heuristic fired across {frames} frames")]
    ShotStartNotFound { frames: usize },

    #[error("landmark and metric sequences differ in length ({landmarks} vs {metrics})")]
    LengthMismatch { landmarks: usize, metrics: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    #[error("only {available} frames after shot start; at least {required} are needed")]
    NotEnoughFrames { available: usize, required: usize },

    #[error("segmented phases are inconsistent: {0}")]
    Phase(#[from] PhaseError),
}
