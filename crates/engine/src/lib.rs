//! swish-engine - per-frame metrics, shot boundary, and phase segmentation.
//!
//! Turns raw pose landmarks into named metrics, finds where the shooting
//! motion begins, and splits the shot into its four phases.

pub mod angles;
pub mod boundary;
pub mod config;
pub mod error;
pub mod extract;
pub mod segment;

pub use angles::{
    checked_joint_angle, flare_ratio, joint_angle, lateral_angle, wrist_snap_angle,
};
pub use boundary::{OnsetEstimate, OnsetHeuristic, ShotBoundary, ShotBoundaryDetector};
pub use config::{secs_to_frames, BoundaryConfig, ExtractorConfig, SegmentConfig};
pub use error::{BoundaryError, SegmentError};
pub use extract::MetricExtractor;
pub use segment::{PhaseSegmenter, MIN_SHOT_FRAMES};
