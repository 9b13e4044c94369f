//! Swish analysis crate - end-to-end shot analysis and coaching feedback.

mod config;
mod feedback;
mod pipeline;
pub mod synthetic;

pub use config::{validate_unit_range, AnalyzerConfig, ConfigError};
pub use feedback::{form_score, generate_moments, CoachingMoment, SeverityBand};
pub use pipeline::{analyze_shot, AnalysisError, AnalysisResult, ShotAnalyzer};
