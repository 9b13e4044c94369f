//! Swish eval crate - flaw detectors over phase-scoped metrics.

pub mod bank;
pub mod config;
pub mod detectors;
pub mod error;
pub mod window;

pub use bank::{BankReport, DetectorBank};
pub use config::{DetectorConfig, FlawThresholds, IdealRange, IdealRanges, MIN_EVIDENCE_FRAMES};
pub use detectors::{frame_severity, FlawDetector};
pub use error::{DetectorError, DetectorFault};
pub use window::{legal_window, FrameWindow};
