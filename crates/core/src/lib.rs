//! Swish core crate - fundamental types for shot analysis.

mod flaw;
mod joint;
mod landmarks;
mod metrics;
mod phase;

pub use flaw::{DetectionMethod, FlawFinding, FlawType};
pub use joint::{Joint, Side};
pub use landmarks::{FrameLandmarks, Landmark, Point, DEFAULT_VISIBILITY_FLOOR};
pub use metrics::{frames_in_range, FrameMetrics, Metric};
pub use phase::{PhaseError, PhaseMembership, PhaseName, PhaseSet, ShotPhase};
