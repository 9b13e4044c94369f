//! Swish search crate - illustration frame selection for findings.

pub mod bonus;
pub mod selector;

pub use bonus::{phase_bonus, total_bonus};
pub use selector::{FrameCandidate, FrameSelector, SelectorConfig};
