use serde::{Deserialize, Serialize};
use swish_core::{FlawType, PhaseName};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectorError {
    #[error("{phase} has no key moment")]
    MissingKeyMoment { phase: PhaseName },

    #[error("{flaw} detector panicked: {message}")]
    Panicked { flaw: FlawType, message: String },
}

/// A detector that failed during a bank run. The rest of the bank is
/// unaffected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorFault {
    pub flaw_type: FlawType,
    pub message: String,
}

impl DetectorFault {
    pub fn new(flaw_type: FlawType, error: &DetectorError) -> Self {
        Self {
            flaw_type,
            message: error.to_string(),
        }
    }
}
