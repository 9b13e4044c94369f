//! Biomechanical shot phases.
//!
//! A shot is always described by exactly four phases in the fixed order
//! Setup, Load/Dip, Release, Follow-Through. Release and Follow-Through are
//! allowed to share frames so the transition out of the release is never
//! lost; every other pair of phases is disjoint. [`PhaseSet::new`] enforces
//! this at construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PhaseName {
    Setup,
    #[serde(rename = "Load/Dip")]
    LoadDip,
    Release,
    #[serde(rename = "Follow-Through")]
    FollowThrough,
}

impl PhaseName {
    pub const ALL: [PhaseName; 4] = [
        PhaseName::Setup,
        PhaseName::LoadDip,
        PhaseName::Release,
        PhaseName::FollowThrough,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Setup => "Setup",
            Self::LoadDip => "Load/Dip",
            Self::Release => "Release",
            Self::FollowThrough => "Follow-Through",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Setup => 0,
            Self::LoadDip => 1,
            Self::Release => 2,
            Self::FollowThrough => 3,
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named, inclusive frame interval.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct ShotPhase {
    pub name: PhaseName,
    pub start_frame: u32,
    pub end_frame: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_moment_frame: Option<u32>,
}

impl ShotPhase {
    pub fn new(name: PhaseName, start_frame: u32, end_frame: u32) -> Self {
        Self {
            name,
            start_frame,
            end_frame,
            key_moment_frame: None,
        }
    }

    pub fn with_key_moment(mut self, frame: u32) -> Self {
        self.key_moment_frame = Some(frame);
        self
    }

    pub fn contains(&self, frame: u32) -> bool {
        frame >= self.start_frame && frame <= self.end_frame
    }

    pub fn len(&self) -> u32 {
        self.end_frame.saturating_sub(self.start_frame) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end_frame < self.start_frame
    }

    /// Position of `frame` inside the phase in `[0, 1]`, `None` outside it.
    ///
    /// A single-frame phase reports 1.0.
    pub fn progress(&self, frame: u32) -> Option<f32> {
        if !self.contains(frame) {
            return None;
        }
        let span = self.end_frame - self.start_frame;
        if span == 0 {
            return Some(1.0);
        }
        Some((frame - self.start_frame) as f32 / span as f32)
    }

    fn overlaps(&self, other: &ShotPhase) -> bool {
        self.start_frame <= other.end_frame && other.start_frame <= self.end_frame
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhaseError {
    #[error("expected 4 phases, got {0}")]
    WrongCount(usize),

    #[error("phase slot {slot} holds {found}, expected {expected}")]
    OutOfOrder {
        slot: usize,
        expected: PhaseName,
        found: PhaseName,
    },

    #[error("{phase} ends at frame {end} before it starts at frame {start}")]
    Inverted { phase: PhaseName, start: u32, end: u32 },

    #[error("{phase} key moment {key} lies outside {start}..={end}")]
    KeyMomentOutside {
        phase: PhaseName,
        key: u32,
        start: u32,
        end: u32,
    },

    #[error("{later} starts at frame {later_start} before {earlier} at frame {earlier_start}")]
    DecreasingStart {
        earlier: PhaseName,
        earlier_start: u32,
        later: PhaseName,
        later_start: u32,
    },

    #[error("{first} and {second} overlap; only Release and Follow-Through may share frames")]
    IllegalOverlap { first: PhaseName, second: PhaseName },
}

/// Which phase a frame belongs to and how far through it the frame is.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct PhaseMembership {
    pub phase: PhaseName,
    pub progress: f32,
}

/// The four phases of one shot, validated on construction.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(into = "Vec<ShotPhase>", try_from = "Vec<ShotPhase>")]
pub struct PhaseSet {
    phases: [ShotPhase; 4],
}

impl PhaseSet {
    pub fn new(
        setup: ShotPhase,
        load_dip: ShotPhase,
        release: ShotPhase,
        follow_through: ShotPhase,
    ) -> Result<Self, PhaseError> {
        let phases = [setup, load_dip, release, follow_through];

        for (slot, (phase, expected)) in phases.iter().zip(PhaseName::ALL).enumerate() {
            if phase.name != expected {
                return Err(PhaseError::OutOfOrder {
                    slot,
                    expected,
                    found: phase.name,
                });
            }
            if phase.end_frame < phase.start_frame {
                return Err(PhaseError::Inverted {
                    phase: phase.name,
                    start: phase.start_frame,
                    end: phase.end_frame,
                });
            }
            if let Some(key) = phase.key_moment_frame {
                if !phase.contains(key) {
                    return Err(PhaseError::KeyMomentOutside {
                        phase: phase.name,
                        key,
                        start: phase.start_frame,
                        end: phase.end_frame,
                    });
                }
            }
        }

        for pair in phases.windows(2) {
            if pair[1].start_frame < pair[0].start_frame {
                return Err(PhaseError::DecreasingStart {
                    earlier: pair[0].name,
                    earlier_start: pair[0].start_frame,
                    later: pair[1].name,
                    later_start: pair[1].start_frame,
                });
            }
        }

        for i in 0..phases.len() {
            for j in (i + 1)..phases.len() {
                if may_overlap(phases[i].name, phases[j].name) {
                    continue;
                }
                if phases[i].overlaps(&phases[j]) {
                    return Err(PhaseError::IllegalOverlap {
                        first: phases[i].name,
                        second: phases[j].name,
                    });
                }
            }
        }

        Ok(Self { phases })
    }

    pub fn get(&self, name: PhaseName) -> &ShotPhase {
        &self.phases[name.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShotPhase> {
        self.phases.iter()
    }

    pub fn first_frame(&self) -> u32 {
        self.phases[0].start_frame
    }

    pub fn last_frame(&self) -> u32 {
        self.phases
            .iter()
            .map(|p| p.end_frame)
            .max()
            .unwrap_or(self.phases[0].end_frame)
    }

    /// Every phase containing `frame`, in phase order.
    pub fn memberships(&self, frame: u32) -> SmallVec<[PhaseMembership; 2]> {
        self.phases
            .iter()
            .filter_map(|p| {
                p.progress(frame).map(|progress| PhaseMembership {
                    phase: p.name,
                    progress,
                })
            })
            .collect()
    }
}

impl From<PhaseSet> for Vec<ShotPhase> {
    fn from(set: PhaseSet) -> Self {
        set.phases.to_vec()
    }
}

impl TryFrom<Vec<ShotPhase>> for PhaseSet {
    type Error = PhaseError;

    fn try_from(phases: Vec<ShotPhase>) -> Result<Self, Self::Error> {
        match <[ShotPhase; 4]>::try_from(phases) {
            Ok([setup, load_dip, release, follow_through]) => {
                PhaseSet::new(setup, load_dip, release, follow_through)
            }
            Err(v) => Err(PhaseError::WrongCount(v.len())),
        }
    }
}

fn may_overlap(a: PhaseName, b: PhaseName) -> bool {
    matches!(
        (a, b),
        (PhaseName::Release, PhaseName::FollowThrough)
            | (PhaseName::FollowThrough, PhaseName::Release)
    )
}
