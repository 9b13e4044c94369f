//! Phase/progress bonus tables for illustration frames.
//!
//! A flaw is often easiest to see a little way into a phase rather than at
//! its numeric peak. These tables steer the selector toward those frames
//! and away from late frames where the arm is already coming down.

use swish_core::{FlawType, PhaseMembership, PhaseName};

/// Bonus for one phase membership of a candidate frame.
pub fn phase_bonus(flaw: FlawType, membership: PhaseMembership) -> f32 {
    let p = membership.progress;
    match flaw {
        FlawType::ElbowFlare => match membership.phase {
            PhaseName::Release if p < 0.4 => 10.0,
            PhaseName::Release if p < 0.9 => 30.0,
            PhaseName::Release => 5.0,
            PhaseName::FollowThrough if p >= 0.6 => -25.0,
            _ => 0.0,
        },
        FlawType::InsufficientKneeBend | FlawType::ExcessiveKneeBend => match membership.phase {
            PhaseName::LoadDip if p >= 0.8 => 30.0,
            PhaseName::LoadDip if p >= 0.5 => 10.0,
            _ => 0.0,
        },
        FlawType::PoorWristSnap => match membership.phase {
            PhaseName::FollowThrough if p < 0.2 => 0.0,
            PhaseName::FollowThrough if p < 0.6 => 25.0,
            PhaseName::FollowThrough => 10.0,
            PhaseName::Release if p >= 0.8 => -10.0,
            _ => 0.0,
        },
        FlawType::GuideHandOnTop => match membership.phase {
            PhaseName::FollowThrough if p >= 0.75 => 35.0,
            PhaseName::FollowThrough if p >= 0.6 => 15.0,
            _ => 0.0,
        },
        FlawType::ThumbFlick => match membership.phase {
            PhaseName::FollowThrough if p >= 0.8 => 35.0,
            PhaseName::FollowThrough if p >= 0.6 => 10.0,
            _ => 0.0,
        },
    }
}

/// Sum of bonuses over every phase the frame belongs to.
pub fn total_bonus(flaw: FlawType, memberships: &[PhaseMembership]) -> f32 {
    memberships.iter().map(|&m| phase_bonus(flaw, m)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(phase: PhaseName, progress: f32) -> PhaseMembership {
        PhaseMembership { phase, progress }
    }

    #[test]
    fn test_elbow_flare_prefers_mid_release() {
        assert_eq!(phase_bonus(FlawType::ElbowFlare, at(PhaseName::Release, 0.1)), 10.0);
        assert_eq!(phase_bonus(FlawType::ElbowFlare, at(PhaseName::Release, 0.4)), 30.0);
        assert_eq!(phase_bonus(FlawType::ElbowFlare, at(PhaseName::Release, 0.95)), 5.0);
        assert_eq!(phase_bonus(FlawType::ElbowFlare, at(PhaseName::Release, 1.0)), 5.0);
    }

    #[test]
    fn test_late_follow_through_penalizes_elbow_flare() {
        let overlap = [at(PhaseName::Release, 0.95), at(PhaseName::FollowThrough, 0.7)];
        assert_eq!(total_bonus(FlawType::ElbowFlare, &overlap), -20.0);
    }

    #[test]
    fn test_knee_bonus_near_deepest_point() {
        for flaw in [FlawType::InsufficientKneeBend, FlawType::ExcessiveKneeBend] {
            assert_eq!(phase_bonus(flaw, at(PhaseName::LoadDip, 1.0)), 30.0);
            assert_eq!(phase_bonus(flaw, at(PhaseName::LoadDip, 0.6)), 10.0);
            assert_eq!(phase_bonus(flaw, at(PhaseName::LoadDip, 0.2)), 0.0);
            assert_eq!(phase_bonus(flaw, at(PhaseName::Setup, 1.0)), 0.0);
        }
    }

    #[test]
    fn test_wrist_snap_table() {
        let flaw = FlawType::PoorWristSnap;
        assert_eq!(phase_bonus(flaw, at(PhaseName::FollowThrough, 0.1)), 0.0);
        assert_eq!(phase_bonus(flaw, at(PhaseName::FollowThrough, 0.3)), 25.0);
        assert_eq!(phase_bonus(flaw, at(PhaseName::FollowThrough, 0.8)), 10.0);
        assert_eq!(phase_bonus(flaw, at(PhaseName::Release, 0.9)), -10.0);
    }

    #[test]
    fn test_guide_hand_tables_favor_late_frames() {
        assert_eq!(phase_bonus(FlawType::GuideHandOnTop, at(PhaseName::FollowThrough, 0.8)), 35.0);
        assert_eq!(phase_bonus(FlawType::GuideHandOnTop, at(PhaseName::FollowThrough, 0.65)), 15.0);
        assert_eq!(phase_bonus(FlawType::ThumbFlick, at(PhaseName::FollowThrough, 0.79)), 10.0);
        assert_eq!(phase_bonus(FlawType::ThumbFlick, at(PhaseName::FollowThrough, 0.8)), 35.0);
        assert_eq!(phase_bonus(FlawType::ThumbFlick, at(PhaseName::FollowThrough, 0.3)), 0.0);
    }
}
