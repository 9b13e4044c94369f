use approx::assert_abs_diff_eq;
use swish_analysis::synthetic::{generate, ShotProfile, SYNTHETIC_FPS};
use swish_analysis::{analyze_shot, AnalysisError, AnalysisResult, AnalyzerConfig, ShotAnalyzer};
use swish_core::{DetectionMethod, FlawType, Joint, Landmark, PhaseName};
use swish_engine::BoundaryError;
use swish_eval::{legal_window, FlawThresholds};

fn analyze(profile: &ShotProfile) -> AnalysisResult {
    analyze_shot(&generate(profile), SYNTHETIC_FPS).expect("analysis")
}

fn flaw_types(result: &AnalysisResult) -> Vec<FlawType> {
    result.findings.iter().map(|f| f.flaw_type).collect()
}

fn all_profiles() -> Vec<ShotProfile> {
    vec![
        ShotProfile::clean(),
        ShotProfile::flared_elbow(),
        ShotProfile::shallow_knees(),
        ShotProfile::deep_knees(),
        ShotProfile::stiff_wrist(),
        ShotProfile::guide_hand_on_top(),
        ShotProfile::thumb_flick(),
    ]
}

mod scenarios {
    use super::*;

    #[test]
    fn test_flared_elbow() {
        let result = analyze(&ShotProfile::flared_elbow());
        assert_eq!(flaw_types(&result), vec![FlawType::ElbowFlare]);

        let finding = result.findings[0];
        assert_eq!(finding.detection_method, DetectionMethod::SideViewExtension);
        assert_eq!(finding.phase_name, PhaseName::Release);
        assert_abs_diff_eq!(finding.severity, 30.0, epsilon = 1e-2);
        assert!(result.phases.get(PhaseName::Release).contains(finding.frame_number));
        assert_abs_diff_eq!(result.form_score, 88.0, epsilon = 1e-2);
    }

    #[test]
    fn test_shallow_knees() {
        let result = analyze(&ShotProfile::shallow_knees());
        assert_eq!(flaw_types(&result), vec![FlawType::InsufficientKneeBend]);
        let finding = result.findings[0];
        assert_eq!(finding.detection_method, DetectionMethod::KeyMomentDepth);
        assert_abs_diff_eq!(finding.severity, 18.0, epsilon = 1e-2);
    }

    #[test]
    fn test_deep_knees() {
        let result = analyze(&ShotProfile::deep_knees());
        assert_eq!(flaw_types(&result), vec![FlawType::ExcessiveKneeBend]);
        assert_abs_diff_eq!(result.findings[0].severity, 15.0, epsilon = 1e-2);
    }

    #[test]
    fn test_stiff_wrist() {
        let result = analyze(&ShotProfile::stiff_wrist());
        assert_eq!(flaw_types(&result), vec![FlawType::PoorWristSnap]);
        let finding = result.findings[0];
        assert_eq!(finding.detection_method, DetectionMethod::PeakWindow);
        assert_eq!(finding.severity, 30.0);
    }

    #[test]
    fn test_guide_hand_on_top() {
        let result = analyze(&ShotProfile::guide_hand_on_top());
        assert_eq!(flaw_types(&result), vec![FlawType::GuideHandOnTop]);
        assert_abs_diff_eq!(result.findings[0].severity, 12.0, epsilon = 1e-2);
    }

    #[test]
    fn test_thumb_flick() {
        let result = analyze(&ShotProfile::thumb_flick());
        assert_eq!(flaw_types(&result), vec![FlawType::ThumbFlick]);
        assert_eq!(result.findings[0].severity, 20.0);
    }

    #[test]
    fn test_occluded_elbow_is_not_a_finding() {
        let mut frames = generate(&ShotProfile::flared_elbow());
        for frame in &mut frames {
            if let Some(elbow) = frame.get(Joint::RightElbow).copied() {
                *frame = frame
                    .clone()
                    .with_joint(Joint::RightElbow, Landmark::new(elbow.x, elbow.y, 0.1));
            }
        }
        let result = analyze_shot(&frames, SYNTHETIC_FPS).expect("analysis");
        assert!(result.findings.is_empty());
        assert!(result.detector_faults.is_empty());
    }

    #[test]
    fn test_elbow_on_shoulder_is_not_a_finding() {
        let mut frames = generate(&ShotProfile::clean());
        for frame in &mut frames {
            if let Some(shoulder) = frame.get(Joint::RightShoulder).copied() {
                *frame = frame.clone().with_joint(Joint::RightElbow, shoulder);
            }
        }
        let result = analyze_shot(&frames, SYNTHETIC_FPS).expect("analysis");
        assert!(!flaw_types(&result).contains(&FlawType::ElbowFlare));
        assert!(result.detector_faults.is_empty());
    }

    #[test]
    fn test_motionless_clip_is_rejected() {
        let frames = generate(&ShotProfile {
            knee_depth: 175.0,
            tail: 0,
            lead_in: 30,
            ..ShotProfile::clean()
        });
        // Trim off the jump so nothing moves.
        let still = &frames[..30];
        assert!(matches!(
            analyze_shot(still, SYNTHETIC_FPS),
            Err(AnalysisError::Boundary(BoundaryError::ShotStartNotFound { .. }))
        ));
    }

    #[test]
    fn test_frame_numbers_are_absolute() {
        let profile = ShotProfile {
            first_frame: 1000,
            ..ShotProfile::shallow_knees()
        };
        let result = analyze(&profile);
        assert!(result.shot_start >= 1000);
        let load = result.phases.get(PhaseName::LoadDip);
        assert_eq!(load.key_moment_frame, Some(profile.deepest_frame()));
        assert!(result.findings.iter().all(|f| f.frame_number >= 1000));
    }
}

mod properties {
    use super::*;

    #[test]
    fn test_phases_are_ordered_and_non_empty() {
        for profile in all_profiles() {
            let result = analyze(&profile);
            let names: Vec<PhaseName> = result.phases.iter().map(|p| p.name).collect();
            assert_eq!(names, PhaseName::ALL);
            for phase in result.phases.iter() {
                assert!(phase.end_frame >= phase.start_frame);
            }
            let release = result.phases.get(PhaseName::Release);
            assert_eq!(release.key_moment_frame, Some(profile.release_frame()));
        }
    }

    #[test]
    fn test_findings_respect_severity_bounds() {
        for profile in all_profiles() {
            for finding in analyze(&profile).findings {
                assert!(finding.severity > 0.0);
                assert!(finding.severity <= finding.flaw_type.max_severity());
            }
        }
    }

    #[test]
    fn test_findings_stay_in_legal_window() {
        let thresholds = FlawThresholds::default();
        for profile in all_profiles() {
            let result = analyze(&profile);
            for finding in &result.findings {
                let window =
                    legal_window(finding.flaw_type, &result.phases, &thresholds).expect("window");
                assert!(
                    window.contains(finding.frame_number),
                    "{} at frame {} outside {}..={}",
                    finding.flaw_type,
                    finding.frame_number,
                    window.start,
                    window.end
                );
                assert_eq!(finding.phase_name, finding.flaw_type.legal_phase());
            }
        }
    }

    #[test]
    fn test_analysis_is_deterministic() {
        for profile in all_profiles() {
            let frames = generate(&profile);
            let first = analyze_shot(&frames, SYNTHETIC_FPS).expect("analysis");
            let second = analyze_shot(&frames, SYNTHETIC_FPS).expect("analysis");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_parallel_bank_matches_sequential() {
        let parallel = ShotAnalyzer::new(AnalyzerConfig {
            parallel_detectors: true,
            ..AnalyzerConfig::default()
        })
        .expect("valid config");
        for profile in all_profiles() {
            let frames = generate(&profile);
            assert_eq!(
                parallel.analyze(&frames, SYNTHETIC_FPS).expect("analysis"),
                analyze_shot(&frames, SYNTHETIC_FPS).expect("analysis")
            );
        }
    }

    #[test]
    fn test_moments_follow_frame_order() {
        let profile = ShotProfile {
            elbow_angle: 120.0,
            knee_depth: 150.0,
            guide_thumb_angle: 80.0,
            ..ShotProfile::clean()
        };
        let result = analyze(&profile);
        assert_eq!(result.moments.len(), 3);
        assert!(result.moments.windows(2).all(|w| w[0].frame <= w[1].frame));
        assert_eq!(result.moments[0].flaw_type, FlawType::InsufficientKneeBend);
    }
}
