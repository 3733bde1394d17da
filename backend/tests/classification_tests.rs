//! Tests for threshold classification and color tokens
//! Verifies classify and color_for share the same boundaries exactly

use shared::{
    classify, color_for, PerformanceLevel, StatusColor, EXCELLENT_THRESHOLD, GOOD_THRESHOLD,
};

// =============================================================================
// Classification Boundary Tests
// =============================================================================

mod boundaries {
    use super::*;

    #[test]
    fn excellent_at_and_above_085() {
        assert_eq!(classify(0.85), PerformanceLevel::Excellent);
        assert_eq!(classify(0.9), PerformanceLevel::Excellent);
        assert_eq!(classify(1.0), PerformanceLevel::Excellent);
    }

    #[test]
    fn good_just_below_085() {
        assert_eq!(classify(0.849999), PerformanceLevel::Good);
    }

    #[test]
    fn good_at_and_above_065() {
        assert_eq!(classify(0.65), PerformanceLevel::Good);
        assert_eq!(classify(0.75), PerformanceLevel::Good);
    }

    #[test]
    fn needs_improvement_below_065() {
        assert_eq!(classify(0.649999), PerformanceLevel::NeedsImprovement);
        assert_eq!(classify(0.3), PerformanceLevel::NeedsImprovement);
        assert_eq!(classify(0.0), PerformanceLevel::NeedsImprovement);
    }

    #[test]
    fn threshold_constants_are_the_documented_values() {
        assert_eq!(EXCELLENT_THRESHOLD, 0.85);
        assert_eq!(GOOD_THRESHOLD, 0.65);
    }
}

// =============================================================================
// Color Token Consistency Tests
// =============================================================================

mod colors {
    use super::*;

    #[test]
    fn color_tiers_match_classification_tiers() {
        // No off-by-one drift allowed between numeric classification and
        // visual color, including exactly at the boundaries
        let samples = [
            0.0, 0.5, 0.649999, 0.65, 0.650001, 0.75, 0.849999, 0.85, 0.850001, 1.0,
        ];

        for value in samples {
            let expected = match classify(value) {
                PerformanceLevel::Excellent => StatusColor::Success,
                PerformanceLevel::Good => StatusColor::Warning,
                PerformanceLevel::NeedsImprovement => StatusColor::Error,
            };
            assert_eq!(color_for(value), expected, "drift at value {}", value);
        }
    }

    #[test]
    fn color_token_strings() {
        assert_eq!(StatusColor::Success.as_str(), "success");
        assert_eq!(StatusColor::Warning.as_str(), "warning");
        assert_eq!(StatusColor::Error.as_str(), "error");
    }
}

// =============================================================================
// Display Tests
// =============================================================================

mod display {
    use super::*;

    #[test]
    fn level_display_strings() {
        assert_eq!(format!("{}", PerformanceLevel::Excellent), "Excellent");
        assert_eq!(format!("{}", PerformanceLevel::Good), "Good");
        assert_eq!(
            format!("{}", PerformanceLevel::NeedsImprovement),
            "Needs Improvement"
        );
    }
}
