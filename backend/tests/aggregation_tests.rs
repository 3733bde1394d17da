//! Tests for OEE aggregation over per-shift records
//! Verifies the weighted defect rate, empty-input behavior, and
//! order independence

use shared::{aggregate, OeeMetrics, OeeSummary};

const TOLERANCE: f64 = 1e-9;

fn shift(actual: i32, planned: i32, ideal: i32, output: i32, defects: i32) -> OeeMetrics {
    OeeMetrics::from_counts(actual, planned, ideal, output, defects)
}

// =============================================================================
// Empty Input Tests
// =============================================================================

mod empty {
    use super::*;

    #[test]
    fn empty_sequence_yields_all_zero_summary() {
        let summary = aggregate(&[]);
        assert_eq!(summary, OeeSummary::empty());
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.avg_oee, 0.0);
        assert_eq!(summary.avg_availability, 0.0);
        assert_eq!(summary.avg_performance, 0.0);
        assert_eq!(summary.avg_quality, 0.0);
        assert_eq!(summary.max_oee, 0.0);
        assert_eq!(summary.min_oee, 0.0);
        assert_eq!(summary.total_output_qty, 0);
        assert_eq!(summary.total_defect_qty, 0);
        assert_eq!(summary.overall_defect_rate, 0.0);
    }

    #[test]
    fn no_nan_from_empty_input() {
        let summary = aggregate(&[]);
        assert!(!summary.avg_oee.is_nan());
        assert!(!summary.overall_defect_rate.is_nan());
    }
}

// =============================================================================
// Weighted Defect Rate Tests
// =============================================================================

mod defect_rate {
    use super::*;

    #[test]
    fn recomputed_from_summed_totals_not_averaged() {
        // [{output: 100, defects: 10}, {output: 50, defects: 0}]
        let records = [
            shift(480, 480, 480, 100, 10),
            shift(480, 480, 480, 50, 0),
        ];
        let summary = aggregate(&records);

        // Weighted: 10 / 150
        assert!((summary.overall_defect_rate - 10.0 / 150.0).abs() < TOLERANCE);

        // NOT the average-of-averages (10/100 + 0/50) / 2 = 0.05
        let naive = (10.0 / 100.0 + 0.0 / 50.0) / 2.0;
        assert!((summary.overall_defect_rate - naive).abs() > 0.01);
    }

    #[test]
    fn zero_total_output_yields_zero_rate() {
        let records = [shift(0, 480, 0, 0, 0), shift(0, 480, 0, 0, 0)];
        let summary = aggregate(&records);
        assert_eq!(summary.total_output_qty, 0);
        assert_eq!(summary.overall_defect_rate, 0.0);
    }

    #[test]
    fn totals_are_exact_integer_sums() {
        let records = [
            shift(480, 480, 470, 1_000_000, 1),
            shift(480, 480, 460, 1_000_000, 2),
            shift(480, 480, 450, 1_000_000, 3),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.total_output_qty, 3_000_000);
        assert_eq!(summary.total_defect_qty, 6);
    }
}

// =============================================================================
// Averages and Extremes Tests
// =============================================================================

mod averages {
    use super::*;

    #[test]
    fn arithmetic_means_of_the_four_ratios() {
        let a = shift(480, 480, 480, 100, 0); // all factors 1.0
        let b = shift(240, 480, 120, 100, 50); // a=0.5, p=0.5, q=0.5
        let summary = aggregate(&[a, b]);

        assert!((summary.avg_availability - 0.75).abs() < TOLERANCE);
        assert!((summary.avg_performance - 0.75).abs() < TOLERANCE);
        assert!((summary.avg_quality - 0.75).abs() < TOLERANCE);
        assert!((summary.avg_oee - (1.0 + 0.125) / 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn min_and_max_oee() {
        let best = shift(480, 480, 480, 100, 0);
        let worst = shift(120, 480, 60, 40, 20);
        let middle = shift(400, 480, 320, 800, 40);
        let summary = aggregate(&[middle, best, worst]);

        assert!((summary.max_oee - best.oee).abs() < TOLERANCE);
        assert!((summary.min_oee - worst.oee).abs() < TOLERANCE);
    }

    #[test]
    fn single_record_summary_mirrors_the_record() {
        let only = shift(420, 480, 380, 950, 20);
        let summary = aggregate(&[only]);

        assert_eq!(summary.record_count, 1);
        assert!((summary.avg_oee - only.oee).abs() < TOLERANCE);
        assert!((summary.max_oee - only.oee).abs() < TOLERANCE);
        assert!((summary.min_oee - only.oee).abs() < TOLERANCE);
        assert_eq!(summary.total_output_qty, 950);
        assert_eq!(summary.total_defect_qty, 20);
    }
}

// =============================================================================
// Purity Tests
// =============================================================================

mod purity {
    use super::*;

    #[test]
    fn order_independent() {
        let a = shift(400, 480, 350, 900, 30);
        let b = shift(460, 480, 440, 1100, 5);
        let c = shift(200, 480, 180, 400, 80);

        assert_eq!(aggregate(&[a, b, c]), aggregate(&[c, b, a]));
        assert_eq!(aggregate(&[a, b, c]), aggregate(&[b, c, a]));
    }

    #[test]
    fn repeated_aggregation_is_stable() {
        let records = [
            shift(400, 480, 350, 900, 30),
            shift(460, 480, 440, 1100, 5),
        ];
        assert_eq!(aggregate(&records), aggregate(&records));
    }
}
