//! OEE calculation engine
//!
//! Pure functions that turn raw shift counts (runtime minutes, output and
//! defect quantities) into Availability, Performance, Quality, and the
//! composite OEE score, plus the classification and aggregation helpers used
//! by every dashboard view.
//!
//! All ratios are clamped into `[0, 1]` and every division is zero-guarded,
//! so no input can produce NaN, Infinity, or a panic. Metrics feed
//! always-visible dashboard widgets; a degraded-but-bounded number beats a
//! crash.

use serde::{Deserialize, Serialize};

/// Score at or above which a metric is rated Excellent
pub const EXCELLENT_THRESHOLD: f64 = 0.85;

/// Score at or above which a metric is rated Good
pub const GOOD_THRESHOLD: f64 = 0.65;

/// Clamp a ratio into the canonical `[0, 1]` metric range
fn clamp_ratio(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Availability: fraction of planned time the machine actually ran
///
/// Zero planned time yields 0 (nothing scheduled means zero availability,
/// not undefined). Actual runtime exceeding planned time (overtime, clock
/// skew) is tolerated and capped at 1.0.
pub fn calculate_availability(actual_runtime: f64, planned_runtime: f64) -> f64 {
    if planned_runtime <= 0.0 {
        return 0.0;
    }
    clamp_ratio(actual_runtime / planned_runtime)
}

/// Performance: fraction of the ideal cycle rate achieved while running
///
/// `ideal_runtime` is the time the actual output should have taken at rated
/// tact time. Zero actual runtime yields 0.
pub fn calculate_performance(ideal_runtime: f64, actual_runtime: f64) -> f64 {
    if actual_runtime <= 0.0 {
        return 0.0;
    }
    clamp_ratio(ideal_runtime / actual_runtime)
}

/// Quality: fraction of produced units that are non-defective
///
/// Zero output yields 0. A defect count exceeding output (malformed input)
/// clamps to 0 rather than going negative.
pub fn calculate_quality(output_qty: f64, defect_qty: f64) -> f64 {
    if output_qty <= 0.0 {
        return 0.0;
    }
    clamp_ratio((output_qty - defect_qty) / output_qty)
}

/// Composite OEE score: availability x performance x quality, clamped
pub fn calculate_oee(availability: f64, performance: f64, quality: f64) -> f64 {
    clamp_ratio(availability * performance * quality)
}

/// Ideal runtime in minutes for a given output at a machine's rated tact time
/// (ideal minutes per unit)
pub fn ideal_runtime_for_output(output_qty: f64, tact_time_minutes: f64) -> f64 {
    if output_qty <= 0.0 || tact_time_minutes <= 0.0 {
        return 0.0;
    }
    output_qty * tact_time_minutes
}

/// Three-tier rating applied to any of the four OEE ratios
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    /// value >= 0.85
    Excellent,
    /// 0.65 <= value < 0.85
    Good,
    /// value < 0.65
    NeedsImprovement,
}

impl std::fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceLevel::Excellent => write!(f, "Excellent"),
            PerformanceLevel::Good => write!(f, "Good"),
            PerformanceLevel::NeedsImprovement => write!(f, "Needs Improvement"),
        }
    }
}

/// Semantic color token for gauges, badges, and threshold bands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Success,
    Warning,
    Error,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Success => "success",
            StatusColor::Warning => "warning",
            StatusColor::Error => "error",
        }
    }
}

/// Classify a ratio against the shared thresholds
pub fn classify(value: f64) -> PerformanceLevel {
    if value >= EXCELLENT_THRESHOLD {
        PerformanceLevel::Excellent
    } else if value >= GOOD_THRESHOLD {
        PerformanceLevel::Good
    } else {
        PerformanceLevel::NeedsImprovement
    }
}

/// Color token for a ratio
///
/// Uses the same threshold constants as [`classify`] so numeric
/// classification and visual color can never drift apart.
pub fn color_for(value: f64) -> StatusColor {
    match classify(value) {
        PerformanceLevel::Excellent => StatusColor::Success,
        PerformanceLevel::Good => StatusColor::Warning,
        PerformanceLevel::NeedsImprovement => StatusColor::Error,
    }
}

/// OEE metrics for a single (machine, date, shift) tuple
///
/// The four ratios are always derived from the raw counts; `oee` is the
/// product of the stored factors and is never an independent source of
/// truth. Values are computed fresh per recalculation, never mutated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OeeMetrics {
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
    pub actual_runtime_minutes: i32,
    pub planned_runtime_minutes: i32,
    pub ideal_runtime_minutes: i32,
    pub output_qty: i32,
    pub defect_qty: i32,
}

impl OeeMetrics {
    /// Derive the full metric set from raw shift counts
    pub fn from_counts(
        actual_runtime_minutes: i32,
        planned_runtime_minutes: i32,
        ideal_runtime_minutes: i32,
        output_qty: i32,
        defect_qty: i32,
    ) -> Self {
        let availability =
            calculate_availability(actual_runtime_minutes as f64, planned_runtime_minutes as f64);
        let performance =
            calculate_performance(ideal_runtime_minutes as f64, actual_runtime_minutes as f64);
        let quality = calculate_quality(output_qty as f64, defect_qty as f64);
        let oee = calculate_oee(availability, performance, quality);

        Self {
            availability,
            performance,
            quality,
            oee,
            actual_runtime_minutes,
            planned_runtime_minutes,
            ideal_runtime_minutes,
            output_qty,
            defect_qty,
        }
    }

    pub fn good_qty(&self) -> i32 {
        (self.output_qty - self.defect_qty).max(0)
    }

    pub fn oee_level(&self) -> PerformanceLevel {
        classify(self.oee)
    }
}

/// Summary statistics over a sequence of per-shift metrics
///
/// Derived view recomputed on demand; an empty input yields the all-zero
/// summary rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OeeSummary {
    pub record_count: usize,
    pub avg_oee: f64,
    pub avg_availability: f64,
    pub avg_performance: f64,
    pub avg_quality: f64,
    pub max_oee: f64,
    pub min_oee: f64,
    pub total_output_qty: i64,
    pub total_defect_qty: i64,
    /// Defect rate recomputed from the summed totals, weighted by volume.
    /// Not the average of per-record quality values, which would skew when
    /// records have different output volumes.
    pub overall_defect_rate: f64,
}

impl OeeSummary {
    pub fn empty() -> Self {
        Self {
            record_count: 0,
            avg_oee: 0.0,
            avg_availability: 0.0,
            avg_performance: 0.0,
            avg_quality: 0.0,
            max_oee: 0.0,
            min_oee: 0.0,
            total_output_qty: 0,
            total_defect_qty: 0,
            overall_defect_rate: 0.0,
        }
    }
}

/// Aggregate a sequence of per-shift metrics into summary statistics
///
/// Pure and order-independent over the input.
pub fn aggregate(records: &[OeeMetrics]) -> OeeSummary {
    if records.is_empty() {
        return OeeSummary::empty();
    }

    let count = records.len();
    let mut sum_oee = 0.0;
    let mut sum_availability = 0.0;
    let mut sum_performance = 0.0;
    let mut sum_quality = 0.0;
    let mut max_oee = f64::MIN;
    let mut min_oee = f64::MAX;
    let mut total_output: i64 = 0;
    let mut total_defects: i64 = 0;

    for record in records {
        sum_oee += record.oee;
        sum_availability += record.availability;
        sum_performance += record.performance;
        sum_quality += record.quality;
        max_oee = max_oee.max(record.oee);
        min_oee = min_oee.min(record.oee);
        total_output += record.output_qty as i64;
        total_defects += record.defect_qty as i64;
    }

    let overall_defect_rate = if total_output > 0 {
        clamp_ratio(total_defects as f64 / total_output as f64)
    } else {
        0.0
    };

    OeeSummary {
        record_count: count,
        avg_oee: sum_oee / count as f64,
        avg_availability: sum_availability / count as f64,
        avg_performance: sum_performance / count as f64,
        avg_quality: sum_quality / count as f64,
        max_oee,
        min_oee,
        total_output_qty: total_output,
        total_defect_qty: total_defects,
        overall_defect_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn availability_basic_ratio() {
        assert!((calculate_availability(420.0, 480.0) - 0.875).abs() < TOLERANCE);
    }

    #[test]
    fn availability_zero_planned_is_zero() {
        assert_eq!(calculate_availability(0.0, 0.0), 0.0);
        assert_eq!(calculate_availability(480.0, 0.0), 0.0);
    }

    #[test]
    fn availability_overtime_caps_at_one() {
        assert_eq!(calculate_availability(500.0, 480.0), 1.0);
    }

    #[test]
    fn performance_zero_actual_is_zero() {
        assert_eq!(calculate_performance(100.0, 0.0), 0.0);
    }

    #[test]
    fn performance_ideal_exceeding_actual_caps_at_one() {
        assert_eq!(calculate_performance(500.0, 400.0), 1.0);
    }

    #[test]
    fn quality_boundaries() {
        assert_eq!(calculate_quality(100.0, 0.0), 1.0);
        assert_eq!(calculate_quality(100.0, 100.0), 0.0);
        assert_eq!(calculate_quality(0.0, 0.0), 0.0);
    }

    #[test]
    fn quality_defects_exceeding_output_clamps_to_zero() {
        assert_eq!(calculate_quality(100.0, 150.0), 0.0);
    }

    #[test]
    fn oee_worked_example() {
        // 0.85 x 0.92 x 0.96 ~= 0.751
        let oee = calculate_oee(0.85, 0.92, 0.96);
        assert!((oee - 0.75072).abs() < TOLERANCE);
        assert!(((oee * 100.0).round() / 100.0 - 0.75).abs() < TOLERANCE);
    }

    #[test]
    fn oee_rederives_from_stored_factors() {
        let metrics = OeeMetrics::from_counts(420, 480, 380, 950, 20);
        let rederived =
            calculate_oee(metrics.availability, metrics.performance, metrics.quality);
        assert!((metrics.oee - rederived).abs() < TOLERANCE);
    }

    #[test]
    fn calculation_is_idempotent() {
        let first = OeeMetrics::from_counts(420, 480, 380, 950, 20);
        let second = OeeMetrics::from_counts(420, 480, 380, 950, 20);
        assert_eq!(first, second);
    }

    #[test]
    fn ideal_runtime_from_tact_time() {
        assert!((ideal_runtime_for_output(100.0, 0.5) - 50.0).abs() < TOLERANCE);
        assert_eq!(ideal_runtime_for_output(0.0, 0.5), 0.0);
        assert_eq!(ideal_runtime_for_output(100.0, 0.0), 0.0);
    }

    #[test]
    fn classify_threshold_boundaries() {
        assert_eq!(classify(0.85), PerformanceLevel::Excellent);
        assert_eq!(classify(0.849999), PerformanceLevel::Good);
        assert_eq!(classify(0.65), PerformanceLevel::Good);
        assert_eq!(classify(0.649999), PerformanceLevel::NeedsImprovement);
    }

    #[test]
    fn color_matches_classification_at_boundaries() {
        for value in [0.0, 0.649999, 0.65, 0.849999, 0.85, 1.0] {
            let expected = match classify(value) {
                PerformanceLevel::Excellent => StatusColor::Success,
                PerformanceLevel::Good => StatusColor::Warning,
                PerformanceLevel::NeedsImprovement => StatusColor::Error,
            };
            assert_eq!(color_for(value), expected);
        }
    }

    #[test]
    fn aggregate_empty_is_all_zero() {
        assert_eq!(aggregate(&[]), OeeSummary::empty());
    }

    #[test]
    fn aggregate_defect_rate_is_weighted_not_averaged() {
        let records = [
            OeeMetrics::from_counts(480, 480, 480, 100, 10),
            OeeMetrics::from_counts(480, 480, 480, 50, 0),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.total_output_qty, 150);
        assert_eq!(summary.total_defect_qty, 10);
        assert!((summary.overall_defect_rate - 10.0 / 150.0).abs() < TOLERANCE);

        // The naive average of per-record defect rates would be 0.05
        let naive = (10.0 / 100.0 + 0.0 / 50.0) / 2.0;
        assert!((summary.overall_defect_rate - naive).abs() > 0.01);
    }

    #[test]
    fn aggregate_is_order_independent() {
        let a = OeeMetrics::from_counts(400, 480, 350, 900, 30);
        let b = OeeMetrics::from_counts(460, 480, 440, 1100, 5);
        let c = OeeMetrics::from_counts(200, 480, 180, 400, 80);
        assert_eq!(aggregate(&[a, b, c]), aggregate(&[c, a, b]));
    }

    proptest! {
        #[test]
        fn availability_stays_in_unit_range(
            actual in 0.0f64..100_000.0,
            planned in 0.0f64..100_000.0,
        ) {
            let value = calculate_availability(actual, planned);
            prop_assert!((0.0..=1.0).contains(&value));
        }

        #[test]
        fn performance_stays_in_unit_range(
            ideal in 0.0f64..100_000.0,
            actual in 0.0f64..100_000.0,
        ) {
            let value = calculate_performance(ideal, actual);
            prop_assert!((0.0..=1.0).contains(&value));
        }

        #[test]
        fn quality_stays_in_unit_range(
            output in 0.0f64..1_000_000.0,
            defects in 0.0f64..1_000_000.0,
        ) {
            let value = calculate_quality(output, defects);
            prop_assert!((0.0..=1.0).contains(&value));
        }

        #[test]
        fn oee_is_product_of_factors_and_bounded(
            actual in 0i32..10_000,
            planned in 0i32..10_000,
            ideal in 0i32..10_000,
            output in 0i32..100_000,
            defects in 0i32..100_000,
        ) {
            let m = OeeMetrics::from_counts(actual, planned, ideal, output, defects);
            prop_assert!((0.0..=1.0).contains(&m.oee));
            let product = m.availability * m.performance * m.quality;
            prop_assert!((m.oee - product.clamp(0.0, 1.0)).abs() < 1e-9);
        }
    }
}
