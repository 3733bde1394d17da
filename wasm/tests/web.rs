//! Browser-side calculator binding tests (run with wasm-pack test)

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use oee_monitoring_wasm::{
    aggregate_metrics, calculate_availability, calculate_oee, classify_ratio, color_for_ratio,
    oee_metrics_from_counts,
};

#[wasm_bindgen_test]
fn availability_preview_matches_the_ratio() {
    assert!((calculate_availability(420.0, 480.0) - 0.875).abs() < 1e-9);
    assert_eq!(calculate_availability(120.0, 0.0), 0.0);
}

#[wasm_bindgen_test]
fn oee_stays_clamped_for_form_previews() {
    assert_eq!(calculate_oee(1.2, 1.1, 1.3), 1.0);
    assert_eq!(calculate_oee(0.0, 0.9, 0.9), 0.0);
}

#[wasm_bindgen_test]
fn classification_strings_for_gauges() {
    assert_eq!(classify_ratio(0.9), "Excellent");
    assert_eq!(classify_ratio(0.7), "Good");
    assert_eq!(classify_ratio(0.5), "Needs Improvement");

    assert_eq!(color_for_ratio(0.9), "success");
    assert_eq!(color_for_ratio(0.7), "warning");
    assert_eq!(color_for_ratio(0.5), "error");
}

#[wasm_bindgen_test]
fn metrics_json_carries_the_raw_counts() {
    let json = oee_metrics_from_counts(420, 480, 380, 950, 20).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["output_qty"], 950);
    assert_eq!(value["defect_qty"], 20);
    assert!(value["oee"].as_f64().unwrap() <= 1.0);
}

#[wasm_bindgen_test]
fn aggregate_json_uses_weighted_defect_rate() {
    let first = oee_metrics_from_counts(480, 480, 480, 100, 10).unwrap();
    let second = oee_metrics_from_counts(480, 480, 480, 50, 0).unwrap();
    let summary = aggregate_metrics(&format!("[{},{}]", first, second)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&summary).unwrap();

    assert_eq!(value["total_output_qty"], 150);
    assert_eq!(value["total_defect_qty"], 10);
    assert!((value["overall_defect_rate"].as_f64().unwrap() - 10.0 / 150.0).abs() < 1e-9);
}
