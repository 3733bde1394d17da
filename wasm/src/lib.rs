//! WebAssembly module for the OEE Monitoring Platform
//!
//! Provides client-side computation for:
//! - OEE factor and composite score calculations
//! - Threshold classification and color tokens for gauges
//! - Live form previews while an operator enters shift counts

use wasm_bindgen::prelude::*;

use shared::oee;

/// Availability: actual runtime over planned runtime, clamped to [0, 1]
#[wasm_bindgen]
pub fn calculate_availability(actual_runtime: f64, planned_runtime: f64) -> f64 {
    oee::calculate_availability(actual_runtime, planned_runtime)
}

/// Performance: ideal runtime over actual runtime, clamped to [0, 1]
#[wasm_bindgen]
pub fn calculate_performance(ideal_runtime: f64, actual_runtime: f64) -> f64 {
    oee::calculate_performance(ideal_runtime, actual_runtime)
}

/// Quality: non-defective fraction of output, clamped to [0, 1]
#[wasm_bindgen]
pub fn calculate_quality(output_qty: f64, defect_qty: f64) -> f64 {
    oee::calculate_quality(output_qty, defect_qty)
}

/// Composite OEE score from the three factors
#[wasm_bindgen]
pub fn calculate_oee(availability: f64, performance: f64, quality: f64) -> f64 {
    oee::calculate_oee(availability, performance, quality)
}

/// Full metric set for a shift's counts, as a JSON string for the dashboard
#[wasm_bindgen]
pub fn oee_metrics_from_counts(
    actual_runtime_minutes: i32,
    planned_runtime_minutes: i32,
    ideal_runtime_minutes: i32,
    output_qty: i32,
    defect_qty: i32,
) -> Result<String, JsValue> {
    let metrics = oee::OeeMetrics::from_counts(
        actual_runtime_minutes,
        planned_runtime_minutes,
        ideal_runtime_minutes,
        output_qty,
        defect_qty,
    );

    serde_json::to_string(&metrics)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Ideal runtime in minutes for an output at a machine's tact time
#[wasm_bindgen]
pub fn ideal_runtime_for_output(output_qty: f64, tact_time_minutes: f64) -> f64 {
    oee::ideal_runtime_for_output(output_qty, tact_time_minutes)
}

/// Classify a ratio against the shared thresholds
#[wasm_bindgen]
pub fn classify_ratio(value: f64) -> String {
    format!("{}", oee::classify(value))
}

/// Semantic color token ("success" / "warning" / "error") for a ratio
#[wasm_bindgen]
pub fn color_for_ratio(value: f64) -> String {
    oee::color_for(value).as_str().to_string()
}

/// Aggregate a JSON array of per-shift metrics into a summary, as JSON
#[wasm_bindgen]
pub fn aggregate_metrics(metrics_json: &str) -> Result<String, JsValue> {
    let records: Vec<oee::OeeMetrics> = serde_json::from_str(metrics_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid metrics JSON: {}", e)))?;

    let summary = oee::aggregate(&records);

    serde_json::to_string(&summary)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
