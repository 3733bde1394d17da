//! Validation utilities for the OEE Monitoring Platform
//!
//! These checks belong to the route/query layer: raw operator input is
//! rejected here before the calculator is ever invoked. The calculator
//! itself never validates; it clamps.

/// Minutes in a day; a single shift record can never exceed this
pub const MAX_RUNTIME_MINUTES: i32 = 24 * 60;

/// Validate a machine code (2-20 uppercase alphanumeric, dashes allowed)
pub fn validate_machine_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 2 {
        return Err("Machine code must be at least 2 characters");
    }
    if code.len() > 20 {
        return Err("Machine code must be at most 20 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Machine code must be uppercase alphanumeric (dashes allowed)");
    }
    Ok(())
}

/// Validate a machine's tact time (ideal minutes per unit)
pub fn validate_tact_time(tact_time_minutes: f64) -> Result<(), &'static str> {
    if !tact_time_minutes.is_finite() || tact_time_minutes <= 0.0 {
        return Err("Tact time must be a positive number of minutes");
    }
    Ok(())
}

/// Validate runtime minutes recorded for a single shift
pub fn validate_runtime_minutes(minutes: i32) -> Result<(), &'static str> {
    if minutes < 0 {
        return Err("Runtime minutes cannot be negative");
    }
    if minutes > MAX_RUNTIME_MINUTES {
        return Err("Runtime minutes cannot exceed 24 hours");
    }
    Ok(())
}

/// Validate output and defect quantities together
pub fn validate_production_counts(output_qty: i32, defect_qty: i32) -> Result<(), &'static str> {
    if output_qty < 0 {
        return Err("Output quantity cannot be negative");
    }
    if defect_qty < 0 {
        return Err("Defect quantity cannot be negative");
    }
    if defect_qty > output_qty {
        return Err("Defect quantity cannot exceed output quantity");
    }
    Ok(())
}

/// Validate a downtime duration
pub fn validate_downtime_duration(minutes: i32) -> Result<(), &'static str> {
    if minutes <= 0 {
        return Err("Downtime duration must be positive");
    }
    if minutes > MAX_RUNTIME_MINUTES {
        return Err("Downtime duration cannot exceed 24 hours");
    }
    Ok(())
}
