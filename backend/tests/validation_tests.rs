//! Tests for route-layer input validation and enum string codes
//! The calculator clamps bad data; these checks reject it at the boundary

use shared::{
    validate_downtime_duration, validate_machine_code, validate_production_counts,
    validate_runtime_minutes, validate_tact_time, DowntimeReason, MachineStatus, Shift,
    MAX_RUNTIME_MINUTES,
};

// =============================================================================
// Input Validation Tests
// =============================================================================

mod machine_inputs {
    use super::*;

    #[test]
    fn machine_code_format() {
        assert!(validate_machine_code("CNC-01").is_ok());
        assert!(validate_machine_code("PRESS-3").is_ok());
        assert!(validate_machine_code("X1").is_ok());

        assert!(validate_machine_code("A").is_err());
        assert!(validate_machine_code("lowercase-01").is_err());
        assert!(validate_machine_code("HAS SPACE").is_err());
    }

    #[test]
    fn tact_time_must_be_positive_and_finite() {
        assert!(validate_tact_time(0.25).is_ok());
        assert!(validate_tact_time(5.0).is_ok());

        assert!(validate_tact_time(0.0).is_err());
        assert!(validate_tact_time(-0.5).is_err());
        assert!(validate_tact_time(f64::NAN).is_err());
        assert!(validate_tact_time(f64::INFINITY).is_err());
    }
}

mod production_inputs {
    use super::*;

    #[test]
    fn runtime_minutes_within_a_day() {
        assert!(validate_runtime_minutes(0).is_ok());
        assert!(validate_runtime_minutes(480).is_ok());
        assert!(validate_runtime_minutes(MAX_RUNTIME_MINUTES).is_ok());

        assert!(validate_runtime_minutes(-1).is_err());
        assert!(validate_runtime_minutes(MAX_RUNTIME_MINUTES + 1).is_err());
    }

    #[test]
    fn defects_cannot_exceed_output() {
        assert!(validate_production_counts(100, 0).is_ok());
        assert!(validate_production_counts(100, 100).is_ok());

        assert!(validate_production_counts(100, 101).is_err());
        assert!(validate_production_counts(-1, 0).is_err());
        assert!(validate_production_counts(0, -1).is_err());
    }

    #[test]
    fn downtime_duration_bounds() {
        assert!(validate_downtime_duration(1).is_ok());
        assert!(validate_downtime_duration(90).is_ok());

        assert!(validate_downtime_duration(0).is_err());
        assert!(validate_downtime_duration(-10).is_err());
        assert!(validate_downtime_duration(MAX_RUNTIME_MINUTES + 1).is_err());
    }
}

// =============================================================================
// Enum Code Tests (persistence string round trips)
// =============================================================================

mod enum_codes {
    use super::*;

    #[test]
    fn shift_codes_round_trip() {
        for shift in [Shift::A, Shift::B] {
            assert_eq!(Shift::parse(shift.as_str()), Some(shift));
        }
        assert_eq!(Shift::parse("A"), Some(Shift::A));
        assert_eq!(Shift::parse("c"), None);
    }

    #[test]
    fn machine_status_codes_round_trip() {
        for status in [
            MachineStatus::Active,
            MachineStatus::Maintenance,
            MachineStatus::Retired,
        ] {
            assert_eq!(MachineStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MachineStatus::parse("scrapped"), None);
    }

    #[test]
    fn downtime_reason_codes_round_trip() {
        for reason in DowntimeReason::all() {
            assert_eq!(DowntimeReason::parse(reason.as_str()), Some(*reason));
        }
        assert_eq!(DowntimeReason::parse("unknown_reason"), None);
    }

    #[test]
    fn downtime_reason_display() {
        assert_eq!(format!("{}", DowntimeReason::Breakdown), "Breakdown");
        assert_eq!(
            format!("{}", DowntimeReason::MaterialShortage),
            "Material Shortage"
        );
        assert_eq!(
            format!("{}", DowntimeReason::PlannedMaintenance),
            "Planned Maintenance"
        );
    }
}
