//! Downtime event models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Shift;

/// A recorded stoppage on a machine during a shift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DowntimeEvent {
    pub id: Uuid,
    pub machine_id: Uuid,
    pub record_date: NaiveDate,
    pub shift: Shift,
    pub reason: DowntimeReason,
    pub duration_minutes: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Standard downtime reason categories used across the dashboards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DowntimeReason {
    Breakdown,
    Changeover,
    MaterialShortage,
    QualityStop,
    PlannedMaintenance,
    Other,
}

impl DowntimeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DowntimeReason::Breakdown => "breakdown",
            DowntimeReason::Changeover => "changeover",
            DowntimeReason::MaterialShortage => "material_shortage",
            DowntimeReason::QualityStop => "quality_stop",
            DowntimeReason::PlannedMaintenance => "planned_maintenance",
            DowntimeReason::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "breakdown" => Some(DowntimeReason::Breakdown),
            "changeover" => Some(DowntimeReason::Changeover),
            "material_shortage" => Some(DowntimeReason::MaterialShortage),
            "quality_stop" => Some(DowntimeReason::QualityStop),
            "planned_maintenance" => Some(DowntimeReason::PlannedMaintenance),
            "other" => Some(DowntimeReason::Other),
            _ => None,
        }
    }

    pub fn all() -> &'static [DowntimeReason] {
        &[
            DowntimeReason::Breakdown,
            DowntimeReason::Changeover,
            DowntimeReason::MaterialShortage,
            DowntimeReason::QualityStop,
            DowntimeReason::PlannedMaintenance,
            DowntimeReason::Other,
        ]
    }
}

impl std::fmt::Display for DowntimeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DowntimeReason::Breakdown => write!(f, "Breakdown"),
            DowntimeReason::Changeover => write!(f, "Changeover"),
            DowntimeReason::MaterialShortage => write!(f, "Material Shortage"),
            DowntimeReason::QualityStop => write!(f, "Quality Stop"),
            DowntimeReason::PlannedMaintenance => write!(f, "Planned Maintenance"),
            DowntimeReason::Other => write!(f, "Other"),
        }
    }
}
