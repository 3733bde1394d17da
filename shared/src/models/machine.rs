//! Machine models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A machine monitored on the shop floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: Uuid,
    pub plant_id: Uuid,
    /// Short shop-floor code, e.g. "CNC-01"
    pub code: String,
    pub name: String,
    pub line: Option<String>,
    /// Ideal minutes per unit at rated cycle speed (tact time)
    pub tact_time_minutes: f64,
    pub status: MachineStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Operational status of a machine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    Active,
    Maintenance,
    Retired,
}

impl MachineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Active => "active",
            MachineStatus::Maintenance => "maintenance",
            MachineStatus::Retired => "retired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(MachineStatus::Active),
            "maintenance" => Some(MachineStatus::Maintenance),
            "retired" => Some(MachineStatus::Retired),
            _ => None,
        }
    }
}

impl std::fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineStatus::Active => write!(f, "Active"),
            MachineStatus::Maintenance => write!(f, "Maintenance"),
            MachineStatus::Retired => write!(f, "Retired"),
        }
    }
}
