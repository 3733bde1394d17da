//! Production record models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::oee::OeeMetrics;
use crate::types::Shift;

/// Production counts recorded by an operator for one (machine, date, shift)
///
/// The four OEE factors are cached alongside the raw counts, but they are
/// always recomputed server-side from the counts on every write; the counts
/// remain the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub id: Uuid,
    pub machine_id: Uuid,
    pub record_date: NaiveDate,
    pub shift: Shift,
    pub planned_runtime_minutes: i32,
    pub actual_runtime_minutes: i32,
    pub ideal_runtime_minutes: i32,
    pub output_qty: i32,
    pub defect_qty: i32,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductionRecord {
    /// Rebuild the metric value object from the record's raw counts
    pub fn metrics(&self) -> OeeMetrics {
        OeeMetrics::from_counts(
            self.actual_runtime_minutes,
            self.planned_runtime_minutes,
            self.ideal_runtime_minutes,
            self.output_qty,
            self.defect_qty,
        )
    }
}
