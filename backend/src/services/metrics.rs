//! OEE metrics service
//!
//! Rebuilds per-shift metrics from the recorded counts and aggregates them
//! into the daily, trend, and summary views the dashboards render.
//! Aggregation happens in Rust via the shared calculator rather than SQL
//! AVG: the overall defect rate must be recomputed from summed totals, which
//! averaging per-row quality values would get wrong.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    aggregate, classify, color_for, DateRange, OeeMetrics, OeeSummary, PerformanceLevel, Shift,
    StatusColor,
};

/// Metrics service backing the dashboard views
#[derive(Clone)]
pub struct MetricsService {
    db: PgPool,
}

/// Slim row holding just the counts needed to rebuild metrics
#[derive(Debug, sqlx::FromRow)]
struct CountsRow {
    machine_id: Uuid,
    record_date: NaiveDate,
    shift: String,
    planned_runtime_minutes: i32,
    actual_runtime_minutes: i32,
    ideal_runtime_minutes: i32,
    output_qty: i32,
    defect_qty: i32,
}

impl CountsRow {
    fn metrics(&self) -> OeeMetrics {
        OeeMetrics::from_counts(
            self.actual_runtime_minutes,
            self.planned_runtime_minutes,
            self.ideal_runtime_minutes,
            self.output_qty,
            self.defect_qty,
        )
    }
}

/// A ratio paired with its classification and color token
#[derive(Debug, Serialize)]
pub struct RatedValue {
    pub value: f64,
    pub level: PerformanceLevel,
    pub color: StatusColor,
}

impl RatedValue {
    fn new(value: f64) -> Self {
        Self {
            value,
            level: classify(value),
            color: color_for(value),
        }
    }
}

/// Metrics for one shift of a day
#[derive(Debug, Serialize)]
pub struct ShiftMetrics {
    pub shift: Shift,
    pub metrics: OeeMetrics,
    pub oee_level: PerformanceLevel,
    pub oee_color: StatusColor,
}

/// A machine's metrics for a single day: per-shift detail plus the
/// aggregated day summary
#[derive(Debug, Serialize)]
pub struct DailyMetrics {
    pub machine_id: Uuid,
    pub record_date: NaiveDate,
    pub shifts: Vec<ShiftMetrics>,
    pub summary: OeeSummary,
}

/// One point of a trend chart series: the aggregate of a day's shifts
#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub record_date: NaiveDate,
    pub oee: f64,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub output_qty: i64,
    pub defect_qty: i64,
}

/// Aggregated metrics for a machine over a date range, with each averaged
/// factor classified for gauges and summary cards
#[derive(Debug, Serialize)]
pub struct MachineSummary {
    pub machine_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: OeeSummary,
    pub oee: RatedValue,
    pub availability: RatedValue,
    pub performance: RatedValue,
    pub quality: RatedValue,
}

/// One machine's line in the plant overview grid
#[derive(Debug, Serialize)]
pub struct PlantMachineSummary {
    pub machine_id: Uuid,
    pub code: String,
    pub name: String,
    pub summary: OeeSummary,
    pub oee_level: PerformanceLevel,
    pub oee_color: StatusColor,
}

impl MetricsService {
    /// Create a new MetricsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Per-shift metrics plus the day's aggregate for one machine
    pub async fn get_daily_metrics(
        &self,
        plant_id: Uuid,
        machine_id: Uuid,
        record_date: NaiveDate,
    ) -> AppResult<DailyMetrics> {
        self.ensure_machine(plant_id, machine_id).await?;

        let rows = self
            .load_counts(plant_id, Some(machine_id), record_date, record_date)
            .await?;

        let shifts: Vec<ShiftMetrics> = rows
            .iter()
            .map(|row| {
                let metrics = row.metrics();
                ShiftMetrics {
                    shift: Shift::parse(&row.shift).unwrap_or(Shift::A),
                    metrics,
                    oee_level: classify(metrics.oee),
                    oee_color: color_for(metrics.oee),
                }
            })
            .collect();

        let all_metrics: Vec<OeeMetrics> = shifts.iter().map(|s| s.metrics).collect();

        Ok(DailyMetrics {
            machine_id,
            record_date,
            shifts,
            summary: aggregate(&all_metrics),
        })
    }

    /// One aggregated point per day over a range, for chart series
    pub async fn get_oee_trend(
        &self,
        plant_id: Uuid,
        machine_id: Uuid,
        range: &DateRange,
    ) -> AppResult<Vec<TrendPoint>> {
        validate_range(range)?;
        self.ensure_machine(plant_id, machine_id).await?;

        let rows = self
            .load_counts(plant_id, Some(machine_id), range.start, range.end)
            .await?;

        // Group shift rows by day; BTreeMap keeps the series in date order
        let mut by_date: BTreeMap<NaiveDate, Vec<OeeMetrics>> = BTreeMap::new();
        for row in &rows {
            by_date.entry(row.record_date).or_default().push(row.metrics());
        }

        Ok(by_date
            .into_iter()
            .map(|(record_date, metrics)| {
                let summary = aggregate(&metrics);
                TrendPoint {
                    record_date,
                    oee: summary.avg_oee,
                    availability: summary.avg_availability,
                    performance: summary.avg_performance,
                    quality: summary.avg_quality,
                    output_qty: summary.total_output_qty,
                    defect_qty: summary.total_defect_qty,
                }
            })
            .collect())
    }

    /// Aggregate over a range for one machine, with classifications
    pub async fn get_machine_summary(
        &self,
        plant_id: Uuid,
        machine_id: Uuid,
        range: &DateRange,
    ) -> AppResult<MachineSummary> {
        validate_range(range)?;
        self.ensure_machine(plant_id, machine_id).await?;

        let rows = self
            .load_counts(plant_id, Some(machine_id), range.start, range.end)
            .await?;

        let metrics: Vec<OeeMetrics> = rows.iter().map(|r| r.metrics()).collect();
        let summary = aggregate(&metrics);

        Ok(MachineSummary {
            machine_id,
            start_date: range.start,
            end_date: range.end,
            oee: RatedValue::new(summary.avg_oee),
            availability: RatedValue::new(summary.avg_availability),
            performance: RatedValue::new(summary.avg_performance),
            quality: RatedValue::new(summary.avg_quality),
            summary,
        })
    }

    /// Per-machine summaries across the plant for the overview grid
    pub async fn get_plant_summary(
        &self,
        plant_id: Uuid,
        range: &DateRange,
    ) -> AppResult<Vec<PlantMachineSummary>> {
        validate_range(range)?;

        let machines = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, code, name FROM machines WHERE plant_id = $1 ORDER BY code ASC",
        )
        .bind(plant_id)
        .fetch_all(&self.db)
        .await?;

        let rows = self
            .load_counts(plant_id, None, range.start, range.end)
            .await?;

        let mut by_machine: BTreeMap<Uuid, Vec<OeeMetrics>> = BTreeMap::new();
        for row in &rows {
            by_machine
                .entry(row.machine_id)
                .or_default()
                .push(row.metrics());
        }

        Ok(machines
            .into_iter()
            .map(|(machine_id, code, name)| {
                let metrics = by_machine.remove(&machine_id).unwrap_or_default();
                let summary = aggregate(&metrics);
                PlantMachineSummary {
                    machine_id,
                    code,
                    name,
                    oee_level: classify(summary.avg_oee),
                    oee_color: color_for(summary.avg_oee),
                    summary,
                }
            })
            .collect())
    }

    /// Load count rows for a plant, optionally scoped to one machine
    async fn load_counts(
        &self,
        plant_id: Uuid,
        machine_id: Option<Uuid>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<CountsRow>> {
        let rows = sqlx::query_as::<_, CountsRow>(
            r#"
            SELECT p.machine_id, p.record_date, p.shift,
                   p.planned_runtime_minutes, p.actual_runtime_minutes,
                   p.ideal_runtime_minutes, p.output_qty, p.defect_qty
            FROM production_records p
            JOIN machines m ON m.id = p.machine_id
            WHERE m.plant_id = $1
              AND ($2::uuid IS NULL OR p.machine_id = $2)
              AND p.record_date BETWEEN $3 AND $4
            ORDER BY p.record_date ASC, p.shift ASC
            "#,
        )
        .bind(plant_id)
        .bind(machine_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Verify the machine exists in the caller's plant
    async fn ensure_machine(&self, plant_id: Uuid, machine_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM machines WHERE id = $1 AND plant_id = $2",
        )
        .bind(machine_id)
        .bind(plant_id)
        .fetch_optional(&self.db)
        .await?;

        if exists.is_none() {
            return Err(AppError::NotFound("Machine".to_string()));
        }

        Ok(())
    }
}

/// Reject inverted date ranges before querying
fn validate_range(range: &DateRange) -> AppResult<()> {
    if range.start > range.end {
        return Err(AppError::Validation {
            field: "start".to_string(),
            message: "Start date must not be after end date".to_string(),
        });
    }
    Ok(())
}
