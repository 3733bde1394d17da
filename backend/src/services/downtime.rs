//! Downtime logging service

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{validate_downtime_duration, DowntimeEvent, DowntimeReason, Shift};

/// Downtime service for stoppage events and reason breakdowns
#[derive(Clone)]
pub struct DowntimeService {
    db: PgPool,
}

/// Database row for a downtime event
#[derive(Debug, sqlx::FromRow)]
struct DowntimeRow {
    id: Uuid,
    machine_id: Uuid,
    record_date: NaiveDate,
    shift: String,
    reason: String,
    duration_minutes: i32,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DowntimeRow> for DowntimeEvent {
    fn from(row: DowntimeRow) -> Self {
        DowntimeEvent {
            id: row.id,
            machine_id: row.machine_id,
            record_date: row.record_date,
            shift: Shift::parse(&row.shift).unwrap_or(Shift::A),
            reason: DowntimeReason::parse(&row.reason).unwrap_or(DowntimeReason::Other),
            duration_minutes: row.duration_minutes,
            note: row.note,
            created_at: row.created_at,
        }
    }
}

/// Input for recording a downtime event
#[derive(Debug, Deserialize, Validate)]
pub struct RecordDowntimeInput {
    pub machine_id: Uuid,
    pub record_date: NaiveDate,
    pub shift: Shift,
    pub reason: DowntimeReason,
    pub duration_minutes: i32,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Filter for listing downtime events
#[derive(Debug, Deserialize)]
pub struct DowntimeFilter {
    pub machine_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Total stoppage minutes per reason category over a range
#[derive(Debug, Serialize)]
pub struct DowntimeReasonSummary {
    pub reason: DowntimeReason,
    pub total_minutes: i64,
    pub event_count: i64,
}

impl DowntimeService {
    /// Create a new DowntimeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a downtime event
    pub async fn record_downtime(
        &self,
        plant_id: Uuid,
        input: RecordDowntimeInput,
    ) -> AppResult<DowntimeEvent> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        validate_downtime_duration(input.duration_minutes).map_err(|msg| {
            AppError::Validation {
                field: "duration_minutes".to_string(),
                message: msg.to_string(),
            }
        })?;

        // Machine must exist in the caller's plant
        let machine = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM machines WHERE id = $1 AND plant_id = $2",
        )
        .bind(input.machine_id)
        .bind(plant_id)
        .fetch_optional(&self.db)
        .await?;

        if machine.is_none() {
            return Err(AppError::NotFound("Machine".to_string()));
        }

        let row = sqlx::query_as::<_, DowntimeRow>(
            r#"
            INSERT INTO downtime_events (
                machine_id, record_date, shift, reason, duration_minutes, note
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, machine_id, record_date, shift, reason, duration_minutes,
                      note, created_at
            "#,
        )
        .bind(input.machine_id)
        .bind(input.record_date)
        .bind(input.shift.as_str())
        .bind(input.reason.as_str())
        .bind(input.duration_minutes)
        .bind(&input.note)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List downtime events, optionally filtered by machine and date range
    pub async fn list_downtime_events(
        &self,
        plant_id: Uuid,
        filter: &DowntimeFilter,
    ) -> AppResult<Vec<DowntimeEvent>> {
        let rows = sqlx::query_as::<_, DowntimeRow>(
            r#"
            SELECT d.id, d.machine_id, d.record_date, d.shift, d.reason,
                   d.duration_minutes, d.note, d.created_at
            FROM downtime_events d
            JOIN machines m ON m.id = d.machine_id
            WHERE m.plant_id = $1
              AND ($2::uuid IS NULL OR d.machine_id = $2)
              AND ($3::date IS NULL OR d.record_date >= $3)
              AND ($4::date IS NULL OR d.record_date <= $4)
            ORDER BY d.record_date DESC, d.created_at DESC
            "#,
        )
        .bind(plant_id)
        .bind(filter.machine_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Total stoppage minutes and event counts per reason over a range
    pub async fn get_downtime_summary(
        &self,
        plant_id: Uuid,
        filter: &DowntimeFilter,
    ) -> AppResult<Vec<DowntimeReasonSummary>> {
        let rows = sqlx::query_as::<_, (String, i64, i64)>(
            r#"
            SELECT d.reason,
                   COALESCE(SUM(d.duration_minutes), 0) as total_minutes,
                   COUNT(*) as event_count
            FROM downtime_events d
            JOIN machines m ON m.id = d.machine_id
            WHERE m.plant_id = $1
              AND ($2::uuid IS NULL OR d.machine_id = $2)
              AND ($3::date IS NULL OR d.record_date >= $3)
              AND ($4::date IS NULL OR d.record_date <= $4)
            GROUP BY d.reason
            ORDER BY total_minutes DESC
            "#,
        )
        .bind(plant_id)
        .bind(filter.machine_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(reason, total_minutes, event_count)| DowntimeReasonSummary {
                reason: DowntimeReason::parse(&reason).unwrap_or(DowntimeReason::Other),
                total_minutes,
                event_count,
            })
            .collect())
    }

    /// Delete a downtime event
    pub async fn delete_downtime_event(&self, plant_id: Uuid, event_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM downtime_events d
            USING machines m
            WHERE d.id = $1 AND m.id = d.machine_id AND m.plant_id = $2
            "#,
        )
        .bind(event_id)
        .bind(plant_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Downtime event".to_string()));
        }

        Ok(())
    }
}
