//! Production record service
//!
//! Accepts raw shift counts from operators, derives the OEE factors via the
//! shared calculator, and caches them on the row. The counts stay the source
//! of truth: every write recomputes the factors server-side and any
//! client-supplied factor values are ignored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    ideal_runtime_for_output, validate_production_counts, validate_runtime_minutes, OeeMetrics,
    PaginatedResponse, Pagination, PaginationMeta, ProductionRecord, Shift,
};

/// Production service for shift-level production records
#[derive(Clone)]
pub struct ProductionService {
    db: PgPool,
}

/// Database row for a production record
#[derive(Debug, sqlx::FromRow)]
struct ProductionRow {
    id: Uuid,
    machine_id: Uuid,
    record_date: NaiveDate,
    shift: String,
    planned_runtime_minutes: i32,
    actual_runtime_minutes: i32,
    ideal_runtime_minutes: i32,
    output_qty: i32,
    defect_qty: i32,
    availability: f64,
    performance: f64,
    quality: f64,
    oee: f64,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductionRow> for ProductionRecord {
    fn from(row: ProductionRow) -> Self {
        ProductionRecord {
            id: row.id,
            machine_id: row.machine_id,
            record_date: row.record_date,
            shift: Shift::parse(&row.shift).unwrap_or(Shift::A),
            planned_runtime_minutes: row.planned_runtime_minutes,
            actual_runtime_minutes: row.actual_runtime_minutes,
            ideal_runtime_minutes: row.ideal_runtime_minutes,
            output_qty: row.output_qty,
            defect_qty: row.defect_qty,
            availability: row.availability,
            performance: row.performance,
            quality: row.quality,
            oee: row.oee,
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for recording a shift's production
#[derive(Debug, Deserialize, Validate)]
pub struct RecordProductionInput {
    pub machine_id: Uuid,
    pub record_date: NaiveDate,
    pub shift: Shift,
    pub planned_runtime_minutes: i32,
    pub actual_runtime_minutes: i32,
    pub output_qty: i32,
    pub defect_qty: i32,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Input for correcting an existing record
///
/// Carries the full field set; the stored row is replaced wholesale, so an
/// omitted `note` clears the existing one.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductionInput {
    pub planned_runtime_minutes: i32,
    pub actual_runtime_minutes: i32,
    pub output_qty: i32,
    pub defect_qty: i32,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Filter for listing production records
#[derive(Debug, Deserialize)]
pub struct ProductionFilter {
    pub machine_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ProductionService {
    /// Create a new ProductionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a shift's production counts
    pub async fn record_production(
        &self,
        plant_id: Uuid,
        input: RecordProductionInput,
    ) -> AppResult<ProductionRecord> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        validate_runtimes(input.planned_runtime_minutes, input.actual_runtime_minutes)?;
        validate_production_counts(input.output_qty, input.defect_qty).map_err(|msg| {
            AppError::Validation {
                field: "defect_qty".to_string(),
                message: msg.to_string(),
            }
        })?;

        // Machine must exist in the caller's plant; its tact time drives the
        // ideal runtime
        let tact_time = self.machine_tact_time(plant_id, input.machine_id).await?;

        // One record per (machine, date, shift)
        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM production_records
            WHERE machine_id = $1 AND record_date = $2 AND shift = $3
            "#,
        )
        .bind(input.machine_id)
        .bind(input.record_date)
        .bind(input.shift.as_str())
        .fetch_optional(&self.db)
        .await?;

        if existing.is_some() {
            return Err(AppError::DuplicateEntry(
                "production record for this machine, date, and shift".to_string(),
            ));
        }

        let metrics = derive_metrics(
            input.actual_runtime_minutes,
            input.planned_runtime_minutes,
            input.output_qty,
            input.defect_qty,
            tact_time,
        );

        let row = sqlx::query_as::<_, ProductionRow>(
            r#"
            INSERT INTO production_records (
                machine_id, record_date, shift,
                planned_runtime_minutes, actual_runtime_minutes, ideal_runtime_minutes,
                output_qty, defect_qty,
                availability, performance, quality, oee, note
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, machine_id, record_date, shift,
                      planned_runtime_minutes, actual_runtime_minutes, ideal_runtime_minutes,
                      output_qty, defect_qty,
                      availability, performance, quality, oee, note,
                      created_at, updated_at
            "#,
        )
        .bind(input.machine_id)
        .bind(input.record_date)
        .bind(input.shift.as_str())
        .bind(metrics.planned_runtime_minutes)
        .bind(metrics.actual_runtime_minutes)
        .bind(metrics.ideal_runtime_minutes)
        .bind(metrics.output_qty)
        .bind(metrics.defect_qty)
        .bind(metrics.availability)
        .bind(metrics.performance)
        .bind(metrics.quality)
        .bind(metrics.oee)
        .bind(&input.note)
        .fetch_one(&self.db)
        .await
        .map_err(insert_conflict)?;

        Ok(row.into())
    }

    /// Get a production record by ID
    pub async fn get_production_record(
        &self,
        plant_id: Uuid,
        record_id: Uuid,
    ) -> AppResult<ProductionRecord> {
        let row = sqlx::query_as::<_, ProductionRow>(
            r#"
            SELECT p.id, p.machine_id, p.record_date, p.shift,
                   p.planned_runtime_minutes, p.actual_runtime_minutes, p.ideal_runtime_minutes,
                   p.output_qty, p.defect_qty,
                   p.availability, p.performance, p.quality, p.oee, p.note,
                   p.created_at, p.updated_at
            FROM production_records p
            JOIN machines m ON m.id = p.machine_id
            WHERE p.id = $1 AND m.plant_id = $2
            "#,
        )
        .bind(record_id)
        .bind(plant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Production record".to_string()))?;

        Ok(row.into())
    }

    /// List production records, optionally filtered by machine and date range
    pub async fn list_production_records(
        &self,
        plant_id: Uuid,
        filter: &ProductionFilter,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<ProductionRecord>> {
        let page = pagination.page.max(1);
        let per_page = pagination.per_page.clamp(1, 100);
        let offset = (page as i64 - 1) * per_page as i64;

        let total_items = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM production_records p
            JOIN machines m ON m.id = p.machine_id
            WHERE m.plant_id = $1
              AND ($2::uuid IS NULL OR p.machine_id = $2)
              AND ($3::date IS NULL OR p.record_date >= $3)
              AND ($4::date IS NULL OR p.record_date <= $4)
            "#,
        )
        .bind(plant_id)
        .bind(filter.machine_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, ProductionRow>(
            r#"
            SELECT p.id, p.machine_id, p.record_date, p.shift,
                   p.planned_runtime_minutes, p.actual_runtime_minutes, p.ideal_runtime_minutes,
                   p.output_qty, p.defect_qty,
                   p.availability, p.performance, p.quality, p.oee, p.note,
                   p.created_at, p.updated_at
            FROM production_records p
            JOIN machines m ON m.id = p.machine_id
            WHERE m.plant_id = $1
              AND ($2::uuid IS NULL OR p.machine_id = $2)
              AND ($3::date IS NULL OR p.record_date >= $3)
              AND ($4::date IS NULL OR p.record_date <= $4)
            ORDER BY p.record_date DESC, p.shift ASC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(plant_id)
        .bind(filter.machine_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        let total_items = total_items.max(0) as u64;
        let total_pages = (total_items.div_ceil(per_page as u64)) as u32;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(|r| r.into()).collect(),
            pagination: PaginationMeta {
                page,
                per_page,
                total_items,
                total_pages,
            },
        })
    }

    /// Correct an existing production record, recomputing the cached factors
    pub async fn update_production_record(
        &self,
        plant_id: Uuid,
        record_id: Uuid,
        input: UpdateProductionInput,
    ) -> AppResult<ProductionRecord> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        validate_runtimes(input.planned_runtime_minutes, input.actual_runtime_minutes)?;
        validate_production_counts(input.output_qty, input.defect_qty).map_err(|msg| {
            AppError::Validation {
                field: "defect_qty".to_string(),
                message: msg.to_string(),
            }
        })?;

        let current = self.get_production_record(plant_id, record_id).await?;
        let tact_time = self.machine_tact_time(plant_id, current.machine_id).await?;

        let metrics = derive_metrics(
            input.actual_runtime_minutes,
            input.planned_runtime_minutes,
            input.output_qty,
            input.defect_qty,
            tact_time,
        );

        let row = sqlx::query_as::<_, ProductionRow>(
            r#"
            UPDATE production_records
            SET planned_runtime_minutes = $2, actual_runtime_minutes = $3,
                ideal_runtime_minutes = $4, output_qty = $5, defect_qty = $6,
                availability = $7, performance = $8, quality = $9, oee = $10,
                note = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING id, machine_id, record_date, shift,
                      planned_runtime_minutes, actual_runtime_minutes, ideal_runtime_minutes,
                      output_qty, defect_qty,
                      availability, performance, quality, oee, note,
                      created_at, updated_at
            "#,
        )
        .bind(record_id)
        .bind(metrics.planned_runtime_minutes)
        .bind(metrics.actual_runtime_minutes)
        .bind(metrics.ideal_runtime_minutes)
        .bind(metrics.output_qty)
        .bind(metrics.defect_qty)
        .bind(metrics.availability)
        .bind(metrics.performance)
        .bind(metrics.quality)
        .bind(metrics.oee)
        .bind(&input.note)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a production record
    pub async fn delete_production_record(
        &self,
        plant_id: Uuid,
        record_id: Uuid,
    ) -> AppResult<()> {
        self.get_production_record(plant_id, record_id).await?;

        sqlx::query("DELETE FROM production_records WHERE id = $1")
            .bind(record_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Look up a machine's tact time, scoped to the caller's plant
    async fn machine_tact_time(&self, plant_id: Uuid, machine_id: Uuid) -> AppResult<f64> {
        sqlx::query_scalar::<_, f64>(
            "SELECT tact_time_minutes FROM machines WHERE id = $1 AND plant_id = $2",
        )
        .bind(machine_id)
        .bind(plant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Machine".to_string()))
    }
}

/// Postgres error code for a unique constraint violation
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Map a unique-index violation on insert to the duplicate-entry conflict
///
/// The pre-insert existence check races with concurrent inserts; when the
/// (machine, date, shift) index fires instead, the caller still gets a 409.
fn insert_conflict(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(PG_UNIQUE_VIOLATION) => {
            AppError::DuplicateEntry(
                "production record for this machine, date, and shift".to_string(),
            )
        }
        _ => AppError::DatabaseError(err),
    }
}

/// Validate runtime minute fields
fn validate_runtimes(planned: i32, actual: i32) -> AppResult<()> {
    validate_runtime_minutes(planned).map_err(|msg| AppError::Validation {
        field: "planned_runtime_minutes".to_string(),
        message: msg.to_string(),
    })?;
    validate_runtime_minutes(actual).map_err(|msg| AppError::Validation {
        field: "actual_runtime_minutes".to_string(),
        message: msg.to_string(),
    })?;
    Ok(())
}

/// Derive the full cached metric set from raw counts and the machine's tact time
fn derive_metrics(
    actual_runtime_minutes: i32,
    planned_runtime_minutes: i32,
    output_qty: i32,
    defect_qty: i32,
    tact_time_minutes: f64,
) -> OeeMetrics {
    let ideal_runtime =
        ideal_runtime_for_output(output_qty as f64, tact_time_minutes).round() as i32;

    OeeMetrics::from_counts(
        actual_runtime_minutes,
        planned_runtime_minutes,
        ideal_runtime,
        output_qty,
        defect_qty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_without_note_clears_it() {
        // The update replaces the full field set, so an omitted note must
        // deserialize to None and be persisted as NULL, not keep the old one
        let input: UpdateProductionInput = serde_json::from_value(serde_json::json!({
            "planned_runtime_minutes": 480,
            "actual_runtime_minutes": 450,
            "output_qty": 900,
            "defect_qty": 10
        }))
        .unwrap();
        assert_eq!(input.note, None);

        let explicit_null: UpdateProductionInput = serde_json::from_value(serde_json::json!({
            "planned_runtime_minutes": 480,
            "actual_runtime_minutes": 450,
            "output_qty": 900,
            "defect_qty": 10,
            "note": null
        }))
        .unwrap();
        assert_eq!(explicit_null.note, None);
    }

    #[test]
    fn insert_conflict_passes_through_other_database_errors() {
        let mapped = insert_conflict(sqlx::Error::RowNotFound);
        assert!(matches!(mapped, AppError::DatabaseError(_)));
    }

    #[test]
    fn unique_violation_code_is_the_postgres_one() {
        assert_eq!(PG_UNIQUE_VIOLATION, "23505");
    }

    #[test]
    fn derive_metrics_rounds_ideal_runtime_to_whole_minutes() {
        let metrics = derive_metrics(450, 480, 900, 10, 0.45);
        assert_eq!(metrics.ideal_runtime_minutes, 405);

        let fractional = derive_metrics(450, 480, 901, 10, 0.45);
        assert_eq!(fractional.ideal_runtime_minutes, 405); // 405.45 rounds down
    }
}
