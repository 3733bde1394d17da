//! Machine management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{validate_machine_code, validate_tact_time, Machine, MachineStatus};

/// Machine service for managing monitored machines
#[derive(Clone)]
pub struct MachineService {
    db: PgPool,
}

/// Database row for a machine
#[derive(Debug, sqlx::FromRow)]
struct MachineRow {
    id: Uuid,
    plant_id: Uuid,
    code: String,
    name: String,
    line: Option<String>,
    tact_time_minutes: f64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MachineRow> for Machine {
    fn from(row: MachineRow) -> Self {
        Machine {
            id: row.id,
            plant_id: row.plant_id,
            code: row.code,
            name: row.name,
            line: row.line,
            tact_time_minutes: row.tact_time_minutes,
            status: status_from_str(&row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a machine
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMachineInput {
    pub code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub line: Option<String>,
    pub tact_time_minutes: f64,
    pub status: Option<MachineStatus>,
}

/// Input for updating a machine
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMachineInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub line: Option<String>,
    pub tact_time_minutes: Option<f64>,
    pub status: Option<MachineStatus>,
}

/// Filter for listing machines
#[derive(Debug, Deserialize)]
pub struct MachineFilter {
    pub status: Option<MachineStatus>,
}

impl MachineService {
    /// Create a new MachineService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a machine
    pub async fn create_machine(
        &self,
        plant_id: Uuid,
        input: CreateMachineInput,
    ) -> AppResult<Machine> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        validate_machine_code(&input.code).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
        })?;

        validate_tact_time(input.tact_time_minutes).map_err(|msg| AppError::Validation {
            field: "tact_time_minutes".to_string(),
            message: msg.to_string(),
        })?;

        // Machine codes are unique within a plant
        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM machines WHERE plant_id = $1 AND code = $2",
        )
        .bind(plant_id)
        .bind(&input.code)
        .fetch_optional(&self.db)
        .await?;

        if existing.is_some() {
            return Err(AppError::DuplicateEntry("machine code".to_string()));
        }

        let status = input.status.unwrap_or(MachineStatus::Active);

        let row = sqlx::query_as::<_, MachineRow>(
            r#"
            INSERT INTO machines (plant_id, code, name, line, tact_time_minutes, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, plant_id, code, name, line, tact_time_minutes, status,
                      created_at, updated_at
            "#,
        )
        .bind(plant_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.line)
        .bind(input.tact_time_minutes)
        .bind(status.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a machine by ID
    pub async fn get_machine(&self, plant_id: Uuid, machine_id: Uuid) -> AppResult<Machine> {
        let row = sqlx::query_as::<_, MachineRow>(
            r#"
            SELECT id, plant_id, code, name, line, tact_time_minutes, status,
                   created_at, updated_at
            FROM machines
            WHERE id = $1 AND plant_id = $2
            "#,
        )
        .bind(machine_id)
        .bind(plant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Machine".to_string()))?;

        Ok(row.into())
    }

    /// List machines for a plant, optionally filtered by status
    pub async fn list_machines(
        &self,
        plant_id: Uuid,
        filter: &MachineFilter,
    ) -> AppResult<Vec<Machine>> {
        let rows = sqlx::query_as::<_, MachineRow>(
            r#"
            SELECT id, plant_id, code, name, line, tact_time_minutes, status,
                   created_at, updated_at
            FROM machines
            WHERE plant_id = $1
              AND ($2::text IS NULL OR status = $2)
            ORDER BY code ASC
            "#,
        )
        .bind(plant_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Update a machine
    pub async fn update_machine(
        &self,
        plant_id: Uuid,
        machine_id: Uuid,
        input: UpdateMachineInput,
    ) -> AppResult<Machine> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if let Some(tact_time) = input.tact_time_minutes {
            validate_tact_time(tact_time).map_err(|msg| AppError::Validation {
                field: "tact_time_minutes".to_string(),
                message: msg.to_string(),
            })?;
        }

        let current = self.get_machine(plant_id, machine_id).await?;

        let row = sqlx::query_as::<_, MachineRow>(
            r#"
            UPDATE machines
            SET name = $3, line = $4, tact_time_minutes = $5, status = $6, updated_at = NOW()
            WHERE id = $1 AND plant_id = $2
            RETURNING id, plant_id, code, name, line, tact_time_minutes, status,
                      created_at, updated_at
            "#,
        )
        .bind(machine_id)
        .bind(plant_id)
        .bind(input.name.unwrap_or(current.name))
        .bind(input.line.or(current.line))
        .bind(input.tact_time_minutes.unwrap_or(current.tact_time_minutes))
        .bind(input.status.unwrap_or(current.status).as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a machine
    ///
    /// Refused while production records still reference the machine, so
    /// history behind the dashboards cannot be orphaned.
    pub async fn delete_machine(&self, plant_id: Uuid, machine_id: Uuid) -> AppResult<()> {
        self.get_machine(plant_id, machine_id).await?;

        let record_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM production_records WHERE machine_id = $1",
        )
        .bind(machine_id)
        .fetch_one(&self.db)
        .await?;

        if record_count > 0 {
            return Err(AppError::Conflict(format!(
                "Machine has {} production records; retire it instead of deleting",
                record_count
            )));
        }

        sqlx::query("DELETE FROM downtime_events WHERE machine_id = $1")
            .bind(machine_id)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM machines WHERE id = $1 AND plant_id = $2")
            .bind(machine_id)
            .bind(plant_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Convert database string to MachineStatus
fn status_from_str(s: &str) -> MachineStatus {
    MachineStatus::parse(s).unwrap_or(MachineStatus::Retired)
}
