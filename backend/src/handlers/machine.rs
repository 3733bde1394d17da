//! HTTP handlers for machine management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser, UserRole};
use crate::services::machine::{
    CreateMachineInput, MachineFilter, MachineService, UpdateMachineInput,
};
use crate::AppState;
use shared::Machine;

/// List machines for the caller's plant
pub async fn list_machines(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<MachineFilter>,
) -> AppResult<Json<Vec<Machine>>> {
    let service = MachineService::new(state.db);
    let machines = service
        .list_machines(current_user.0.plant_id, &filter)
        .await?;
    Ok(Json(machines))
}

/// Create a machine (engineer or admin)
pub async fn create_machine(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateMachineInput>,
) -> AppResult<Json<Machine>> {
    require_role(&current_user.0, UserRole::Engineer)?;
    let service = MachineService::new(state.db);
    let machine = service
        .create_machine(current_user.0.plant_id, input)
        .await?;
    Ok(Json(machine))
}

/// Get machine by ID
pub async fn get_machine(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(machine_id): Path<Uuid>,
) -> AppResult<Json<Machine>> {
    let service = MachineService::new(state.db);
    let machine = service
        .get_machine(current_user.0.plant_id, machine_id)
        .await?;
    Ok(Json(machine))
}

/// Update a machine (engineer or admin)
pub async fn update_machine(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(machine_id): Path<Uuid>,
    Json(input): Json<UpdateMachineInput>,
) -> AppResult<Json<Machine>> {
    require_role(&current_user.0, UserRole::Engineer)?;
    let service = MachineService::new(state.db);
    let machine = service
        .update_machine(current_user.0.plant_id, machine_id, input)
        .await?;
    Ok(Json(machine))
}

/// Delete a machine (admin only)
pub async fn delete_machine(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(machine_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    require_role(&current_user.0, UserRole::Admin)?;
    let service = MachineService::new(state.db);
    service
        .delete_machine(current_user.0.plant_id, machine_id)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": machine_id })))
}
