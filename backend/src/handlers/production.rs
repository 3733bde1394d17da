//! HTTP handlers for production record endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::production::{
    ProductionFilter, ProductionService, RecordProductionInput, UpdateProductionInput,
};
use crate::AppState;
use shared::{PaginatedResponse, Pagination, ProductionRecord};

/// Record a shift's production counts
pub async fn record_production(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordProductionInput>,
) -> AppResult<Json<ProductionRecord>> {
    let service = ProductionService::new(state.db);
    let record = service
        .record_production(current_user.0.plant_id, input)
        .await?;
    Ok(Json(record))
}

/// Get production record by ID
pub async fn get_production_record(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<ProductionRecord>> {
    let service = ProductionService::new(state.db);
    let record = service
        .get_production_record(current_user.0.plant_id, record_id)
        .await?;
    Ok(Json(record))
}

/// List production records, filtered by machine and date range
pub async fn list_production_records(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ProductionFilter>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<PaginatedResponse<ProductionRecord>>> {
    let service = ProductionService::new(state.db);
    let records = service
        .list_production_records(current_user.0.plant_id, &filter, &pagination)
        .await?;
    Ok(Json(records))
}

/// Correct an existing production record
pub async fn update_production_record(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
    Json(input): Json<UpdateProductionInput>,
) -> AppResult<Json<ProductionRecord>> {
    let service = ProductionService::new(state.db);
    let record = service
        .update_production_record(current_user.0.plant_id, record_id, input)
        .await?;
    Ok(Json(record))
}

/// Delete a production record
pub async fn delete_production_record(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let service = ProductionService::new(state.db);
    service
        .delete_production_record(current_user.0.plant_id, record_id)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": record_id })))
}
