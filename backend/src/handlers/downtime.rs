//! HTTP handlers for downtime logging endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::downtime::{
    DowntimeFilter, DowntimeReasonSummary, DowntimeService, RecordDowntimeInput,
};
use crate::AppState;
use shared::DowntimeEvent;

/// Record a downtime event
pub async fn record_downtime(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordDowntimeInput>,
) -> AppResult<Json<DowntimeEvent>> {
    let service = DowntimeService::new(state.db);
    let event = service
        .record_downtime(current_user.0.plant_id, input)
        .await?;
    Ok(Json(event))
}

/// List downtime events, filtered by machine and date range
pub async fn list_downtime_events(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<DowntimeFilter>,
) -> AppResult<Json<Vec<DowntimeEvent>>> {
    let service = DowntimeService::new(state.db);
    let events = service
        .list_downtime_events(current_user.0.plant_id, &filter)
        .await?;
    Ok(Json(events))
}

/// Total stoppage minutes per reason over a range
pub async fn get_downtime_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<DowntimeFilter>,
) -> AppResult<Json<Vec<DowntimeReasonSummary>>> {
    let service = DowntimeService::new(state.db);
    let summary = service
        .get_downtime_summary(current_user.0.plant_id, &filter)
        .await?;
    Ok(Json(summary))
}

/// Delete a downtime event
pub async fn delete_downtime_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let service = DowntimeService::new(state.db);
    service
        .delete_downtime_event(current_user.0.plant_id, event_id)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": event_id })))
}
