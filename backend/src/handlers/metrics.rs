//! HTTP handlers for OEE metrics endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::metrics::{
    DailyMetrics, MachineSummary, MetricsService, PlantMachineSummary, TrendPoint,
};
use crate::AppState;
use shared::DateRange;

/// Query parameter for the daily metrics endpoint
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: NaiveDate,
}

/// Per-shift metrics plus the day's aggregate for one machine
pub async fn get_daily_metrics(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(machine_id): Path<Uuid>,
    Query(query): Query<DailyQuery>,
) -> AppResult<Json<DailyMetrics>> {
    let service = MetricsService::new(state.db);
    let metrics = service
        .get_daily_metrics(current_user.0.plant_id, machine_id, query.date)
        .await?;
    Ok(Json(metrics))
}

/// One aggregated point per day for chart series
pub async fn get_oee_trend(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(machine_id): Path<Uuid>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Vec<TrendPoint>>> {
    let service = MetricsService::new(state.db);
    let trend = service
        .get_oee_trend(current_user.0.plant_id, machine_id, &range)
        .await?;
    Ok(Json(trend))
}

/// Aggregate over a range for one machine, with classifications
pub async fn get_machine_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(machine_id): Path<Uuid>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<MachineSummary>> {
    let service = MetricsService::new(state.db);
    let summary = service
        .get_machine_summary(current_user.0.plant_id, machine_id, &range)
        .await?;
    Ok(Json(summary))
}

/// Per-machine summaries across the plant for the overview grid
pub async fn get_plant_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Vec<PlantMachineSummary>>> {
    let service = MetricsService::new(state.db);
    let summary = service
        .get_plant_summary(current_user.0.plant_id, &range)
        .await?;
    Ok(Json(summary))
}
