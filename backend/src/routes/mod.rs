//! Route definitions for the OEE Monitoring Platform

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
///
/// Protected routers are layered with the auth middleware via
/// `from_fn_with_state` so token validation uses the loaded config.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - machine management
        .nest("/machines", machine_routes(state.clone()))
        // Protected routes - production record entry
        .nest("/production", production_routes(state.clone()))
        // Protected routes - downtime logging
        .nest("/downtime", downtime_routes(state.clone()))
        // Protected routes - OEE metrics for dashboards
        .nest("/metrics", metrics_routes(state))
}

/// Machine management routes (protected)
fn machine_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_machines).post(handlers::create_machine),
        )
        .route(
            "/:machine_id",
            get(handlers::get_machine)
                .put(handlers::update_machine)
                .delete(handlers::delete_machine),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Production record routes (protected)
fn production_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_production_records).post(handlers::record_production),
        )
        .route(
            "/:record_id",
            get(handlers::get_production_record)
                .put(handlers::update_production_record)
                .delete(handlers::delete_production_record),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Downtime logging routes (protected)
fn downtime_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_downtime_events).post(handlers::record_downtime),
        )
        .route("/summary", get(handlers::get_downtime_summary))
        .route("/:event_id", delete(handlers::delete_downtime_event))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// OEE metrics routes (protected)
fn metrics_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::get_plant_summary))
        .route("/machines/:machine_id/daily", get(handlers::get_daily_metrics))
        .route("/machines/:machine_id/trend", get(handlers::get_oee_trend))
        .route(
            "/machines/:machine_id/summary",
            get(handlers::get_machine_summary),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
