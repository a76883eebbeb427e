use crate::infra::{AppState, StudioServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use ems_studio::workflows::packages::package_router;
use ems_studio::workflows::roster::roster_router;
use ems_studio::workflows::scheduling::scheduling_router;
use ems_studio::workflows::transactions::transaction_router;
use ems_studio::workflows::waiting_list::waiting_list_router;
use serde_json::json;

/// Every workflow router plus the operational endpoints.
pub(crate) fn studio_routes(services: &StudioServices) -> Router {
    Router::new()
        .merge(package_router(services.packages.clone()))
        .merge(waiting_list_router(services.waiting_list.clone()))
        .merge(transaction_router(services.transactions.clone()))
        .merge(scheduling_router(services.scheduling.clone()))
        .merge(roster_router(services.roster.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
