use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Client, ClientId, Coach, StudioId};
use super::repository::RosterRepository;
use super::service::{RosterError, RosterService};

#[derive(Debug, Deserialize)]
pub struct EligibleCoachesQuery {
    pub client_id: String,
}

/// Router builder exposing roster registration and coach matching.
pub fn roster_router<R>(service: Arc<RosterService<R>>) -> Router
where
    R: RosterRepository + 'static,
{
    Router::new()
        .route("/api/v1/clients", post(register_client_handler::<R>))
        .route("/api/v1/coaches", post(register_coach_handler::<R>))
        .route(
            "/api/v1/studios/:studio_id/coaches",
            get(studio_coaches_handler::<R>),
        )
        .route(
            "/api/v1/studios/:studio_id/eligible-coaches",
            get(eligible_coaches_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn register_client_handler<R>(
    State(service): State<Arc<RosterService<R>>>,
    axum::Json(client): axum::Json<Client>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.register_client(client) {
        Ok(client) => (StatusCode::CREATED, axum::Json(client)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_coach_handler<R>(
    State(service): State<Arc<RosterService<R>>>,
    axum::Json(coach): axum::Json<Coach>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.register_coach(coach) {
        Ok(coach) => (StatusCode::CREATED, axum::Json(coach)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn studio_coaches_handler<R>(
    State(service): State<Arc<RosterService<R>>>,
    Path(studio_id): Path<String>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.coaches(&StudioId(studio_id)) {
        Ok(coaches) => (StatusCode::OK, axum::Json(coaches)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligible_coaches_handler<R>(
    State(service): State<Arc<RosterService<R>>>,
    Path(studio_id): Path<String>,
    Query(query): Query<EligibleCoachesQuery>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.eligible_coaches(&StudioId(studio_id), &ClientId(query.client_id)) {
        Ok(coaches) => (StatusCode::OK, axum::Json(coaches)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: RosterError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), axum::Json(payload)).into_response()
}
