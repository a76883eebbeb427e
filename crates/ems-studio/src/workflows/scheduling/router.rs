use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{SessionId, SessionRequest};
use super::repository::SessionRepository;
use super::service::{SchedulingError, SchedulingService};
use crate::workflows::roster::{CoachId, RosterRepository};

/// Router builder exposing session booking.
///
/// Booking a session does not touch the waiting list; callers follow up with
/// `PATCH /api/v1/waiting-list/:id/book` once the session exists.
pub fn scheduling_router<S, R>(service: Arc<SchedulingService<S, R>>) -> Router
where
    S: SessionRepository + 'static,
    R: RosterRepository + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(book_handler::<S, R>))
        .route("/api/v1/sessions/:session_id", get(session_handler::<S, R>))
        .route(
            "/api/v1/coaches/:coach_id/sessions",
            get(coach_sessions_handler::<S, R>),
        )
        .with_state(service)
}

pub(crate) async fn book_handler<S, R>(
    State(service): State<Arc<SchedulingService<S, R>>>,
    axum::Json(request): axum::Json<SessionRequest>,
) -> Response
where
    S: SessionRepository + 'static,
    R: RosterRepository + 'static,
{
    match service.book(request) {
        Ok(session) => (StatusCode::CREATED, axum::Json(session)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<S, R>(
    State(service): State<Arc<SchedulingService<S, R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionRepository + 'static,
    R: RosterRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn coach_sessions_handler<S, R>(
    State(service): State<Arc<SchedulingService<S, R>>>,
    Path(coach_id): Path<String>,
) -> Response
where
    S: SessionRepository + 'static,
    R: RosterRepository + 'static,
{
    match service.for_coach(&CoachId(coach_id)) {
        Ok(sessions) => (StatusCode::OK, axum::Json(sessions)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: SchedulingError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), axum::Json(payload)).into_response()
}
