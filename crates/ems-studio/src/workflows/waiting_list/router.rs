use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{QueueFilter, WaitingListEntryId, WaitingListRequest, WaitingListStatus};
use super::repository::{Notifier, WaitingListRepository};
use super::service::{WaitingListError, WaitingListService};
use crate::workflows::roster::StudioId;

#[derive(Debug, Default, Deserialize)]
pub struct QueueQuery {
    #[serde(default)]
    pub studio_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriorityRequest {
    pub priority: i32,
}

/// Staff actions exposed as `PATCH /api/v1/waiting-list/:id/<action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueueAction {
    Approve,
    Reject,
    Notify,
    Book,
}

/// Router builder exposing the waiting-list queue.
pub fn waiting_list_router<W, N>(service: Arc<WaitingListService<W, N>>) -> Router
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/waiting-list",
            post(request_handler::<W, N>).get(list_handler::<W, N>),
        )
        .route(
            "/api/v1/waiting-list/:entry_id",
            get(entry_handler::<W, N>).delete(delete_handler::<W, N>),
        )
        .route(
            "/api/v1/waiting-list/:entry_id/approve",
            patch(approve_handler::<W, N>),
        )
        .route(
            "/api/v1/waiting-list/:entry_id/reject",
            patch(reject_handler::<W, N>),
        )
        .route(
            "/api/v1/waiting-list/:entry_id/notify",
            patch(notify_handler::<W, N>),
        )
        .route(
            "/api/v1/waiting-list/:entry_id/book",
            patch(book_handler::<W, N>),
        )
        .route(
            "/api/v1/waiting-list/:entry_id/priority",
            patch(priority_handler::<W, N>),
        )
        .with_state(service)
}

pub(crate) async fn request_handler<W, N>(
    State(service): State<Arc<WaitingListService<W, N>>>,
    axum::Json(request): axum::Json<WaitingListRequest>,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    match service.request(request) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<W, N>(
    State(service): State<Arc<WaitingListService<W, N>>>,
    Query(query): Query<QueueQuery>,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    let status = match query.status.as_deref().map(WaitingListStatus::parse) {
        None => None,
        Some(Some(status)) => Some(status),
        Some(None) => {
            let payload = json!({ "error": "unknown waiting list status" });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };
    let filter = QueueFilter {
        studio_id: query.studio_id.map(StudioId),
        status,
    };

    match service.list(&filter) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn entry_handler<W, N>(
    State(service): State<Arc<WaitingListService<W, N>>>,
    Path(entry_id): Path<String>,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    match service.get(&WaitingListEntryId(entry_id)) {
        Ok(entry) => (StatusCode::OK, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<W, N>(
    State(service): State<Arc<WaitingListService<W, N>>>,
    Path(entry_id): Path<String>,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    match service.delete(&WaitingListEntryId(entry_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<W, N>(
    state: State<Arc<WaitingListService<W, N>>>,
    path: Path<String>,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    apply_action(state, path, QueueAction::Approve)
}

pub(crate) async fn reject_handler<W, N>(
    state: State<Arc<WaitingListService<W, N>>>,
    path: Path<String>,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    apply_action(state, path, QueueAction::Reject)
}

pub(crate) async fn notify_handler<W, N>(
    state: State<Arc<WaitingListService<W, N>>>,
    path: Path<String>,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    apply_action(state, path, QueueAction::Notify)
}

pub(crate) async fn book_handler<W, N>(
    state: State<Arc<WaitingListService<W, N>>>,
    path: Path<String>,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    apply_action(state, path, QueueAction::Book)
}

fn apply_action<W, N>(
    State(service): State<Arc<WaitingListService<W, N>>>,
    Path(entry_id): Path<String>,
    action: QueueAction,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    let id = WaitingListEntryId(entry_id);
    let result = match action {
        QueueAction::Approve => service.approve(&id),
        QueueAction::Reject => service.reject(&id),
        QueueAction::Notify => service.notify(&id),
        QueueAction::Book => service.mark_as_booked(&id),
    };

    match result {
        Ok(entry) => (StatusCode::OK, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn priority_handler<W, N>(
    State(service): State<Arc<WaitingListService<W, N>>>,
    Path(entry_id): Path<String>,
    axum::Json(request): axum::Json<PriorityRequest>,
) -> Response
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    match service.update_priority(&WaitingListEntryId(entry_id), request.priority) {
        Ok(entry) => (StatusCode::OK, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: WaitingListError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), axum::Json(payload)).into_response()
}
