use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ClientPackageId, NewPackage, PackageId};
use super::repository::{PackageRepository, SaleRecorder};
use super::service::{AssignPackage, PackageLedgerError, PackageLedgerService, RenewPackage};
use crate::workflows::roster::ClientId;
use crate::workflows::transactions::PaymentMethod;

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub client_id: ClientId,
    pub package_id: PackageId,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenewRequest {
    #[serde(default)]
    pub package_id: Option<PackageId>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub delta: i32,
    pub reason: String,
}

/// Reference day for expiry checks; defaults to the local date.
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    #[serde(default)]
    pub on: Option<NaiveDate>,
}

impl AsOfQuery {
    fn day(&self) -> NaiveDate {
        self.on.unwrap_or_else(today)
    }
}

/// Router builder exposing the package catalog and the session-credit ledger.
pub fn package_router<R, S>(service: Arc<PackageLedgerService<R, S>>) -> Router
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    Router::new()
        .route(
            "/api/v1/packages",
            post(create_package_handler::<R, S>).get(list_packages_handler::<R, S>),
        )
        .route(
            "/api/v1/packages/:package_id/deactivate",
            patch(deactivate_handler::<R, S>),
        )
        .route("/api/v1/client-packages", post(assign_handler::<R, S>))
        .route(
            "/api/v1/client-packages/:client_package_id",
            get(client_package_handler::<R, S>),
        )
        .route(
            "/api/v1/client-packages/:client_package_id/use-session",
            patch(use_session_handler::<R, S>),
        )
        .route(
            "/api/v1/client-packages/:client_package_id/renew",
            post(renew_handler::<R, S>),
        )
        .route(
            "/api/v1/client-packages/:client_package_id/adjust-sessions",
            patch(adjust_handler::<R, S>),
        )
        .route(
            "/api/v1/clients/:client_id/packages",
            get(client_history_handler::<R, S>),
        )
        .with_state(service)
}

pub(crate) async fn create_package_handler<R, S>(
    State(service): State<Arc<PackageLedgerService<R, S>>>,
    axum::Json(request): axum::Json<NewPackage>,
) -> Response
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    match service.create_package(request) {
        Ok(package) => (StatusCode::CREATED, axum::Json(package)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_packages_handler<R, S>(
    State(service): State<Arc<PackageLedgerService<R, S>>>,
) -> Response
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    match service.list_packages() {
        Ok(packages) => (StatusCode::OK, axum::Json(packages)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn deactivate_handler<R, S>(
    State(service): State<Arc<PackageLedgerService<R, S>>>,
    Path(package_id): Path<String>,
) -> Response
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    match service.deactivate_package(&PackageId(package_id)) {
        Ok(package) => (StatusCode::OK, axum::Json(package)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assign_handler<R, S>(
    State(service): State<Arc<PackageLedgerService<R, S>>>,
    axum::Json(request): axum::Json<AssignRequest>,
) -> Response
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    let assignment = AssignPackage {
        client_id: request.client_id,
        package_id: request.package_id,
        payment_method: request.payment_method,
        purchase_date: request.purchase_date.unwrap_or_else(today),
    };

    match service.assign(assignment) {
        Ok(cycle) => (StatusCode::CREATED, axum::Json(cycle)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn client_package_handler<R, S>(
    State(service): State<Arc<PackageLedgerService<R, S>>>,
    Path(client_package_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    match service.get(&ClientPackageId(client_package_id), query.day()) {
        Ok(cycle) => (StatusCode::OK, axum::Json(cycle)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn use_session_handler<R, S>(
    State(service): State<Arc<PackageLedgerService<R, S>>>,
    Path(client_package_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    match service.use_session(&ClientPackageId(client_package_id), query.day()) {
        Ok(cycle) => (StatusCode::OK, axum::Json(cycle)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn renew_handler<R, S>(
    State(service): State<Arc<PackageLedgerService<R, S>>>,
    Path(client_package_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    // Every field is optional, so an empty body renews the same package today.
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        RenewRequest::default()
    } else {
        match serde_json::from_slice::<RenewRequest>(&body) {
            Ok(request) => request,
            Err(error) => {
                let payload = json!({ "error": format!("invalid renewal request: {error}") });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        }
    };

    let renewal = RenewPackage {
        package_id: request.package_id,
        payment_method: request.payment_method,
        purchase_date: request.purchase_date.unwrap_or_else(today),
    };

    match service.renew(&ClientPackageId(client_package_id), renewal) {
        Ok(cycle) => (StatusCode::CREATED, axum::Json(cycle)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn adjust_handler<R, S>(
    State(service): State<Arc<PackageLedgerService<R, S>>>,
    Path(client_package_id): Path<String>,
    axum::Json(request): axum::Json<AdjustRequest>,
) -> Response
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    let id = ClientPackageId(client_package_id);
    match service.adjust_sessions(&id, request.delta, &request.reason) {
        Ok(cycle) => (StatusCode::OK, axum::Json(cycle)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn client_history_handler<R, S>(
    State(service): State<Arc<PackageLedgerService<R, S>>>,
    Path(client_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    match service.list_for_client(&ClientId(client_id), query.day()) {
        Ok(cycles) => (StatusCode::OK, axum::Json(cycles)).into_response(),
        Err(error) => error_response(error),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn error_response(error: PackageLedgerError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), axum::Json(payload)).into_response()
}
