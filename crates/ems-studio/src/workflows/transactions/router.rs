use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use super::domain::{NewTransaction, PaymentMethod, TransactionId, TransactionType};
use super::import::TransactionCsvImporter;
use super::repository::TransactionRepository;
use super::service::{TransactionLedgerError, TransactionLedgerService};
use super::summary::LedgerWindow;

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub occurred_on: Option<NaiveDate>,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub method: PaymentMethod,
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl WindowQuery {
    fn window(&self) -> LedgerWindow {
        LedgerWindow {
            from: self.from,
            to: self.to,
        }
    }
}

/// Router builder exposing the cash-flow ledger endpoints.
pub fn transaction_router<T>(service: Arc<TransactionLedgerService<T>>) -> Router
where
    T: TransactionRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/transactions",
            post(create_handler::<T>).get(ledger_handler::<T>),
        )
        .route("/api/v1/transactions/summary", get(summary_handler::<T>))
        .route("/api/v1/transactions/import", post(import_handler::<T>))
        .route(
            "/api/v1/transactions/:transaction_id/confirm-payment",
            patch(confirm_payment_handler::<T>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<T>(
    State(service): State<Arc<TransactionLedgerService<T>>>,
    axum::Json(request): axum::Json<CreateTransactionRequest>,
) -> Response
where
    T: TransactionRepository + 'static,
{
    let transaction = NewTransaction {
        kind: request.kind,
        category: request.category,
        amount: request.amount,
        description: request.description,
        payment_method: request.payment_method,
        occurred_on: request
            .occurred_on
            .unwrap_or_else(|| Local::now().date_naive()),
        reference: request.reference,
    };

    match service.create(transaction) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ledger_handler<T>(
    State(service): State<Arc<TransactionLedgerService<T>>>,
    Query(query): Query<WindowQuery>,
) -> Response
where
    T: TransactionRepository + 'static,
{
    match service.ledger(&query.window()) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<T>(
    State(service): State<Arc<TransactionLedgerService<T>>>,
    Query(query): Query<WindowQuery>,
) -> Response
where
    T: TransactionRepository + 'static,
{
    let window = query.window();
    let window = if window.is_unbounded() {
        service.default_window(Local::now().date_naive())
    } else {
        window
    };

    match service.summary(&window) {
        Ok(summary) => {
            let payload = json!({
                "from": window.from,
                "to": window.to,
                "summary": summary,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn confirm_payment_handler<T>(
    State(service): State<Arc<TransactionLedgerService<T>>>,
    Path(transaction_id): Path<String>,
    axum::Json(request): axum::Json<ConfirmPaymentRequest>,
) -> Response
where
    T: TransactionRepository + 'static,
{
    let id = TransactionId(transaction_id);
    match service.confirm_payment(&id, request.method) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn import_handler<T>(
    State(service): State<Arc<TransactionLedgerService<T>>>,
    body: String,
) -> Response
where
    T: TransactionRepository + 'static,
{
    let transactions = match TransactionCsvImporter::from_reader(Cursor::new(body.into_bytes())) {
        Ok(transactions) => transactions,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.import(transactions) {
        Ok(records) => {
            let payload = json!({
                "imported": records.len(),
                "transactions": records,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: TransactionLedgerError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), axum::Json(payload)).into_response()
}
