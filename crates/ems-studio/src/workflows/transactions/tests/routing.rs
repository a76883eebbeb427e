use super::common::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::transactions::domain::{PaymentMethod, TransactionType};
use crate::workflows::transactions::repository::TransactionRepository;
use crate::workflows::transactions::router::{
    confirm_payment_handler, transaction_router, ConfirmPaymentRequest,
};
use crate::workflows::transactions::service::TransactionLedgerService;
use rust_decimal_macros::dec;

#[tokio::test]
async fn create_route_records_pending_transactions() {
    let (service, _) = build_service();
    let router = transaction_router(Arc::new(service));

    let body = json!({
        "type": "income",
        "category": "retail",
        "amount": "19.90",
        "description": "protein bar",
        "occurred_on": "2025-03-04",
    });
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/transactions")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status"), Some(&json!("pending")));
    assert_eq!(payload.get("amount"), Some(&json!("19.90")));
}

#[tokio::test]
async fn summary_route_reports_net_for_explicit_window() {
    let (service, _) = build_service();
    for (kind, amount) in [
        (TransactionType::Income, dec!(100)),
        (TransactionType::Expense, dec!(30)),
        (TransactionType::Refund, dec!(10)),
    ] {
        service
            .create(new_transaction(kind, amount, Some(PaymentMethod::Cash), day(10)))
            .expect("row recorded");
    }
    let router = transaction_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/transactions/summary?from=2025-03-01&to=2025-03-31")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["summary"]["net"], json!("60"));
    assert_eq!(payload["from"], json!("2025-03-01"));
}

#[tokio::test]
async fn confirm_payment_handler_returns_conflict_when_already_paid() {
    let (service, _) = build_service();
    let paid = service
        .create(new_transaction(
            TransactionType::Income,
            dec!(50),
            Some(PaymentMethod::Card),
            day(2),
        ))
        .expect("row recorded");

    let response = confirm_payment_handler(
        State(Arc::new(service)),
        Path(paid.id.0.clone()),
        axum::Json(ConfirmPaymentRequest {
            method: PaymentMethod::Cash,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn confirm_payment_handler_returns_not_found_for_unknown_rows() {
    let (service, _) = build_service();

    let response = confirm_payment_handler(
        State(Arc::new(service)),
        Path("txn-missing".to_string()),
        axum::Json(ConfirmPaymentRequest {
            method: PaymentMethod::Cash,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn import_route_appends_csv_rows() {
    let (service, repository) = build_service();
    let router = transaction_router(Arc::new(service));
    let csv = "Date,Type,Category,Amount,Description,Payment Method\n\
2025-03-01,Income,Package Sale,100,bundle,Card\n\
2025-03-02,Expense,Cleaning,25,supplies,Cash\n";

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/transactions/import")
                .header(axum::http::header::CONTENT_TYPE, "text/csv")
                .body(axum::body::Body::from(csv))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["imported"], json!(2));
    assert_eq!(repository.all().expect("scan").len(), 2);
}

#[tokio::test]
async fn import_route_rejects_malformed_csv() {
    let (service, _) = build_service();
    let router = transaction_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/transactions/import")
                .body(axum::body::Body::from(
                    "Date,Type,Category,Amount,Description,Payment Method\nyesterday,Income,Sale,10,x,Cash\n",
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn ledger_route_reports_internal_error_when_store_is_down() {
    let service = TransactionLedgerService::new(Arc::new(UnavailableTransactions));
    let router = transaction_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/transactions")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
