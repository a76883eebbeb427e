use super::common::*;
use axum::http::StatusCode;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::packages::router::package_router;

#[tokio::test]
async fn assign_route_returns_created_cycle() {
    let (service, _, _) = build_service();
    let package = service
        .create_package(new_package("Ten EMS", 10, dec!(450)))
        .expect("package created");
    let router = package_router(Arc::new(service));

    let body = json!({
        "client_id": "client-7",
        "package_id": package.id.0,
        "payment_method": "card",
        "purchase_date": "2025-01-10",
    });
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/client-packages")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["sessions_remaining"], json!(10));
    assert_eq!(payload["status"], json!("active"));
    assert_eq!(payload["expiry_date"], json!("2025-04-10"));
}

#[tokio::test]
async fn use_session_route_reports_conflict_once_depleted() {
    let (service, _, _) = build_service();
    let package = service
        .create_package(new_package("Single", 1, dec!(50)))
        .expect("package created");
    let cycle = service
        .assign(assignment(&package.id, None))
        .expect("assigned");
    let router = package_router(Arc::new(service));
    let uri = format!("/api/v1/client-packages/{}/use-session?on=2025-01-11", cycle.id.0);

    let first = router
        .clone()
        .oneshot(
            axum::http::Request::patch(uri.as_str())
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(read_json_body(first).await["status"], json!("depleted"));

    let second = router
        .oneshot(
            axum::http::Request::patch(uri.as_str())
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let payload = read_json_body(second).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("depleted"));
}

#[tokio::test]
async fn adjust_route_rejects_negative_balance() {
    let (service, _, _) = build_service();
    let package = service
        .create_package(new_package("Single", 1, dec!(50)))
        .expect("package created");
    let cycle = service
        .assign(assignment(&package.id, None))
        .expect("assigned");
    let router = package_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::patch(format!(
                "/api/v1/client-packages/{}/adjust-sessions",
                cycle.id.0
            ))
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                r#"{"delta": -5, "reason": "double booking"}"#,
            ))
            .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn client_history_route_lists_cycles() {
    let (service, _, _) = build_service();
    let package = service
        .create_package(new_package("Ten EMS", 10, dec!(450)))
        .expect("package created");
    service
        .assign(assignment(&package.id, None))
        .expect("assigned");
    let router = package_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/clients/client-1/packages?on=2025-06-01")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));
    assert_eq!(payload[0]["status"], json!("expired"));
}

#[tokio::test]
async fn unknown_client_package_returns_not_found() {
    let (service, _, _) = build_service();
    let router = package_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/client-packages/cpk-missing")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn renew_route_accepts_bare_post_without_body() {
    let (service, _, sales) = build_service();
    let package = service
        .create_package(new_package("Ten EMS", 10, dec!(450)))
        .expect("package created");
    let cycle = service
        .assign(assignment(&package.id, None))
        .expect("assigned");
    let router = package_router(Arc::new(service));
    let uri = format!("/api/v1/client-packages/{}/renew", cycle.id.0);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::post(uri.as_str())
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["package_id"], json!(package.id.0));
    assert_eq!(payload["renewed_from"], json!(cycle.id.0));
    assert_eq!(sales.sales().len(), 2);

    let malformed = router
        .oneshot(
            axum::http::Request::post(uri.as_str())
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from("{\"package_id\": 7"))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(malformed.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
