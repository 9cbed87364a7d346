//! Envelope behaviour at the edges of the router.
//!
//! Run with: cargo test --test routing_test

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn welcome_message() {
    let app = TestApp::new().await;

    let res = app.get("/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({ "status": "success", "message": "Welcome to Geo5Lux Admin API" })
    );
}

#[tokio::test]
async fn healthz_reports_database() {
    let app = TestApp::new().await;

    let res = app.get("/healthz").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["database"], "up");
}

#[tokio::test]
async fn unknown_route_is_enveloped() {
    let app = TestApp::new().await;

    for uri in ["/nope", "/api/vehicles"] {
        let res = app.get(uri).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            res.body,
            json!({ "status": "error", "message": "Route not found" })
        );
    }
}

#[tokio::test]
async fn unsupported_method_is_enveloped() {
    let app = TestApp::new().await;

    let res = app.send(Method::DELETE, "/api/sms", None, None).await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.body["status"], "error");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = TestApp::new().await;

    let res = app
        .post("/api/clients", json!({ "id": "C1", "max_zones": "many" }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["status"], "error");
}
