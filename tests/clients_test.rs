//! Client CRUD through the HTTP surface.
//!
//! Run with: cargo test --test clients_test

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

async fn create_acme(app: &TestApp) {
    let res = app
        .post(
            "/api/clients",
            json!({
                "id": "C1",
                "name": "Acme",
                "email": "ops@acme.test",
                "country": "MA",
                "reports_enabled": true,
                "max_zones": 5
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
}

#[tokio::test]
async fn create_returns_inserted_row() {
    let app = TestApp::new().await;
    create_acme(&app).await;

    let res = app.get("/api/clients/C1").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "success");
    assert_eq!(res.body["data"]["name"], "Acme");
    assert_eq!(res.body["data"]["max_zones"], 5);
}

#[tokio::test]
async fn create_requires_id() {
    let app = TestApp::new().await;

    for body in [json!({ "name": "Nameless" }), json!({ "id": "", "name": "Blank" })] {
        let res = app.post("/api/clients", body).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            res.body,
            json!({ "status": "error", "message": "Client id is required" })
        );
    }
}

#[tokio::test]
async fn duplicate_id_is_a_database_error() {
    let app = TestApp::new().await;
    create_acme(&app).await;

    let res = app.post("/api/clients", json!({ "id": "C1" })).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["status"], "error");
    assert!(res.body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn put_without_email_clears_it() {
    let app = TestApp::new().await;
    create_acme(&app).await;

    let res = app.put("/api/clients/C1", json!({ "name": "Acme Corp" })).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["name"], "Acme Corp");
    assert!(res.body["data"]["email"].is_null());
    assert!(res.body["data"]["country"].is_null());

    let stored = app.get("/api/clients/C1").await;
    assert!(stored.body["data"]["email"].is_null());
}

#[tokio::test]
async fn put_unknown_client_is_not_found() {
    let app = TestApp::new().await;

    let res = app.put("/api/clients/nope", json!({ "name": "Ghost" })).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "Client not found");
}

#[tokio::test]
async fn list_counts_modules_including_zero() {
    let app = TestApp::new().await;
    create_acme(&app).await;
    app.post("/api/clients", json!({ "id": "C2", "name": "Empty" }))
        .await;
    for imei in ["111", "222"] {
        app.post("/api/modules", json!({ "imei": imei, "client_id": "C1" }))
            .await;
    }

    let res = app.get("/api/clients").await;
    assert_eq!(res.status, StatusCode::OK);
    let clients = res.body["data"].as_array().unwrap();
    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0]["id"], "C1");
    assert_eq!(clients[0]["modules_count"], 2);
    assert_eq!(clients[1]["id"], "C2");
    assert_eq!(clients[1]["modules_count"], 0);
}

#[tokio::test]
async fn delete_leaves_orphaned_modules() {
    let app = TestApp::new().await;
    create_acme(&app).await;
    app.post("/api/modules", json!({ "imei": "111", "client_id": "C1" }))
        .await;

    let res = app.delete("/api/clients/C1").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({ "status": "success", "message": "Client deleted successfully" })
    );

    let modules = app.get("/api/modules").await;
    let list = modules.body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["client_id"], "C1");
    assert!(list[0]["client_name"].is_null());

    let again = app.delete("/api/clients/C1").await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}
