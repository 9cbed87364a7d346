//! SMS history and batch recording.
//!
//! Run with: cargo test --test sms_test

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn batch_skips_malformed_recipients() {
    let app = TestApp::new().await;

    let res = app
        .post(
            "/api/sms",
            json!({
                "recipients": [
                    { "recipient": "A", "phone_number": "123" },
                    { "recipient": "", "phone_number": "456" },
                    { "recipient": "C" }
                ],
                "sms_type": "expiry",
                "message": "Your subscription expires soon"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body, json!({ "status": "success", "inserted": 1 }));

    let history = app.get("/api/sms").await;
    let rows = history.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["recipient"], "A");
    assert_eq!(rows[0]["phone_number"], "123");
    assert_eq!(rows[0]["sms_type"], "expiry");
}

#[tokio::test]
async fn batch_requires_recipient_list() {
    let app = TestApp::new().await;

    for body in [
        json!({ "message": "hi" }),
        json!({ "recipients": [], "message": "hi" }),
        json!({ "recipients": "A", "message": "hi" }),
    ] {
        let res = app.post("/api/sms", body).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            res.body,
            json!({ "status": "error", "message": "No recipients provided" })
        );
    }

    assert_eq!(app.get("/api/sms").await.body["data"], json!([]));
}

#[tokio::test]
async fn by_date_finds_todays_messages() {
    let app = TestApp::new().await;
    app.post(
        "/api/sms",
        json!({ "recipients": [{ "recipient": "A", "phone_number": "123" }] }),
    )
    .await;

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let res = app.get(&format!("/api/sms/by-date/{today}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 1);

    let res = app.get("/api/sms/by-date/2000-01-01").await;
    assert_eq!(res.body["data"], json!([]));
}

#[tokio::test]
async fn batch_stores_numbers_and_untrimmed_values() {
    let app = TestApp::new().await;

    let res = app
        .post(
            "/api/sms",
            json!({
                "recipients": [
                    { "recipient": "A", "phone_number": 212600000000u64 },
                    { "recipient": "  Ali  ", "phone_number": " 0600 " }
                ]
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["inserted"], 2);

    let history = app.get("/api/sms").await;
    let rows = history.body["data"].as_array().unwrap();
    let stored: Vec<(&str, &str)> = rows
        .iter()
        .map(|row| {
            (
                row["recipient"].as_str().unwrap(),
                row["phone_number"].as_str().unwrap(),
            )
        })
        .collect();
    assert!(stored.contains(&("A", "212600000000")));
    assert!(stored.contains(&("  Ali  ", " 0600 ")));
}
