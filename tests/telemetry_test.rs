//! Read side: diagnostics, anomalies, signals and renewals.
//!
//! Run with: cargo test --test telemetry_test

mod common;

use axum::http::StatusCode;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;

use common::{TestApp, at, day};
use fleet_admin::entity::{anomalies, diagnostics, signals};

const IMEI: &str = "356000000000001";

async fn seeded() -> TestApp {
    let app = TestApp::new().await;
    app.post("/api/clients", json!({ "id": "C1", "name": "Acme" }))
        .await;
    app.post(
        "/api/modules",
        json!({ "imei": IMEI, "client_id": "C1", "vehicle_name": "Truck 7" }),
    )
    .await;

    for (time, icon) in [
        (at(2026, 3, 1, 8, 0), Some("D")),
        (at(2026, 3, 1, 12, 30), Some("W")),
        (at(2026, 3, 1, 23, 59), None),
        (at(2026, 3, 2, 0, 0), Some("A")),
    ] {
        diagnostics::ActiveModel {
            imei: Set(IMEI.to_string()),
            record_time: Set(time),
            status_icon: Set(icon.map(str::to_string)),
            speed_kmh: Set(Some(42.0)),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap();
    }

    for (created_at, alerts) in [(at(2026, 3, 1, 9, 0), 2), (at(2026, 3, 1, 18, 0), 7)] {
        anomalies::ActiveModel {
            imei: Set(IMEI.to_string()),
            anomaly_type: Set(Some("fuel_drop".to_string())),
            alert_count: Set(alerts),
            created_at: Set(created_at),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap();
    }

    app
}

#[tokio::test]
async fn diagnostics_by_date_covers_exactly_one_day() {
    let app = seeded().await;

    let res = app
        .get(&format!("/api/diagnostics/by-date/{IMEI}?date=2026-03-01"))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let rows = res.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["record_time"], "2026-03-01T08:00:00");
    assert_eq!(rows[2]["record_time"], "2026-03-01T23:59:00");
    assert_eq!(rows[0]["client_name"], "Acme");
    assert_eq!(res.body["totalAlerts"], 2);
}

#[tokio::test]
async fn date_scoped_endpoints_reject_bad_dates() {
    let app = seeded().await;
    let expected = json!({
        "status": "error",
        "message": "Invalid or missing date. Use YYYY-MM-DD."
    });

    for uri in [
        format!("/api/diagnostics/by-date/{IMEI}"),
        format!("/api/diagnostics/by-date/{IMEI}?date=2026-3-1"),
        format!("/api/diagnostics/by-date/{IMEI}?date=2026-02-30"),
        "/api/sms/by-date/01-03-2026".to_string(),
    ] {
        let res = app.get(&uri).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(res.body, expected, "{uri}");
    }

    let res = app
        .post("/api/anomalies/search-by-date", json!({ "date": "yesterday" }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, expected);
}

#[tokio::test]
async fn latest_diagnostics_per_module() {
    let app = seeded().await;

    let res = app.get(&format!("/api/diagnostics/{IMEI}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["record_time"], "2026-03-02T00:00:00");

    let all = app.get("/api/diagnostics").await;
    assert_eq!(all.body["data"].as_array().unwrap().len(), 4);

    let missing = app.get("/api/diagnostics/000").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(
        missing.body["message"],
        "No diagnostics data found for this module"
    );
}

#[tokio::test]
async fn anomalies_list_worst_first() {
    let app = seeded().await;

    let res = app.get("/api/anomalies").await;
    let rows = res.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["alert_count"], 7);
    assert_eq!(rows[0]["client_name"], "Acme");
}

#[tokio::test]
async fn module_anomalies_come_from_diagnostics() {
    let app = seeded().await;

    let res = app.get(&format!("/api/anomalies/{IMEI}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["count"], 2);
    let rows = res.body["data"].as_array().unwrap();
    assert_eq!(rows[0]["status_icon"], "A");
    assert_eq!(rows[1]["status_icon"], "W");

    let none = app.get("/api/anomalies/000").await;
    assert_eq!(none.status, StatusCode::NOT_FOUND);
    assert_eq!(
        none.body["message"],
        "No anomalies found for this module (from diagnostics)"
    );
}

#[tokio::test]
async fn anomaly_search_by_date() {
    let app = seeded().await;

    let res = app
        .post("/api/anomalies/search-by-date", json!({ "date": "2026-03-01" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let rows = res.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["alert_count"], 7);
    assert_eq!(rows[0]["module_name"], "Truck 7");
    assert!(res.body.get("message").is_none());
}

#[tokio::test]
async fn empty_anomaly_search_is_success() {
    let app = seeded().await;

    let res = app
        .post("/api/anomalies/search-by-date", json!({ "date": "2026-03-05" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({
            "status": "success",
            "data": [],
            "message": "No anomalies found for this date."
        })
    );
}

#[tokio::test]
async fn latest_signal_per_module() {
    let app = seeded().await;
    for since in [at(2026, 2, 20, 6, 0), at(2026, 2, 27, 6, 0)] {
        signals::ActiveModel {
            imei: Set(IMEI.to_string()),
            no_signal_since: Set(since),
            status: Set(Some("offline".to_string())),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap();
    }

    let res = app.get(&format!("/api/signals/{IMEI}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["no_signal_since"], "2026-02-27T06:00:00");
    assert_eq!(res.body["data"]["client_name"], "Acme");

    let list = app.get("/api/signals").await;
    assert_eq!(list.body["data"].as_array().unwrap().len(), 2);

    let missing = app.get("/api/signals/000").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], "No signal data found for this module");
}

#[tokio::test]
async fn renewals_require_module_then_client() {
    let app = seeded().await;

    let missing_fields = app.post("/api/renewals", json!({ "imei": IMEI })).await;
    assert_eq!(missing_fields.status, StatusCode::BAD_REQUEST);

    let no_module = app
        .post("/api/renewals", json!({ "imei": "000", "client_id": "ghost" }))
        .await;
    assert_eq!(no_module.status, StatusCode::NOT_FOUND);
    assert_eq!(no_module.body["message"], "Module not found");

    let no_client = app
        .post("/api/renewals", json!({ "imei": IMEI, "client_id": "ghost" }))
        .await;
    assert_eq!(no_client.status, StatusCode::NOT_FOUND);
    assert_eq!(no_client.body["message"], "Client not found");

    let none_yet = app.get(&format!("/api/renewals/{IMEI}")).await;
    assert_eq!(none_yet.status, StatusCode::NOT_FOUND);
    assert_eq!(none_yet.body["message"], "No renewals found for this module");
}

#[tokio::test]
async fn renewals_are_listed_latest_first() {
    let app = seeded().await;

    for (validated, expires) in [(day(2025, 1, 1), day(2026, 1, 1)), (day(2026, 1, 1), day(2027, 1, 1))] {
        let res = app
            .post(
                "/api/renewals",
                json!({
                    "imei": IMEI,
                    "client_id": "C1",
                    "validated_on": validated,
                    "expires_on": expires
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert!(res.body["data"]["id"].as_i64().is_some_and(|id| id > 0));
    }

    let res = app.get(&format!("/api/renewals/{IMEI}")).await;
    assert_eq!(res.status, StatusCode::OK);
    let rows = res.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["validated_on"], "2026-01-01");
    assert_eq!(rows[0]["client_name"], "Acme");

    assert_eq!(app.get("/api/renewals").await.body["data"].as_array().unwrap().len(), 2);
}
