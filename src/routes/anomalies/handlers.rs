use axum::extract::State;

use crate::common::dates::parse_day;
use crate::common::{ApiJson, ApiPath, AppState, Envelope, EnvelopeSchema};
use crate::error::{AppError, AppResult};
use crate::repositories::AnomalyRepository;
use crate::repositories::anomaly::{AnomalyOnDate, AnomalyWithClient};
use crate::repositories::diagnostics::DiagnosticWithClient;

use super::types::SearchByDateRequest;

/// List recorded anomalies, highest alert count first
#[utoipa::path(
    get,
    path = "/api/anomalies",
    responses(
        (status = 200, description = "`data`: array of anomalies with `client_name`", body = EnvelopeSchema),
    ),
    tag = "anomalies"
)]
pub async fn list_anomalies(
    State(state): State<AppState>,
) -> AppResult<Envelope<Vec<AnomalyWithClient>>> {
    let rows = AnomalyRepository::new(&state.db).list().await?;
    Ok(Envelope::ok(rows))
}

/// Abnormal diagnostics readings of one module
///
/// Served from diagnostics (status icon other than `D`), not from the
/// anomalies table.
#[utoipa::path(
    get,
    path = "/api/anomalies/{imei}",
    params(("imei" = String, Path, description = "Module IMEI")),
    responses(
        (status = 200, description = "`data`: abnormal readings, newest first; sibling `count`", body = EnvelopeSchema),
        (status = 404, description = "No anomalies found for this module", body = EnvelopeSchema),
    ),
    tag = "anomalies"
)]
pub async fn get_module_anomalies(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
) -> AppResult<Envelope<Vec<DiagnosticWithClient>>> {
    let rows = AnomalyRepository::new(&state.db)
        .derived_for_module(&imei)
        .await?;

    if rows.is_empty() {
        return Err(AppError::NotFound(
            "No anomalies found for this module (from diagnostics)".to_string(),
        ));
    }

    let count = rows.len();
    Ok(Envelope::ok(rows).with_extra("count", count))
}

/// Anomalies created on a given day
#[utoipa::path(
    post,
    path = "/api/anomalies/search-by-date",
    request_body = SearchByDateRequest,
    responses(
        (status = 200, description = "`data`: anomalies with `module_name`, newest first (possibly empty)", body = EnvelopeSchema),
        (status = 400, description = "Invalid or missing date", body = EnvelopeSchema),
    ),
    tag = "anomalies"
)]
pub async fn search_anomalies_by_date(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SearchByDateRequest>,
) -> AppResult<Envelope<Vec<AnomalyOnDate>>> {
    let day = parse_day(body.date.as_deref())?;
    let rows = AnomalyRepository::new(&state.db).created_on(day).await?;

    if rows.is_empty() {
        return Ok(Envelope::ok(rows).with_message("No anomalies found for this date."));
    }
    Ok(Envelope::ok(rows))
}
