use axum::extract::State;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::common::dates::parse_day;
use crate::common::{ApiPath, ApiQuery, AppState, Envelope, EnvelopeSchema};
use crate::error::{AppError, AppResult};
use crate::repositories::DiagnosticsRepository;
use crate::repositories::diagnostics::DiagnosticWithClient;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DayQuery {
    /// Day to read, `YYYY-MM-DD`
    pub date: Option<String>,
}

/// List all diagnostics readings, newest first
#[utoipa::path(
    get,
    path = "/api/diagnostics",
    responses(
        (status = 200, description = "`data`: array of readings with `client_name`", body = EnvelopeSchema),
    ),
    tag = "diagnostics"
)]
pub async fn list_diagnostics(
    State(state): State<AppState>,
) -> AppResult<Envelope<Vec<DiagnosticWithClient>>> {
    let rows = DiagnosticsRepository::new(&state.db).list().await?;
    Ok(Envelope::ok(rows))
}

/// Readings of one module on one day
///
/// `totalAlerts` counts every anomaly recorded for the module, not only
/// those of the requested day.
#[utoipa::path(
    get,
    path = "/api/diagnostics/by-date/{imei}",
    params(
        ("imei" = String, Path, description = "Module IMEI"),
        DayQuery,
    ),
    responses(
        (status = 200, description = "`data`: readings of the day, oldest first; sibling `totalAlerts`", body = EnvelopeSchema),
        (status = 400, description = "Invalid or missing date", body = EnvelopeSchema),
    ),
    tag = "diagnostics"
)]
pub async fn get_diagnostics_by_date(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
    ApiQuery(query): ApiQuery<DayQuery>,
) -> AppResult<Envelope<Vec<DiagnosticWithClient>>> {
    let day = parse_day(query.date.as_deref())?;

    let repo = DiagnosticsRepository::new(&state.db);
    let rows = repo.for_module_on(&imei, day).await?;
    let total_alerts = repo.total_alerts(&imei).await?;

    Ok(Envelope::ok(rows).with_extra("totalAlerts", total_alerts))
}

/// Latest reading of one module
#[utoipa::path(
    get,
    path = "/api/diagnostics/{imei}",
    params(("imei" = String, Path, description = "Module IMEI")),
    responses(
        (status = 200, description = "`data`: the most recent reading", body = EnvelopeSchema),
        (status = 404, description = "No diagnostics data found for this module", body = EnvelopeSchema),
    ),
    tag = "diagnostics"
)]
pub async fn get_module_diagnostics(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
) -> AppResult<Envelope<DiagnosticWithClient>> {
    let row = DiagnosticsRepository::new(&state.db)
        .latest_for_module(&imei)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No diagnostics data found for this module".to_string())
        })?;

    Ok(Envelope::ok(row))
}
