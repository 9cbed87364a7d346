use axum::extract::State;

use crate::common::{ApiPath, AppState, Envelope, EnvelopeSchema};
use crate::error::{AppError, AppResult};
use crate::repositories::SignalRepository;
use crate::repositories::signal::SignalWithClient;

/// List signal outages, most recent first
#[utoipa::path(
    get,
    path = "/api/signals",
    responses(
        (status = 200, description = "`data`: array of signal records with `client_name`", body = EnvelopeSchema),
    ),
    tag = "signals"
)]
pub async fn list_signals(
    State(state): State<AppState>,
) -> AppResult<Envelope<Vec<SignalWithClient>>> {
    let signals = SignalRepository::new(&state.db).list().await?;
    Ok(Envelope::ok(signals))
}

/// Latest signal record of one module
#[utoipa::path(
    get,
    path = "/api/signals/{imei}",
    params(("imei" = String, Path, description = "Module IMEI")),
    responses(
        (status = 200, description = "`data`: the most recent signal record", body = EnvelopeSchema),
        (status = 404, description = "No signal data found for this module", body = EnvelopeSchema),
    ),
    tag = "signals"
)]
pub async fn get_module_signal(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
) -> AppResult<Envelope<SignalWithClient>> {
    let signal = SignalRepository::new(&state.db)
        .latest_for_module(&imei)
        .await?
        .ok_or_else(|| AppError::NotFound("No signal data found for this module".to_string()))?;

    Ok(Envelope::ok(signal))
}
