use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::{AppState, Envelope, EnvelopeSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `up` or `down`
    pub database: &'static str,
}

/// Health check endpoint
///
/// Always 200 while the process serves requests; the database state is
/// reported in the body. Not rate-limited, suitable for container probes.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "`data`: `{database}`", body = EnvelopeSchema),
    ),
    tag = "health"
)]
pub async fn healthz(State(state): State<AppState>) -> Envelope<HealthResponse> {
    let database = if state.db.ping().await.is_ok() { "up" } else { "down" };
    Envelope::ok(HealthResponse { database })
}
