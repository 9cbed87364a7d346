use axum::extract::State;

use crate::common::{ApiJson, ApiPath, AppState, Envelope, EnvelopeSchema};
use crate::entity::renewals;
use crate::error::{AppError, AppResult};
use crate::repositories::RenewalRepository;
use crate::repositories::renewal::{NewRenewal, RenewalWithClient};

use super::types::CreateRenewalRequest;

#[utoipa::path(
    get,
    path = "/api/renewals",
    responses(
        (status = 200, description = "`data`: array of renewals with `client_name`, latest validation first", body = EnvelopeSchema),
    ),
    tag = "renewals"
)]
pub async fn list_renewals(
    State(state): State<AppState>,
) -> AppResult<Envelope<Vec<RenewalWithClient>>> {
    let renewals = RenewalRepository::new(&state.db).list().await?;
    Ok(Envelope::ok(renewals))
}

/// Renewal history of one module
#[utoipa::path(
    get,
    path = "/api/renewals/{imei}",
    params(("imei" = String, Path, description = "Module IMEI")),
    responses(
        (status = 200, description = "`data`: array of renewals with `client_name`", body = EnvelopeSchema),
        (status = 404, description = "No renewals found for this module", body = EnvelopeSchema),
    ),
    tag = "renewals"
)]
pub async fn list_module_renewals(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
) -> AppResult<Envelope<Vec<RenewalWithClient>>> {
    let renewals = RenewalRepository::new(&state.db)
        .list_for_module(&imei)
        .await?;

    if renewals.is_empty() {
        return Err(AppError::NotFound(
            "No renewals found for this module".to_string(),
        ));
    }
    Ok(Envelope::ok(renewals))
}

#[utoipa::path(
    post,
    path = "/api/renewals",
    request_body = CreateRenewalRequest,
    responses(
        (status = 201, description = "`data`: the renewal with its generated `id`", body = EnvelopeSchema),
        (status = 400, description = "imei or client_id missing", body = EnvelopeSchema),
        (status = 404, description = "Module not found / Client not found", body = EnvelopeSchema),
    ),
    tag = "renewals"
)]
pub async fn create_renewal(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateRenewalRequest>,
) -> AppResult<Envelope<renewals::Model>> {
    let renewal = NewRenewal::try_from(body)?;
    let created = RenewalRepository::new(&state.db).create(renewal).await?;
    tracing::info!(id = created.id, imei = %created.imei, "Renewal recorded");
    Ok(Envelope::created(created))
}
