use axum::extract::State;

use crate::common::{ApiJson, ApiPath, AppState, Envelope, EnvelopeSchema};
use crate::entity::modules;
use crate::error::{AppError, AppResult};
use crate::repositories::ModuleRepository;
use crate::repositories::module::{ModuleFields, ModulePatch, ModuleWithClient};

use super::types::CreateModuleRequest;

/// List all modules with the name of their client
#[utoipa::path(
    get,
    path = "/api/modules",
    responses(
        (status = 200, description = "`data`: array of modules with `client_name`", body = EnvelopeSchema),
    ),
    tag = "modules"
)]
pub async fn list_modules(
    State(state): State<AppState>,
) -> AppResult<Envelope<Vec<ModuleWithClient>>> {
    let modules = ModuleRepository::new(&state.db).list().await?;
    Ok(Envelope::ok(modules))
}

#[utoipa::path(
    get,
    path = "/api/modules/{imei}",
    params(("imei" = String, Path, description = "Module IMEI")),
    responses(
        (status = 200, description = "`data`: the module with `client_name`", body = EnvelopeSchema),
        (status = 404, description = "Module not found", body = EnvelopeSchema),
    ),
    tag = "modules"
)]
pub async fn get_module(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
) -> AppResult<Envelope<ModuleWithClient>> {
    let module = ModuleRepository::new(&state.db).get(&imei).await?;
    Ok(Envelope::ok(module))
}

/// Register a module, optionally assigned to an existing client
#[utoipa::path(
    post,
    path = "/api/modules",
    request_body = CreateModuleRequest,
    responses(
        (status = 201, description = "`data`: the inserted module", body = EnvelopeSchema),
        (status = 400, description = "Module imei is required", body = EnvelopeSchema),
        (status = 404, description = "Client not found", body = EnvelopeSchema),
    ),
    tag = "modules"
)]
pub async fn create_module(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateModuleRequest>,
) -> AppResult<Envelope<modules::Model>> {
    let imei = body
        .imei
        .filter(|imei| !imei.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Module imei is required".to_string()))?;

    let module = ModuleRepository::new(&state.db)
        .create(imei, body.fields)
        .await?;
    tracing::info!(imei = %module.imei, client_id = ?module.client_id, "Module created");
    Ok(Envelope::created(module))
}

/// Replace every editable field of a module
#[utoipa::path(
    put,
    path = "/api/modules/{imei}",
    params(("imei" = String, Path, description = "Module IMEI")),
    request_body = ModuleFields,
    responses(
        (status = 200, description = "`data`: the fields as written", body = EnvelopeSchema),
        (status = 404, description = "Module or client not found", body = EnvelopeSchema),
    ),
    tag = "modules"
)]
pub async fn update_module(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
    ApiJson(fields): ApiJson<ModuleFields>,
) -> AppResult<Envelope<modules::Model>> {
    let module = ModuleRepository::new(&state.db)
        .replace(&imei, fields)
        .await?;
    Ok(Envelope::ok(module))
}

/// Update only the fields present in the body
///
/// Accepted keys: `model`, `client_id`, `vehicle_name`, `sim_number`,
/// `validated_on`, `expires_on`, `status`. An explicit `null` clears the field.
#[utoipa::path(
    patch,
    path = "/api/modules/{imei}",
    params(("imei" = String, Path, description = "Module IMEI")),
    request_body = ModulePatch,
    responses(
        (status = 200, description = "`data`: the module after the update, with `client_name`", body = EnvelopeSchema),
        (status = 400, description = "No valid fields to update", body = EnvelopeSchema),
        (status = 404, description = "Module or client not found", body = EnvelopeSchema),
    ),
    tag = "modules"
)]
pub async fn patch_module(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
    ApiJson(patch): ApiJson<ModulePatch>,
) -> AppResult<Envelope<ModuleWithClient>> {
    let module = ModuleRepository::new(&state.db).patch(&imei, patch).await?;
    Ok(Envelope::ok(module))
}

/// Detach a module from its client
#[utoipa::path(
    patch,
    path = "/api/modules/{imei}/unassign",
    params(("imei" = String, Path, description = "Module IMEI")),
    responses(
        (status = 200, description = "`data`: the module, now without client", body = EnvelopeSchema),
        (status = 404, description = "Module not found", body = EnvelopeSchema),
    ),
    tag = "modules"
)]
pub async fn unassign_module(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
) -> AppResult<Envelope<ModuleWithClient>> {
    let module = ModuleRepository::new(&state.db).unassign(&imei).await?;
    tracing::info!(imei = %module.imei, "Module unassigned");
    Ok(Envelope::ok(module))
}

#[utoipa::path(
    delete,
    path = "/api/modules/{imei}",
    params(("imei" = String, Path, description = "Module IMEI")),
    responses(
        (status = 200, description = "Module deleted successfully", body = EnvelopeSchema),
        (status = 404, description = "Module not found", body = EnvelopeSchema),
    ),
    tag = "modules"
)]
pub async fn delete_module(
    State(state): State<AppState>,
    ApiPath(imei): ApiPath<String>,
) -> AppResult<Envelope<()>> {
    ModuleRepository::new(&state.db).delete(&imei).await?;
    tracing::info!(imei = %imei, "Module deleted");
    Ok(Envelope::message("Module deleted successfully"))
}
