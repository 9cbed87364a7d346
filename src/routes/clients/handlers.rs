use axum::extract::State;

use crate::common::{ApiJson, ApiPath, AppState, Envelope, EnvelopeSchema};
use crate::entity::clients;
use crate::error::{AppError, AppResult};
use crate::repositories::ClientRepository;
use crate::repositories::client::{ClientFields, ClientSummary};

use super::types::CreateClientRequest;

/// List all clients with their module count
#[utoipa::path(
    get,
    path = "/api/clients",
    responses(
        (status = 200, description = "`data`: array of clients, each with `modules_count`", body = EnvelopeSchema),
    ),
    tag = "clients"
)]
pub async fn list_clients(State(state): State<AppState>) -> AppResult<Envelope<Vec<ClientSummary>>> {
    let clients = ClientRepository::new(&state.db).list().await?;
    Ok(Envelope::ok(clients))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = 200, description = "`data`: the client", body = EnvelopeSchema),
        (status = 404, description = "Client not found", body = EnvelopeSchema),
    ),
    tag = "clients"
)]
pub async fn get_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<clients::Model>> {
    let client = ClientRepository::new(&state.db).get(&id).await?;
    Ok(Envelope::ok(client))
}

/// Create a client under a caller-chosen id
#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "`data`: the inserted client", body = EnvelopeSchema),
        (status = 400, description = "Client id is required", body = EnvelopeSchema),
        (status = 500, description = "Duplicate id or other database failure", body = EnvelopeSchema),
    ),
    tag = "clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateClientRequest>,
) -> AppResult<Envelope<clients::Model>> {
    let id = body
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Client id is required".to_string()))?;

    let client = ClientRepository::new(&state.db).create(id, body.fields).await?;
    tracing::info!(client_id = %client.id, "Client created");
    Ok(Envelope::created(client))
}

/// Replace every editable field of a client
///
/// Fields missing from the body are stored as null.
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client id")),
    request_body = ClientFields,
    responses(
        (status = 200, description = "`data`: the client as stored", body = EnvelopeSchema),
        (status = 404, description = "Client not found", body = EnvelopeSchema),
    ),
    tag = "clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(fields): ApiJson<ClientFields>,
) -> AppResult<Envelope<clients::Model>> {
    let client = ClientRepository::new(&state.db).replace(&id, fields).await?;
    Ok(Envelope::ok(client))
}

/// Delete a client. Its modules are kept and become unassigned in listings.
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client deleted successfully", body = EnvelopeSchema),
        (status = 404, description = "Client not found", body = EnvelopeSchema),
    ),
    tag = "clients"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Envelope<()>> {
    ClientRepository::new(&state.db).delete(&id).await?;
    tracing::info!(client_id = %id, "Client deleted");
    Ok(Envelope::message("Client deleted successfully"))
}
