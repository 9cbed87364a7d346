use serde::Deserialize;
use utoipa::ToSchema;

use crate::repositories::client::ClientFields;

/// Body of `POST /api/clients`. The id is chosen by the caller.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateClientRequest {
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: ClientFields,
}
