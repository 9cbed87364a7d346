use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchByDateRequest {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}
