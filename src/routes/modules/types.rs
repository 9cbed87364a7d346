use serde::Deserialize;
use utoipa::ToSchema;

use crate::repositories::module::ModuleFields;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateModuleRequest {
    pub imei: Option<String>,
    #[serde(flatten)]
    pub fields: ModuleFields,
}
