use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::repositories::sms::Recipient;

/// Body of `POST /api/sms`. `recipients` is kept loose so that malformed
/// entries can be skipped instead of failing the whole batch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SendSmsRequest {
    #[schema(value_type = Vec<Recipient>)]
    pub recipients: Option<Value>,
    pub sms_type: Option<String>,
    pub message: Option<String>,
}
