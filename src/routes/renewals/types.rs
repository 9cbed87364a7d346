use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::repositories::renewal::NewRenewal;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRenewalRequest {
    pub imei: Option<String>,
    pub client_id: Option<String>,
    pub validated_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
}

impl TryFrom<CreateRenewalRequest> for NewRenewal {
    type Error = AppError;

    fn try_from(req: CreateRenewalRequest) -> AppResult<Self> {
        let required = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        match (required(req.imei), required(req.client_id)) {
            (Some(imei), Some(client_id)) => Ok(Self {
                imei,
                client_id,
                validated_on: req.validated_on,
                expires_on: req.expires_on,
            }),
            _ => Err(AppError::Validation(
                "Module imei and client id are required".to_string(),
            )),
        }
    }
}
