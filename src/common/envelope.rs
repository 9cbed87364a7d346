//! The `{status, data|message, ...}` wrapper applied to every response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip)]
    code: StatusCode,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Sibling fields such as `count`, `inserted` or `totalAlerts`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: StatusCode::OK,
            status: Status::Success,
            data: Some(data),
            message: None,
            extra: Map::new(),
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            code: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn code(&self) -> StatusCode {
        self.code
    }
}

impl Envelope<()> {
    /// Success without a `data` member.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::OK,
            status: Status::Success,
            data: None,
            message: Some(message.into()),
            extra: Map::new(),
        }
    }

    /// Success carrying only sibling fields.
    pub fn empty(code: StatusCode) -> Self {
        Self {
            code,
            status: Status::Success,
            data: None,
            message: None,
            extra: Map::new(),
        }
    }

    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: Status::Error,
            data: None,
            message: Some(message.into()),
            extra: Map::new(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}

/// OpenAPI shape of [`Envelope`]. `data` holds the payload named in each
/// operation's description.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct EnvelopeSchema {
    status: Status,
    data: Option<Value>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_omits_missing_members() {
        let body = serde_json::to_value(Envelope::ok(vec![1, 2])).unwrap();
        assert_eq!(body, json!({ "status": "success", "data": [1, 2] }));
    }

    #[test]
    fn extra_fields_sit_beside_data() {
        let envelope = Envelope::ok(Vec::<i32>::new()).with_extra("totalAlerts", 3);
        let body = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            body,
            json!({ "status": "success", "data": [], "totalAlerts": 3 })
        );
    }

    #[test]
    fn error_envelope_carries_message_and_code() {
        let envelope = Envelope::<()>::error(StatusCode::NOT_FOUND, "Client not found");
        assert_eq!(envelope.code(), StatusCode::NOT_FOUND);
        let body = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            body,
            json!({ "status": "error", "message": "Client not found" })
        );
    }

    #[test]
    fn created_keeps_payload() {
        let envelope = Envelope::created("x");
        assert_eq!(envelope.code(), StatusCode::CREATED);
        assert_eq!(envelope.data, Some("x"));
    }
}
