use axum::{extract::State, http::StatusCode};

use crate::common::dates::parse_day;
use crate::common::{ApiJson, ApiPath, AppState, Envelope, EnvelopeSchema};
use crate::entity::sms_history;
use crate::error::{AppError, AppResult};
use crate::repositories::SmsRepository;
use crate::repositories::sms::Recipient;

use super::types::SendSmsRequest;

#[utoipa::path(
    get,
    path = "/api/sms",
    responses(
        (status = 200, description = "`data`: SMS history, newest first", body = EnvelopeSchema),
    ),
    tag = "sms"
)]
pub async fn list_sms(State(state): State<AppState>) -> AppResult<Envelope<Vec<sms_history::Model>>> {
    let rows = SmsRepository::new(&state.db).list().await?;
    Ok(Envelope::ok(rows))
}

#[utoipa::path(
    get,
    path = "/api/sms/by-date/{date}",
    params(("date" = String, Path, description = "Day, `YYYY-MM-DD`")),
    responses(
        (status = 200, description = "`data`: messages sent that day, newest first", body = EnvelopeSchema),
        (status = 400, description = "Invalid or missing date", body = EnvelopeSchema),
    ),
    tag = "sms"
)]
pub async fn list_sms_by_date(
    State(state): State<AppState>,
    ApiPath(date): ApiPath<String>,
) -> AppResult<Envelope<Vec<sms_history::Model>>> {
    let day = parse_day(Some(&date))?;
    let rows = SmsRepository::new(&state.db).sent_on(day).await?;
    Ok(Envelope::ok(rows))
}

/// Record one SMS per recipient
///
/// Entries without a non-empty `recipient` and `phone_number` are skipped.
/// Nothing is sent to a carrier.
#[utoipa::path(
    post,
    path = "/api/sms",
    request_body = SendSmsRequest,
    responses(
        (status = 201, description = "Sibling `inserted`: rows written", body = EnvelopeSchema),
        (status = 400, description = "No recipients provided", body = EnvelopeSchema),
    ),
    tag = "sms"
)]
pub async fn send_sms(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SendSmsRequest>,
) -> AppResult<Envelope<()>> {
    let entries = body
        .recipients
        .as_ref()
        .and_then(|value| value.as_array())
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| AppError::Validation("No recipients provided".to_string()))?;

    let recipients: Vec<Recipient> = entries.iter().filter_map(Recipient::from_value).collect();
    if recipients.len() < entries.len() {
        tracing::debug!(
            skipped = entries.len() - recipients.len(),
            "Malformed SMS recipients skipped"
        );
    }

    let inserted = SmsRepository::new(&state.db)
        .record_batch(&recipients, body.sms_type.as_deref(), body.message.as_deref())
        .await?;
    tracing::info!(inserted, sms_type = ?body.sms_type, "SMS batch recorded");

    Ok(Envelope::empty(StatusCode::CREATED).with_extra("inserted", inserted))
}
