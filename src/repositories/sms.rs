//! # SMS Repository
//!
//! History of outbound SMS notifications. Sending is recorded only; there
//! is no carrier integration.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::common::dates::day_bounds;
use crate::entity::sms_history;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct Recipient {
    pub recipient: String,
    pub phone_number: String,
}

impl Recipient {
    /// Accept an entry when both name and number are present. Missing,
    /// `null`, `false` and `""` count as absent; numbers are kept as their
    /// text. Values are stored as given.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            recipient: field_text(value.get("recipient")?)?,
            phone_number: field_text(value.get("phone_number")?)?,
        })
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Repository for SMS history
pub struct SmsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SmsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<sms_history::Model>> {
        let rows = sms_history::Entity::find()
            .order_by_desc(sms_history::Column::SentDate)
            .all(self.db)
            .await?;

        Ok(rows)
    }

    pub async fn sent_on(&self, day: NaiveDate) -> AppResult<Vec<sms_history::Model>> {
        let (start, end) = day_bounds(day);
        let rows = sms_history::Entity::find()
            .filter(sms_history::Column::SentDate.gte(start))
            .filter(sms_history::Column::SentDate.lt(end))
            .order_by_desc(sms_history::Column::SentDate)
            .all(self.db)
            .await?;

        Ok(rows)
    }

    /// Record one message per recipient, one insert at a time. Returns how
    /// many rows were written.
    pub async fn record_batch(
        &self,
        recipients: &[Recipient],
        sms_type: Option<&str>,
        message: Option<&str>,
    ) -> AppResult<u64> {
        let mut inserted = 0;
        for recipient in recipients {
            sms_history::ActiveModel {
                sent_date: Set(Utc::now().naive_utc()),
                recipient: Set(recipient.recipient.clone()),
                phone_number: Set(recipient.phone_number.clone()),
                sms_type: Set(sms_type.map(str::to_string)),
                message: Set(message.map(str::to_string)),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
            inserted += 1;
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recipient_requires_name_and_number() {
        assert_eq!(
            Recipient::from_value(&json!({ "recipient": "A", "phone_number": "123" })),
            Some(Recipient {
                recipient: "A".to_string(),
                phone_number: "123".to_string(),
            })
        );
        for entry in [
            json!({ "recipient": "", "phone_number": "456" }),
            json!({ "recipient": "B" }),
            json!({ "recipient": null, "phone_number": "456" }),
            json!({ "recipient": "B", "phone_number": false }),
            json!("D"),
        ] {
            assert_eq!(Recipient::from_value(&entry), None, "{entry}");
        }
    }

    #[test]
    fn numeric_number_is_kept_as_text() {
        assert_eq!(
            Recipient::from_value(&json!({ "recipient": "C", "phone_number": 212600000000u64 })),
            Some(Recipient {
                recipient: "C".to_string(),
                phone_number: "212600000000".to_string(),
            })
        );
    }

    #[test]
    fn values_are_not_trimmed() {
        let recipient =
            Recipient::from_value(&json!({ "recipient": "  Ali  ", "phone_number": " 0600 " }))
                .unwrap();
        assert_eq!(recipient.recipient, "  Ali  ");
        assert_eq!(recipient.phone_number, " 0600 ");
    }
}
