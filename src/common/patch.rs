//! Tri-state fields for partial updates: absent, explicit `null`, or a value.

use sea_orm::ActiveValue::{self, NotSet, Set};
use serde::{Deserialize, Deserializer};

/// Use with `#[serde(default, deserialize_with = "present")]` on an
/// `Option<Option<T>>` so that a JSON `null` becomes `Some(None)` while a
/// missing key stays `None`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Only supplied fields become `Set`; absent ones are left untouched.
pub fn patch_value<T>(field: Option<Option<T>>) -> ActiveValue<Option<T>>
where
    Option<T>: Into<sea_orm::Value>,
{
    match field {
        Some(value) => Set(value),
        None => NotSet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "present")]
        status: Option<Option<String>>,
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        let null: Probe = serde_json::from_str(r#"{"status": null}"#).unwrap();
        let value: Probe = serde_json::from_str(r#"{"status": "expired"}"#).unwrap();

        assert_eq!(absent.status, None);
        assert_eq!(null.status, Some(None));
        assert_eq!(value.status, Some(Some("expired".to_string())));
    }

    #[test]
    fn only_present_fields_are_set() {
        assert_eq!(patch_value::<String>(None), NotSet);
        assert_eq!(patch_value::<String>(Some(None)), Set(None));
        assert_eq!(
            patch_value(Some(Some("a".to_string()))),
            Set(Some("a".to_string()))
        );
    }
}
