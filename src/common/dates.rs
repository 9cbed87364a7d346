//! Day-scoped filtering shared by the diagnostics, anomaly and SMS routes.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;

use crate::error::{AppError, AppResult};

pub const INVALID_DATE: &str = "Invalid or missing date. Use YYYY-MM-DD.";

static DAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("day pattern compiles"));

/// Parse a `YYYY-MM-DD` day. Anything else, including impossible calendar
/// dates such as `2024-02-30`, is a validation error.
pub fn parse_day(input: Option<&str>) -> AppResult<NaiveDate> {
    let raw = input.ok_or_else(|| AppError::Validation(INVALID_DATE.to_string()))?;
    if !DAY_PATTERN.is_match(raw) {
        return Err(AppError::Validation(INVALID_DATE.to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(INVALID_DATE.to_string()))
}

/// Half-open `[start, end)` bounds covering one calendar day.
#[must_use]
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(NaiveTime::MIN);
    (start, start + TimeDelta::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_days() {
        for input in ["2024-01-31", "1999-12-01", "2024-02-29"] {
            assert!(parse_day(Some(input)).is_ok(), "{input} should parse");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for input in [
            "",
            "2024-1-31",
            "2024/01/31",
            "31-01-2024",
            "2024-01-31 10:00:00",
            " 2024-01-31",
            "2024-01-31\n",
            "２０２４-01-31",
            "2023-02-29",
            "2024-13-01",
        ] {
            let err = parse_day(Some(input)).unwrap_err();
            assert!(
                matches!(err, AppError::Validation(ref m) if m == INVALID_DATE),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn missing_date_is_rejected() {
        assert!(matches!(parse_day(None), Err(AppError::Validation(_))));
    }

    #[test]
    fn bounds_cover_exactly_one_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let (start, end) = day_bounds(day);
        assert_eq!(start.to_string(), "2024-03-10 00:00:00");
        assert_eq!(end.to_string(), "2024-03-11 00:00:00");
    }
}
