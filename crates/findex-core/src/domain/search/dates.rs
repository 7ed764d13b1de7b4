//! Calendar date parsing and serde helpers
//!
//! Dates travel through JSON as ISO-8601 strings. Readers accept both plain
//! `YYYY-MM-DD` dates and full timestamps (the date part is kept), since
//! hosts commonly persist a midnight timestamp where a date was meant.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const ISO_DATE: &str = "%Y-%m-%d";

/// Parse an ISO date or timestamp into a calendar date
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, ISO_DATE) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

/// Format a calendar date as `YYYY-MM-DD`
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Serde adapter for `Option<NaiveDate>` stored as an ISO string
///
/// `null`, a missing field and the empty string all read as `None`.
pub mod option {
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_iso_date, parse_iso_date};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&format_iso_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => parse_iso_date(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", text))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_iso_date("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_iso_date("  2024-03-05 "), Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_parse_timestamps() {
        assert_eq!(
            parse_iso_date("2024-01-15T00:00:00.000Z"),
            Some(date(2024, 1, 15))
        );
        assert_eq!(
            parse_iso_date("2024-01-15T23:10:00+02:00"),
            Some(date(2024, 1, 15))
        );
        assert_eq!(
            parse_iso_date("2024-01-15T08:30:00"),
            Some(date(2024, 1, 15))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_iso_date(""), None);
        assert_eq!(parse_iso_date("yesterday"), None);
        assert_eq!(parse_iso_date("2024-13-01"), None);
    }

    #[test]
    fn test_format_is_zero_padded() {
        assert_eq!(format_iso_date(date(2024, 1, 2)), "2024-01-02");
    }
}
