use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::columns::LogicalField;
use crate::errors::RowError;

static OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

static NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ISO-8601 instant, normalized to UTC and truncated to microseconds.
///
/// A trailing `Z` means `+00:00`. Values without an offset are read as UTC, and a bare
/// date is midnight UTC.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RowError> {
    let trimmed = value.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(stem) => format!("{stem}+00:00"),
        None => trimmed.to_string(),
    };

    let parsed = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
        .ok_or_else(|| RowError::InvalidTimestamp {
            value: trimmed.to_string(),
        })?;

    let micros = parsed.nanosecond() / 1_000 * 1_000;
    Ok(parsed.with_nanosecond(micros).unwrap_or(parsed))
}

pub(crate) fn required<'a>(
    field: LogicalField,
    value: Option<&'a str>,
) -> Result<&'a str, RowError> {
    value.ok_or(RowError::MissingValue { column: field })
}

pub(crate) fn parse_coordinate(field: LogicalField, value: &str) -> Result<f64, RowError> {
    let trimmed = value.trim();
    let parsed = trimmed
        .parse::<f64>()
        .map_err(|_| RowError::InvalidNumber {
            column: field,
            value: trimmed.to_string(),
        })?;
    if !parsed.is_finite() {
        return Err(RowError::NonFinite {
            column: field,
            value: trimmed.to_string(),
        });
    }
    Ok(parsed)
}

/// Empty cells, the literal `NaN` and absent columns are `None`; anything else must parse.
pub(crate) fn parse_optional_f64(
    field: LogicalField,
    value: Option<&str>,
) -> Result<Option<f64>, RowError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if raw.is_empty() || raw == "NaN" {
        return Ok(None);
    }
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| RowError::InvalidNumber {
            column: field,
            value: trimmed.to_string(),
        })
}

pub(crate) fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// First non-empty raw cell, trimmed.
pub(crate) fn text_with_fallback(primary: Option<&str>, fallback: Option<&str>) -> String {
    [primary, fallback]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 24, h, m, s)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn timestamp_accepts_zulu_and_offsets() {
        assert_eq!(parse_timestamp("2025-08-24T10:29:08Z").unwrap(), utc(10, 29, 8));
        assert_eq!(parse_timestamp(" 2025-08-24T10:29:08+00:00 ").unwrap(), utc(10, 29, 8));
        assert_eq!(parse_timestamp("2025-08-24T20:29:08+09:30").unwrap(), utc(10, 59, 8));
        assert_eq!(parse_timestamp("2025-08-24 20:29:08+0930").unwrap(), utc(10, 59, 8));
    }

    #[test]
    fn timestamp_without_offset_is_utc() {
        assert_eq!(parse_timestamp("2025-08-24T10:29:08").unwrap(), utc(10, 29, 8));
        assert_eq!(parse_timestamp("2025-08-24 10:29").unwrap(), utc(10, 29, 0));
    }

    #[test]
    fn date_only_timestamp_is_midnight_utc() {
        assert_eq!(parse_timestamp("2025-08-24").unwrap(), utc(0, 0, 0));
        assert_eq!(parse_timestamp(" 2025-08-24 ").unwrap(), utc(0, 0, 0));
        assert!(parse_timestamp("2025-08").is_err());
    }

    #[test]
    fn timestamp_truncates_to_microseconds() {
        let parsed = parse_timestamp("2025-08-24T10:29:08.123456789Z").unwrap();
        assert_eq!(parsed.nanosecond(), 123_456_000);
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(RowError::InvalidTimestamp { .. })
        ));
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("2025-13-40T10:29:08Z").is_err());
    }

    #[test]
    fn coordinates_must_be_finite_numbers() {
        assert_eq!(parse_coordinate(LogicalField::Latitude, " -12.5 ").unwrap(), -12.5);
        assert!(matches!(
            parse_coordinate(LogicalField::Latitude, "north"),
            Err(RowError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_coordinate(LogicalField::Longitude, "NaN"),
            Err(RowError::NonFinite { .. })
        ));
        assert!(parse_coordinate(LogicalField::Longitude, "").is_err());
    }

    #[test]
    fn optional_numbers_treat_blank_and_nan_token_as_absent() {
        assert_eq!(parse_optional_f64(LogicalField::Speed, None).unwrap(), None);
        assert_eq!(parse_optional_f64(LogicalField::Speed, Some("")).unwrap(), None);
        assert_eq!(parse_optional_f64(LogicalField::Speed, Some("NaN")).unwrap(), None);
        assert_eq!(
            parse_optional_f64(LogicalField::Speed, Some(" 88.5 ")).unwrap(),
            Some(88.5)
        );
    }

    #[test]
    fn optional_numbers_fail_on_other_text() {
        assert!(parse_optional_f64(LogicalField::Altitude, Some("n/a")).is_err());
        // whitespace is not blank: it trims to nothing and fails to parse
        assert!(parse_optional_f64(LogicalField::Altitude, Some("  ")).is_err());
    }

    #[test]
    fn text_fallback_uses_first_non_empty_raw_value() {
        assert_eq!(text_with_fallback(Some(" Top Dutch "), Some("TDS")), "Top Dutch");
        assert_eq!(text_with_fallback(Some(""), Some(" TDS ")), "TDS");
        assert_eq!(text_with_fallback(None, Some("TDS")), "TDS");
        assert_eq!(text_with_fallback(None, None), "");
        assert_eq!(text(None), "");
        assert_eq!(text(Some("  Challenger ")), "Challenger");
    }
}
