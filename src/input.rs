//! Normalization of raw form-field values before persistence.
//!
//! Browsers submit every field as a string, blank fields included. These
//! helpers map blanks to `None`, strip currency decoration from amounts, and
//! canonicalize `datetime-local` values so storage never carries a
//! display-oriented format.

use chrono::NaiveDateTime;

/// Trims a form value and maps the empty string to `None`.
#[must_use]
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Strips currency symbols and grouping commas from an amount field and
/// parses the remainder as a number. Returns `None` when nothing numeric
/// is left.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ','))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parses a numeric score field to a float; blank or non-numeric input
/// stores as NULL rather than a sentinel.
#[must_use]
pub fn parse_score(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

/// Parses an optional integer field (capacities); blank is `None`, anything
/// non-numeric is an error the caller should surface as validation failure.
pub fn parse_optional_int(raw: Option<&str>) -> Result<Option<i32>, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|_| format!("not a whole number: {raw}"))
}

const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Canonicalizes a `datetime-local` form value (`2024-06-23T10:00`, with or
/// without seconds) to `2024-06-23 10:00`. Already-canonical input passes
/// through unchanged.
#[must_use]
pub fn canonicalize_datetime(raw: &str) -> Option<String> {
    let raw = raw.trim();
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", CANONICAL_FORMAT] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.format(CANONICAL_FORMAT).to_string());
        }
    }
    None
}

/// Formats a canonical datetime for display as `M/DD/YYYY HH:MM` (month
/// without zero-padding). Values that fail to parse render as stored.
#[must_use]
pub fn display_datetime(canonical: &str) -> String {
    use chrono::{Datelike, Timelike};

    NaiveDateTime::parse_from_str(canonical, CANONICAL_FORMAT).map_or_else(
        |_| canonical.to_string(),
        |dt| {
            format!(
                "{}/{:02}/{} {:02}:{:02}",
                dt.month(),
                dt.day(),
                dt.year(),
                dt.hour(),
                dt.minute()
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(None), None);
        assert_eq!(blank_to_none(Some(String::new())), None);
        assert_eq!(blank_to_none(Some("  ".to_string())), None);
        assert_eq!(
            blank_to_none(Some(" Provo ".to_string())),
            Some("Provo".to_string())
        );
    }

    #[test]
    fn test_parse_amount_strips_currency() {
        assert_eq!(parse_amount("$50.00"), Some(50.00));
        assert_eq!(parse_amount(" $1,250.50 "), Some(1250.50));
        assert_eq!(parse_amount("€25"), Some(25.0));
        assert_eq!(parse_amount("75"), Some(75.0));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("$"), None);
        assert_eq!(parse_amount("fifty"), None);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score(Some("4.5")), Some(4.5));
        assert_eq!(parse_score(Some("")), None);
        assert_eq!(parse_score(Some("n/a")), None);
        assert_eq!(parse_score(None), None);
    }

    #[test]
    fn test_parse_optional_int() {
        assert_eq!(parse_optional_int(Some("30")), Ok(Some(30)));
        assert_eq!(parse_optional_int(Some("")), Ok(None));
        assert_eq!(parse_optional_int(None), Ok(None));
        assert!(parse_optional_int(Some("lots")).is_err());
    }

    #[test]
    fn test_canonicalize_datetime() {
        assert_eq!(
            canonicalize_datetime("2024-06-23T10:00"),
            Some("2024-06-23 10:00".to_string())
        );
        assert_eq!(
            canonicalize_datetime("2024-06-23T10:00:30"),
            Some("2024-06-23 10:00".to_string())
        );
        assert_eq!(
            canonicalize_datetime("2024-06-23 10:00"),
            Some("2024-06-23 10:00".to_string())
        );
        assert_eq!(canonicalize_datetime("sometime soon"), None);
    }

    #[test]
    fn test_display_datetime_unpads_month() {
        assert_eq!(display_datetime("2024-06-23 10:00"), "6/23/2024 10:00");
        assert_eq!(display_datetime("2024-12-05 09:30"), "12/05/2024 09:30");
    }

    #[test]
    fn test_display_datetime_passthrough_on_bad_input() {
        assert_eq!(display_datetime("not a date"), "not a date");
    }
}
