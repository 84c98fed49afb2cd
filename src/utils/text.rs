use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").unwrap());

pub const MIN_PASSWORD_LEN: usize = 6;

/// Spreadsheet serial of 1970-01-01.
const UNIX_EPOCH_SERIAL: f64 = 25569.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Checks the exact value; surrounding whitespace is rejected.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value.trim())
}

pub fn is_valid_password(value: &str) -> bool {
    value.chars().count() >= MIN_PASSWORD_LEN
}

/// Converts a spreadsheet date serial to an ISO calendar date (UTC).
pub fn serial_to_iso_date(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    let millis = ((serial - UNIX_EPOCH_SERIAL) * MILLIS_PER_DAY).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
}

pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_predicate() {
        assert!(is_valid_email("jay@x.com"));
        assert!(!is_valid_email("  jay@x.com "));
        assert!(!is_valid_email("jay@x"));
        assert!(!is_valid_email("jay x@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_predicate() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("98765432101"));
        assert!(!is_valid_phone("98765-43210"));
    }

    #[test]
    fn test_password_predicate() {
        assert!(is_valid_password("secret"));
        assert!(!is_valid_password("abc"));
    }

    #[test]
    fn test_serial_to_iso_date() {
        assert_eq!(serial_to_iso_date(25569.0).as_deref(), Some("1970-01-01"));
        assert_eq!(serial_to_iso_date(36526.0).as_deref(), Some("2000-01-01"));
        assert_eq!(serial_to_iso_date(36526.75).as_deref(), Some("2000-01-01"));
        assert_eq!(serial_to_iso_date(f64::NAN), None);
    }

    #[test]
    fn test_parse_calendar_date() {
        assert!(parse_calendar_date("2000-02-29").is_some());
        assert!(parse_calendar_date("29/02/2000").is_some());
        assert!(parse_calendar_date("2001-02-29").is_none());
        assert!(parse_calendar_date("not a date").is_none());
        assert!(parse_calendar_date("2000-01-01T10:00:00Z").is_some());
    }
}
