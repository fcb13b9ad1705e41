use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Formats a date as `MMM DD, YYYY` (e.g. "Mar 05, 2024"). Dates before
/// 1900 are sentinel values in the source system and render as "N/A".
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => format_naive(d.naive_utc()),
        None => String::new(),
    }
}

/// Formats a date arriving as free text (embedded topic JSON carries dates
/// in several shapes). Unparseable or empty input renders as empty.
pub fn format_date_str(raw: &str) -> String {
    match parse_loose(raw) {
        Some(d) => format_naive(d),
        None => String::new(),
    }
}

/// Parses the datetime shapes observed in embedded payloads: RFC 3339,
/// ISO date-time with or without fractional seconds, bare dates, and
/// US-style MM/DD/YYYY.
pub fn parse_loose(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

fn format_naive(date: NaiveDateTime) -> String {
    use chrono::Datelike;

    if date.year() < 1900 {
        return "N/A".to_string();
    }
    date.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();
        assert_eq!(format_date(Some(date)), "Mar 05, 2024");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn test_pre_1900_renders_not_available() {
        let date = Utc.with_ymd_and_hms(1899, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(format_date(Some(date)), "N/A");
        assert_eq!(format_date_str("1899-06-01"), "N/A");
    }

    #[test]
    fn test_format_date_str_accepts_loose_shapes() {
        assert_eq!(format_date_str("2024-01-10"), "Jan 10, 2024");
        assert_eq!(format_date_str("2024-01-10T14:22:05"), "Jan 10, 2024");
        assert_eq!(format_date_str("2024-01-10T14:22:05.123"), "Jan 10, 2024");
        assert_eq!(format_date_str("01/10/2024"), "Jan 10, 2024");
        assert_eq!(format_date_str("2024-01-10T14:22:05Z"), "Jan 10, 2024");
    }

    #[test]
    fn test_format_date_str_degrades_to_empty() {
        assert_eq!(format_date_str(""), "");
        assert_eq!(format_date_str("not a date"), "");
    }
}
