use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Handles parsing the local-time publish timestamps found in release exports
pub struct TimestampParser;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl TimestampParser {
    /// Parse a publish timestamp into a naive local date-time
    ///
    /// Offsets are dropped after parsing; the wall-clock time is kept. A bare
    /// date maps to midnight.
    pub fn parse(timestamp_str: &str) -> Option<NaiveDateTime> {
        let timestamp = timestamp_str.trim();
        if timestamp.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
            return Some(dt.naive_local());
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, format) {
                return Some(naive);
            }
        }

        NaiveDate::parse_from_str(timestamp, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_keeps_wall_clock() {
        let parsed = TimestampParser::parse("2024-01-05T18:30:00+09:00").unwrap();
        assert_eq!(parsed.hour(), 18);
        assert_eq!(parsed.day(), 5);
    }

    #[test]
    fn test_parse_space_separated() {
        let parsed = TimestampParser::parse("2024-03-10 09:15:42").unwrap();
        assert_eq!(parsed.month(), 3);
        assert_eq!(parsed.minute(), 15);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        assert!(TimestampParser::parse("2024-03-10T09:15:42.123").is_some());
    }

    #[test]
    fn test_parse_date_only() {
        let parsed = TimestampParser::parse("2024-01-05").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(TimestampParser::parse("invalid").is_none());
        assert!(TimestampParser::parse("2024-13-40").is_none());
        assert!(TimestampParser::parse("").is_none());
    }
}
