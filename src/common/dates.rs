//! Date and time formatting
//!
//! Query parameters always use `YYYY-MM-DD`. Timestamps from the server are
//! displayed in their own UTC offset.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today in the browser's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_ago(from: NaiveDate, days: i64) -> NaiveDate {
    from - Duration::days(days)
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.get(..10)?, DATE_FORMAT).ok()
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS]` taken as UTC
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    let utc = FixedOffset::east_opt(0)?;
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .and_then(|naive| naive.and_local_timezone(utc).single())
}

/// `HH:MM`, or `--:--` when unparseable
pub fn clock_time(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// `HH:MM - HH:MM`
pub fn clock_range(start: &str, end: &str) -> String {
    format!("{} - {}", clock_time(start), clock_time(end))
}

/// Value for an `<input type="datetime-local">`: `YYYY-MM-DDTHH:MM`
pub fn datetime_local(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

/// Hours and minutes of a serialized duration: `HH:MM:SS` or `D HH:MM:SS`
pub fn duration_hm(text: &str) -> Option<(u32, u32)> {
    let (days, clock) = match text.trim().split_once(' ') {
        Some((d, rest)) => (d.parse::<u32>().ok()?, rest),
        None => (0, text.trim()),
    };
    let mut parts = clock.split(':');
    let hours: u32 = parts.next()?.parse().ok()?;
    let minutes: u32 = parts.next()?.parse().ok()?;
    Some((days * 24 + hours, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_pads() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_date(date), "2024-05-01");
        assert_eq!(format_date(days_ago(date, 6)), "2024-04-25");
    }

    #[test]
    fn test_parse_date_accepts_timestamps() {
        assert_eq!(parse_date("2024-05-01T08:00:00Z"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(parse_date("2024-5-1"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_clock_time_keeps_server_offset() {
        assert_eq!(clock_time("2024-05-01T23:15:00+08:00"), "23:15");
        assert_eq!(clock_time("2024-05-02T07:05:00Z"), "07:05");
        assert_eq!(clock_time("2024-05-02T07:05"), "07:05");
        assert_eq!(clock_time("garbage"), "--:--");
        assert_eq!(
            clock_range("2024-05-01T23:15:00+08:00", "2024-05-02T07:05:00+08:00"),
            "23:15 - 07:05"
        );
    }

    #[test]
    fn test_datetime_local() {
        assert_eq!(datetime_local("2024-05-01T23:15:42+08:00"), "2024-05-01T23:15");
        assert_eq!(datetime_local(""), "");
    }

    #[test]
    fn test_duration_hm() {
        assert_eq!(duration_hm("07:30:00"), Some((7, 30)));
        assert_eq!(duration_hm("1 02:15:00"), Some((26, 15)));
        assert_eq!(duration_hm("n/a"), None);
    }
}
