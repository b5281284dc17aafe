use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Naive layouts tried after RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// How timestamps are shown next to messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeFormat {
    /// `HH:MM`, 24-hour.
    #[default]
    Clock,
    /// `MM/DD HH:MM`.
    MonthDayClock,
}

impl TimeFormat {
    fn pattern(self) -> &'static str {
        match self {
            Self::Clock => "%H:%M",
            Self::MonthDayClock => "%m/%d %H:%M",
        }
    }
}

/// Parse a timestamp as written, keeping its wall-clock reading.
///
/// Offsets are honoured only to pick the wall clock the author recorded;
/// nothing is converted to the viewer's zone.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a raw timestamp for display. Missing values become empty;
/// unparseable values are returned verbatim.
pub fn format_time(raw: Option<&str>, format: TimeFormat) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match parse_timestamp(raw) {
        Some(dt) => dt.format(format.pattern()).to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_keeps_wall_clock() {
        assert_eq!(
            format_time(Some("2024-03-05T21:07:00+08:00"), TimeFormat::Clock),
            "21:07"
        );
        assert_eq!(
            format_time(Some("2024-03-05T21:07:00.123Z"), TimeFormat::MonthDayClock),
            "03/05 21:07"
        );
    }

    #[test]
    fn naive_layouts() {
        assert_eq!(
            format_time(Some("2024-03-05 09:30:15"), TimeFormat::Clock),
            "09:30"
        );
        assert_eq!(
            format_time(Some("2024/12/31 23:59"), TimeFormat::MonthDayClock),
            "12/31 23:59"
        );
        assert_eq!(
            format_time(Some("2024-03-05"), TimeFormat::Clock),
            "00:00"
        );
    }

    #[test]
    fn invalid_passes_through() {
        assert_eq!(format_time(Some("yesterday-ish"), TimeFormat::Clock), "yesterday-ish");
        assert_eq!(format_time(Some(""), TimeFormat::Clock), "");
        assert_eq!(format_time(None, TimeFormat::Clock), "");
    }

    #[test]
    fn parse_returns_none_for_garbage() {
        assert!(parse_timestamp("soon").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("2024-13-40").is_none());
    }
}
