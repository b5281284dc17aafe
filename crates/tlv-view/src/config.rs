//! Configuration for a viewer session.

use serde::{Deserialize, Serialize};
use tlv_core::time::TimeFormat;

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Log file loaded when no `log` parameter is given.
pub const DEFAULT_LOG: &str = "data/log001.json";

/// How a system line finds the channel it belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemChannelScan {
    /// Take the channel of the nearest preceding character line.
    #[default]
    NearestSpeaker,
    /// Like `NearestSpeaker`, but walk past character lines in off-topic
    /// channels.
    SkipOffTopic,
}

/// Configuration for a viewer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Entries per page.
    pub page_size: usize,
    /// Log file used when the locator names none.
    pub default_log: String,
    /// System line channel resolution.
    pub system_scan: SystemChannelScan,
    /// Timestamp display.
    pub time_format: TimeFormat,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_log: DEFAULT_LOG.to_string(),
            system_scan: SystemChannelScan::default(),
            time_format: TimeFormat::default(),
        }
    }
}

impl ViewerConfig {
    /// Set the page size (at least 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the fallback log file.
    pub fn with_default_log(mut self, name: impl Into<String>) -> Self {
        self.default_log = name.into();
        self
    }

    /// Set the system line scan policy.
    pub fn with_system_scan(mut self, scan: SystemChannelScan) -> Self {
        self.system_scan = scan;
        self
    }

    /// Set the timestamp display.
    pub fn with_time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.page_size, 50);
        assert_eq!(cfg.default_log, "data/log001.json");
        assert_eq!(cfg.system_scan, SystemChannelScan::NearestSpeaker);
        assert_eq!(cfg.time_format, TimeFormat::Clock);
    }

    #[test]
    fn builder_methods() {
        let cfg = ViewerConfig::default()
            .with_page_size(20)
            .with_default_log("a.json")
            .with_system_scan(SystemChannelScan::SkipOffTopic)
            .with_time_format(TimeFormat::MonthDayClock);
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.default_log, "a.json");
        assert_eq!(cfg.system_scan, SystemChannelScan::SkipOffTopic);
        assert_eq!(cfg.time_format, TimeFormat::MonthDayClock);
    }

    #[test]
    fn page_size_clamped() {
        assert_eq!(ViewerConfig::default().with_page_size(0).page_size, 1);
    }
}
