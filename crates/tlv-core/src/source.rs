use std::fmt;
use std::path::{Path, PathBuf};

/// Query parameter naming the log file.
pub const LOG_PARAM: &str = "log";

/// Which log file to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogLocator {
    name: String,
}

impl LogLocator {
    /// Locate a log by file name or relative path.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Read the `log` parameter from a query string such as `?log=a.json&x=1`.
    /// Falls back to `default` when the parameter is absent or empty.
    pub fn from_query(query: &str, default: &str) -> Self {
        let query = query.trim_start_matches('?');
        let name = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, value)| key == LOG_PARAM && !value.is_empty())
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| default.to_string());
        Self { name }
    }

    /// The file name as requested.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve against a base directory. Absolute names are kept as-is.
    pub fn resolve(&self, base: &Path) -> PathBuf {
        let path = Path::new(&self.name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }
}

impl fmt::Display for LogLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
