pub mod chapters;
pub mod classify;
pub mod info;
pub mod page;
pub mod render;
pub mod search;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use tlv_core::time::TimeFormat;
use tlv_core::{Document, LoadError};
use tlv_view::{DateRange, SystemChannelScan, ViewError, ViewState, Viewer, ViewerConfig};

/// Where to read the log from and how to view it.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Log file to open
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Query string naming the log, e.g. "?log=session.json"
    #[arg(short, long, conflicts_with = "file")]
    pub query: Option<String>,

    /// Directory log names are resolved against
    #[arg(long, default_value = ".")]
    pub base: PathBuf,

    /// Entries per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Skip off-topic channels when placing system lines
    #[arg(long)]
    pub skip_offtopic: bool,

    /// Show timestamps with the date
    #[arg(long)]
    pub long_time: bool,
}

impl SourceArgs {
    fn config(&self) -> ViewerConfig {
        let mut config = ViewerConfig::default();
        if let Some(size) = self.page_size {
            config = config.with_page_size(size);
        }
        if self.skip_offtopic {
            config = config.with_system_scan(SystemChannelScan::SkipOffTopic);
        }
        if self.long_time {
            config = config.with_time_format(TimeFormat::MonthDayClock);
        }
        config
    }
}

/// Entry filters shared by every view command.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only entries by this character (repeatable)
    #[arg(long = "character")]
    pub characters: Vec<String>,

    /// Only entries in this channel (repeatable)
    #[arg(long = "channel")]
    pub channels: Vec<String>,

    /// Only entries matching this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only entries on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Only entries on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    fn apply(&self, view: &mut ViewState) {
        if !self.characters.is_empty() {
            view.select_characters(&self.characters);
        }
        if !self.channels.is_empty() {
            view.select_channels(&self.channels);
        }
        if let Some(query) = &self.search {
            view.set_search(query.as_str());
        }
        if self.from.is_some() || self.to.is_some() {
            view.set_date_range(DateRange::new(self.from, self.to));
        }
    }
}

/// Open the log named by `source`. Parse errors are printed as an annotated
/// report before returning.
fn open(source: &SourceArgs) -> Result<Viewer, String> {
    let mut viewer = Viewer::new(source.config(), &source.base);
    let locator = match (&source.file, &source.query) {
        (Some(file), _) => tlv_core::LogLocator::new(file.to_string_lossy()),
        (None, query) => viewer.locate(query.as_deref().unwrap_or_default()),
    };
    let path = viewer.path_for(&locator);
    tracing::debug!(path = %path.display(), "opening log");

    if let Err(err) = viewer.open(locator) {
        if let LoadError::Parse { .. } = err
            && let Ok(text) = std::fs::read_to_string(&path)
        {
            eprint!("{}", err.render_report(&text, &path.display().to_string()));
        }
        return Err(err.to_string());
    }
    Ok(viewer)
}

/// Open the log and apply filters, returning the viewer ready for display.
fn open_filtered(source: &SourceArgs, filter: &FilterArgs) -> Result<Viewer, String> {
    let mut viewer = open(source)?;
    if let Some((_, view)) = viewer.parts_mut() {
        filter.apply(view);
    }
    Ok(viewer)
}

/// The loaded document and view of a viewer that has been opened.
fn loaded(viewer: &Viewer) -> Result<(&Document, &ViewState), String> {
    viewer
        .document()
        .map(|doc| (doc, viewer.view()))
        .ok_or_else(|| ViewError::NotLoaded.to_string())
}

/// Shorten `s` to at most `max` characters, marking the cut.
fn truncate(s: &str, max: usize) -> String {
    let s = s.trim();
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}
