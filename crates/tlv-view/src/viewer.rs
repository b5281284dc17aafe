//! Viewer session management.
//!
//! `Viewer` owns the loaded document and the view state, and tracks the
//! load lifecycle. Each load request hands out a generation ticket; a
//! completion carrying an outdated ticket is discarded, so a slow response
//! for an old source can never replace a newer document.

use std::fmt;
use std::path::PathBuf;

use tlv_core::{Document, LoadError, LoadResult, LogLocator, load_document};

use crate::config::ViewerConfig;
use crate::view::ViewState;

/// Where the viewer is in its load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// A document is loaded.
    Ready,
    /// The last request failed; the message is shown to the user.
    Failed(String),
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Proof of a load request, handed back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    locator: LogLocator,
}

impl LoadTicket {
    /// The source this ticket was issued for.
    pub fn locator(&self) -> &LogLocator {
        &self.locator
    }

    /// Monotonic request number.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A viewer session: one document, one view state.
pub struct Viewer {
    config: ViewerConfig,
    base: PathBuf,
    status: LoadStatus,
    generation: u64,
    requested: Option<LogLocator>,
    loaded: Option<LogLocator>,
    document: Option<Document>,
    view: ViewState,
}

impl Viewer {
    /// Create a viewer resolving log names against `base`.
    pub fn new(config: ViewerConfig, base: impl Into<PathBuf>) -> Self {
        let view = ViewState::new(&config);
        Self {
            config,
            base: base.into(),
            status: LoadStatus::Idle,
            generation: 0,
            requested: None,
            loaded: None,
            document: None,
            view,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Get the load status.
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Get the loaded document, if any.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Get the source of the loaded document, if any.
    pub fn source(&self) -> Option<&LogLocator> {
        self.loaded.as_ref()
    }

    /// Get the view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Borrow the document and a mutable view state together.
    pub fn parts_mut(&mut self) -> Option<(&Document, &mut ViewState)> {
        self.document.as_ref().map(|doc| (doc, &mut self.view))
    }

    /// Where a locator points on disk.
    pub fn path_for(&self, locator: &LogLocator) -> PathBuf {
        locator.resolve(&self.base)
    }

    /// The locator named by a query string, or the configured default.
    pub fn locate(&self, query: &str) -> LogLocator {
        LogLocator::from_query(query, &self.config.default_log)
    }

    /// Ask for a source to be loaded.
    ///
    /// Returns `None` when that source is already loaded or already in
    /// flight; otherwise a ticket to pass to [`Viewer::complete`].
    pub fn request(&mut self, locator: LogLocator) -> Option<LoadTicket> {
        let current = match self.status {
            LoadStatus::Ready => self.loaded.as_ref(),
            LoadStatus::Loading => self.requested.as_ref(),
            LoadStatus::Idle | LoadStatus::Failed(_) => None,
        };
        if current == Some(&locator) {
            tracing::debug!(source = %locator, "source unchanged, not reloading");
            return None;
        }
        Some(self.issue(locator))
    }

    fn issue(&mut self, locator: LogLocator) -> LoadTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        self.requested = Some(locator.clone());
        tracing::debug!(source = %locator, generation = self.generation, "load requested");
        LoadTicket {
            generation: self.generation,
            locator,
        }
    }

    /// Deliver the outcome of a request. Returns false when the ticket is
    /// stale and the outcome was discarded.
    pub fn complete(&mut self, ticket: LoadTicket, result: LoadResult<Document>) -> bool {
        if ticket.generation != self.generation {
            tracing::warn!(
                source = %ticket.locator,
                stale = ticket.generation,
                current = self.generation,
                "discarding stale load"
            );
            return false;
        }
        match result {
            Ok(document) => self.accept(ticket.locator, document),
            Err(err) => self.reject(&ticket.locator, &err),
        }
        true
    }

    fn accept(&mut self, locator: LogLocator, document: Document) {
        tracing::debug!(
            source = %locator,
            entries = document.len(),
            chapters = document.chapters.len(),
            "document ready"
        );
        self.document = Some(document);
        self.loaded = Some(locator);
        self.requested = None;
        self.view = ViewState::new(&self.config);
        self.status = LoadStatus::Ready;
    }

    fn reject(&mut self, locator: &LogLocator, err: &LoadError) {
        tracing::debug!(source = %locator, error = %err, "load failed");
        self.requested = None;
        self.status = LoadStatus::Failed(err.to_string());
    }

    /// Load a source from disk and wait for it. An already loaded source is
    /// returned without touching the disk.
    pub fn open(&mut self, locator: LogLocator) -> LoadResult<&Document> {
        let loaded = self.status == LoadStatus::Ready
            && self.loaded.as_ref() == Some(&locator)
            && self.document.is_some();
        if !loaded {
            let ticket = self.issue(locator);
            let path = self.path_for(&ticket.locator);
            match load_document(&path) {
                Ok(document) => self.accept(ticket.locator, document),
                Err(err) => {
                    self.reject(&ticket.locator, &err);
                    return Err(err);
                }
            }
        }
        self.document.as_ref().ok_or(LoadError::MissingLogs)
    }

    /// Load the source named by a query string.
    pub fn open_query(&mut self, query: &str) -> LoadResult<&Document> {
        let locator = self.locate(query);
        self.open(locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tlv_core::{LogEntry, parse_document};

    fn doc(title: &str) -> Document {
        Document::from_entries(title, vec![LogEntry::new(0, "Alice", "hi")])
    }

    #[test]
    fn lifecycle() {
        let mut viewer = Viewer::new(ViewerConfig::default(), ".");
        assert_eq!(viewer.status(), &LoadStatus::Idle);

        let ticket = viewer.request(LogLocator::new("a.json")).unwrap();
        assert_eq!(viewer.status(), &LoadStatus::Loading);
        assert!(viewer.complete(ticket, Ok(doc("A"))));
        assert_eq!(viewer.status(), &LoadStatus::Ready);
        assert_eq!(viewer.document().map(|d| d.title.as_str()), Some("A"));
        assert_eq!(viewer.source().map(LogLocator::name), Some("a.json"));
    }

    #[test]
    fn same_source_is_not_reloaded() {
        let mut viewer = Viewer::new(ViewerConfig::default(), ".");
        let ticket = viewer.request(LogLocator::new("a.json")).unwrap();
        assert!(viewer.request(LogLocator::new("a.json")).is_none());
        viewer.complete(ticket, Ok(doc("A")));
        assert!(viewer.request(LogLocator::new("a.json")).is_none());
        assert!(viewer.request(LogLocator::new("b.json")).is_some());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut viewer = Viewer::new(ViewerConfig::default(), ".");
        let old = viewer.request(LogLocator::new("a.json")).unwrap();
        let new = viewer.request(LogLocator::new("b.json")).unwrap();
        assert!(new.generation() > old.generation());

        assert!(viewer.complete(new, Ok(doc("B"))));
        assert!(!viewer.complete(old, Ok(doc("A"))));
        assert_eq!(viewer.document().map(|d| d.title.as_str()), Some("B"));
    }

    #[test]
    fn failure_keeps_message() {
        let mut viewer = Viewer::new(ViewerConfig::default(), ".");
        let ticket = viewer.request(LogLocator::new("a.json")).unwrap();
        let err = parse_document("{}").unwrap_err();
        viewer.complete(ticket, Err(err));
        assert!(matches!(viewer.status(), LoadStatus::Failed(m) if m.contains("logs")));
        assert!(viewer.document().is_none());
        // a failed source may be requested again
        assert!(viewer.request(LogLocator::new("a.json")).is_some());
    }

    #[test]
    fn new_document_resets_view() {
        let mut viewer = Viewer::new(ViewerConfig::default(), ".");
        let t = viewer.request(LogLocator::new("a.json")).unwrap();
        viewer.complete(t, Ok(doc("A")));
        if let Some((_, view)) = viewer.parts_mut() {
            view.set_search("hi");
        }
        assert!(viewer.view().is_filtered());

        let t = viewer.request(LogLocator::new("b.json")).unwrap();
        viewer.complete(t, Ok(doc("B")));
        assert!(!viewer.view().is_filtered());
    }

    #[test]
    fn open_from_query_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("s1.json"),
            r#"{"title":"Session","logs":[{"name":"Alice","text":"hi"}]}"#,
        )
        .unwrap();

        let mut viewer = Viewer::new(ViewerConfig::default(), dir.path());
        let doc = viewer.open_query("?log=s1.json").unwrap();
        assert_eq!(doc.title, "Session");
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn open_missing_file_reports_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut viewer = Viewer::new(ViewerConfig::default(), dir.path());
        let err = viewer.open_query("").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(matches!(viewer.status(), LoadStatus::Failed(_)));
    }
}
