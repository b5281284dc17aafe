//! Rendering the current page of a document.
//!
//! Every renderer walks the same channel groups that [`ViewState`] derives
//! for the current page, so the HTML page and the text transcripts always
//! agree on grouping and filtering.

pub mod html;
pub mod text;

pub use html::{html_escape, render_html};
pub use text::{render_markdown, render_plain};

use tlv_core::{Chapter, Document};

use crate::view::ViewState;

/// One entry of the chapter navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    /// The chapter.
    pub chapter: Chapter,
    /// The page the chapter starts on under the current filters.
    pub page: usize,
    /// Whether the current page opens in this chapter.
    pub current: bool,
}

/// Chapter navigation for the current view.
pub fn navigation(doc: &Document, view: &ViewState) -> Vec<NavItem> {
    let current = view.current_chapter(doc).map(|c| c.id);
    doc.navigation_chapters()
        .into_iter()
        .map(|chapter| NavItem {
            page: view.chapter_page(doc, &chapter),
            current: current.as_deref() == Some(chapter.id.as_str()),
            chapter,
        })
        .collect()
}

/// `Page 2 / 3`, with the match count when filtered.
pub fn page_status(doc: &Document, view: &ViewState) -> String {
    let mut status = format!("Page {} / {}", view.current_page(), view.total_pages(doc));
    if view.is_filtered() {
        status.push_str(&format!(
            " ({} of {} entries match)",
            view.filtered(doc).len(),
            doc.len()
        ));
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlv_core::LogEntry;

    #[test]
    fn navigation_marks_current_chapter() {
        let mut logs = vec![LogEntry::new(0, "System", "=== A ===").as_chapter()];
        logs.extend((1..60).map(|i| LogEntry::new(i, "Alice", "x")));
        logs.push(LogEntry::new(60, "System", "=== B ===").as_chapter());
        let doc = Document::from_entries("T", logs);
        let view = ViewState::default();

        let nav = navigation(&doc, &view);
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].page, 1);
        assert!(nav[0].current);
        assert_eq!(nav[1].page, 2);
        assert!(!nav[1].current);
    }

    #[test]
    fn status_line() {
        let doc = Document::from_entries(
            "T",
            (0..120).map(|i| LogEntry::new(i, "Alice", "x")).collect(),
        );
        let mut view = ViewState::default();
        assert_eq!(page_status(&doc, &view), "Page 1 / 3");
        view.set_search("nothing");
        assert_eq!(page_status(&doc, &view), "Page 1 / 1 (0 of 120 entries match)");
    }
}
