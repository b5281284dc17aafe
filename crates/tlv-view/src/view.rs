//! View state: filters, search, and pagination over a loaded document.
//!
//! A [`ViewState`] owns every piece of mutable presentation state. All
//! derived collections (filtered entries, the page window, channel groups)
//! are recomputed from `(Document, ViewState)` on demand and never cached.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use tlv_core::time::parse_timestamp;
use tlv_core::{Chapter, Document, LogEntry};

use crate::config::{SystemChannelScan, ViewerConfig};
use crate::error::{ViewError, ViewResult};
use crate::segment::{ChannelGroup, channel_groups, is_channel_collapsed};

/// Whether entries are shown a page at a time or all at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// One page of `page_size` entries.
    #[default]
    Paginated,
    /// The whole filtered sequence.
    All,
}

/// Inclusive calendar date bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day shown.
    pub start: Option<NaiveDate>,
    /// Last day shown.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// A range between two optional bounds.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Whether either bound is set.
    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether an entry timestamp falls inside the range. Missing or
    /// unparseable timestamps are admitted.
    pub fn admits(&self, time: Option<&str>) -> bool {
        let Some(date) = time.and_then(parse_timestamp).map(|t| t.date()) else {
            return true;
        };
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// Case-insensitive search across an entry's text, speaker, dice and roll
/// payload.
pub fn matches_search(entry: &LogEntry, query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
        return true;
    }
    let hit = |s: &str| s.to_lowercase().contains(&query);
    hit(&entry.text)
        || hit(&entry.name)
        || entry.dice.as_deref().is_some_and(hit)
        || entry.extend.as_ref().is_some_and(|x| hit(&x.as_text()))
}

/// Presentation state for one viewer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    current_page: usize,
    #[serde(deserialize_with = "nonzero_page_size")]
    page_size: usize,
    search_query: String,
    selected_characters: BTreeSet<String>,
    selected_channels: BTreeSet<String>,
    date_range: DateRange,
    mode: ViewMode,
    collapsed: BTreeMap<String, bool>,
    system_scan: SystemChannelScan,
}

fn nonzero_page_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    match usize::deserialize(deserializer)? {
        0 => Err(de::Error::custom(ViewError::ZeroPageSize)),
        size => Ok(size),
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl ViewState {
    /// Fresh state on page 1 with no filters.
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            current_page: 1,
            page_size: config.page_size.max(1),
            search_query: String::new(),
            selected_characters: BTreeSet::new(),
            selected_channels: BTreeSet::new(),
            date_range: DateRange::default(),
            mode: ViewMode::default(),
            collapsed: BTreeMap::new(),
            system_scan: config.system_scan,
        }
    }

    /// The 1-based current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Entries per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The active search query, empty when not searching.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Characters the view is restricted to.
    pub fn selected_characters(&self) -> &BTreeSet<String> {
        &self.selected_characters
    }

    /// Channels the view is restricted to.
    pub fn selected_channels(&self) -> &BTreeSet<String> {
        &self.selected_channels
    }

    /// The active date bounds.
    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    /// Paginated or show-all.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// System line channel resolution.
    pub fn system_scan(&self) -> SystemChannelScan {
        self.system_scan
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    fn reset_page(&mut self) {
        self.current_page = 1;
    }

    /// Replace the search query.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.reset_page();
    }

    /// Clear the search query.
    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Select a character if unselected, else unselect it.
    pub fn toggle_character(&mut self, name: &str) {
        if !self.selected_characters.remove(name) {
            self.selected_characters.insert(name.to_string());
        }
        self.reset_page();
    }

    /// Unselect a character.
    pub fn remove_character(&mut self, name: &str) {
        self.selected_characters.remove(name);
        self.reset_page();
    }

    /// Replace the character selection.
    pub fn select_characters<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_characters = names.into_iter().map(Into::into).collect();
        self.reset_page();
    }

    /// Select a channel if unselected, else unselect it.
    pub fn toggle_channel(&mut self, channel: &str) {
        if !self.selected_channels.remove(channel) {
            self.selected_channels.insert(channel.to_string());
        }
        self.reset_page();
    }

    /// Unselect a channel.
    pub fn remove_channel(&mut self, channel: &str) {
        self.selected_channels.remove(channel);
        self.reset_page();
    }

    /// Replace the channel selection.
    pub fn select_channels<I, S>(&mut self, channels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_channels = channels.into_iter().map(Into::into).collect();
        self.reset_page();
    }

    /// Restrict entries to a date range.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
        self.reset_page();
    }

    /// Drop character, channel and date filters. The search query stays.
    pub fn clear_filters(&mut self) {
        self.selected_characters.clear();
        self.selected_channels.clear();
        self.date_range = DateRange::default();
        self.reset_page();
    }

    /// Drop every filter and the search query.
    pub fn clear_all(&mut self) {
        self.search_query.clear();
        self.clear_filters();
    }

    /// Search counts once; each selected character and channel counts once.
    pub fn active_filter_count(&self) -> usize {
        usize::from(!self.search_query.is_empty())
            + self.selected_characters.len()
            + self.selected_channels.len()
    }

    /// Whether any filter or search is active.
    pub fn is_filtered(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Whether an entry should be highlighted as a search hit.
    pub fn is_highlighted(&self, entry: &LogEntry) -> bool {
        !self.search_query.is_empty() && matches_search(entry, &self.search_query)
    }

    /// Whether an entry passes every active filter.
    pub fn admits(&self, entry: &LogEntry) -> bool {
        (self.selected_characters.is_empty() || self.selected_characters.contains(&entry.name))
            && (self.selected_channels.is_empty() || self.selected_channels.contains(&entry.channel))
            && matches_search(entry, &self.search_query)
            && self.date_range.admits(entry.time.as_deref())
    }

    /// Entries passing every active filter, in log order.
    pub fn filtered<'d>(&self, doc: &'d Document) -> Vec<&'d LogEntry> {
        let filtered: Vec<_> = doc.logs.iter().filter(|e| self.admits(e)).collect();
        tracing::trace!(total = doc.len(), filtered = filtered.len(), "applied filters");
        filtered
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    /// Switch between paginated and show-all.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.reset_page();
    }

    /// Change the page size.
    pub fn set_page_size(&mut self, page_size: usize) -> ViewResult<()> {
        if page_size == 0 {
            return Err(ViewError::ZeroPageSize);
        }
        self.page_size = page_size;
        self.reset_page();
        Ok(())
    }

    fn pages_for(&self, count: usize) -> usize {
        match self.mode {
            ViewMode::All => 1,
            ViewMode::Paginated => count.div_ceil(self.page_size).max(1),
        }
    }

    /// Number of pages in the filtered sequence, at least 1.
    pub fn total_pages(&self, doc: &Document) -> usize {
        self.pages_for(self.filtered(doc).len())
    }

    /// The entries on the current page.
    pub fn page_window<'d>(&self, doc: &'d Document) -> Vec<&'d LogEntry> {
        let filtered = self.filtered(doc);
        if self.mode == ViewMode::All {
            return filtered;
        }
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(filtered.len());
        let end = start.saturating_add(self.page_size).min(filtered.len());
        filtered[start..end].to_vec()
    }

    /// The current page grouped into channel lanes.
    pub fn channel_groups<'d>(&self, doc: &'d Document) -> Vec<ChannelGroup<'d>> {
        channel_groups(&doc.logs, self.page_window(doc), self.system_scan)
    }

    /// Go to a page in `1..=total_pages`.
    pub fn jump_to_page(&mut self, doc: &Document, page: usize) -> ViewResult<()> {
        let total = self.total_pages(doc);
        if page == 0 || page > total {
            return Err(ViewError::PageOutOfRange { page, total });
        }
        self.current_page = page;
        Ok(())
    }

    /// Advance one page. Returns false on the last page.
    pub fn next_page(&mut self, doc: &Document) -> bool {
        if self.current_page < self.total_pages(doc) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns false on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Chapters
    // ------------------------------------------------------------------

    /// The page showing a chapter's start under the current filters: the
    /// page of the first filtered entry at or after the chapter marker, or
    /// the last page when none follows.
    pub fn chapter_page(&self, doc: &Document, chapter: &Chapter) -> usize {
        if self.mode == ViewMode::All {
            return 1;
        }
        let position = doc.chapter_position(chapter);
        let filtered = self.filtered(doc);
        filtered
            .iter()
            .position(|e| e.index >= position)
            .map_or_else(|| self.pages_for(filtered.len()), |i| i / self.page_size + 1)
    }

    /// Jump to the page where a chapter starts. Returns the new page.
    pub fn jump_to_chapter(&mut self, doc: &Document, chapter_id: &str) -> ViewResult<usize> {
        let chapter = doc
            .navigation_chapters()
            .into_iter()
            .find(|c| c.id == chapter_id)
            .ok_or_else(|| ViewError::UnknownChapter(chapter_id.to_string()))?;
        self.current_page = self.chapter_page(doc, &chapter);
        Ok(self.current_page)
    }

    /// The chapter the current page opens in.
    pub fn current_chapter(&self, doc: &Document) -> Option<Chapter> {
        let chapters = doc.navigation_chapters();
        let first = self.page_window(doc).first().map_or(0, |e| e.index);
        chapters
            .iter()
            .rev()
            .find(|c| c.start_index <= first)
            .or_else(|| chapters.first())
            .cloned()
    }

    /// 1-based page number within the current chapter.
    pub fn page_in_chapter(&self, doc: &Document) -> usize {
        self.current_chapter(doc).map_or(1, |c| {
            let start = self.chapter_page(doc, &c);
            self.current_page.saturating_sub(start) + 1
        })
    }

    /// Pages spanned by the current chapter's filtered entries.
    pub fn chapter_total_pages(&self, doc: &Document) -> usize {
        let Some(chapter) = self.current_chapter(doc) else {
            return 1;
        };
        if self.mode == ViewMode::All {
            return 1;
        }
        let filtered = self.filtered(doc);
        let mut inside = filtered
            .iter()
            .enumerate()
            .filter(|(_, e)| chapter.contains(e.index))
            .map(|(i, _)| i / self.page_size);
        match (inside.next(), inside.last()) {
            (Some(first), Some(last)) => last - first + 1,
            _ => 1,
        }
    }

    // ------------------------------------------------------------------
    // Collapsing
    // ------------------------------------------------------------------

    /// Whether a channel lane is shown collapsed.
    pub fn is_collapsed(&self, doc: &Document, channel: &str) -> bool {
        is_channel_collapsed(doc, &self.collapsed, channel)
    }

    /// Flip a channel lane's collapsed state.
    pub fn toggle_collapsed(&mut self, doc: &Document, channel: &str) {
        let next = !self.is_collapsed(doc, channel);
        self.collapsed.insert(channel.to_string(), next);
    }
}
