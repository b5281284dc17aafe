use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::chapter::Chapter;
use crate::entry::LogEntry;
use crate::rules::{
    ChannelRule, ChapterSettings, CharacterRule, ExtendFormats, FontSettings,
    GlobalChannelSettings, SystemSettings,
};

/// Title used when a document has none.
pub const UNTITLED: &str = "未命名模组";

/// A loaded session log together with its presentation rules.
///
/// `logs` is in canonical chronological order and is never reordered; all
/// positions elsewhere (chapter starts, entry indices) refer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Session title.
    pub title: String,
    /// Session date as written.
    pub date: String,
    /// Entries in canonical order.
    pub logs: Vec<LogEntry>,
    /// Chapters in start order.
    pub chapters: Vec<Chapter>,
    /// Font choices.
    pub font_settings: FontSettings,
    /// System line typesetting.
    pub system_settings: SystemSettings,
    /// Chapter banner typesetting.
    pub chapter_settings: ChapterSettings,
    /// Rules keyed by channel name.
    pub channel_rules: BTreeMap<String, ChannelRule>,
    /// Rules keyed by character name.
    pub character_rules: BTreeMap<String, CharacterRule>,
    /// Document-wide channel options.
    pub global_channel_settings: GlobalChannelSettings,
    /// Rule applied to channels without their own rule.
    pub default_channel_rule: Option<ChannelRule>,
    /// Rule applied to characters without their own rule.
    pub default_character_rule: Option<CharacterRule>,
    /// Typesetting per roll result category.
    pub extend_formats: ExtendFormats,
}

impl Document {
    /// An empty document with built-in settings.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: String::new(),
            logs: Vec::new(),
            chapters: Vec::new(),
            font_settings: FontSettings::builtin(),
            system_settings: SystemSettings::builtin(),
            chapter_settings: ChapterSettings::builtin(),
            channel_rules: BTreeMap::new(),
            character_rules: BTreeMap::new(),
            global_channel_settings: GlobalChannelSettings::default(),
            default_channel_rule: None,
            default_character_rule: None,
            extend_formats: ExtendFormats::builtin(),
        }
    }

    /// Build a document from entries, deriving chapters from their markers.
    /// Entry indices are renumbered to match their position in `logs`.
    pub fn from_entries(title: impl Into<String>, mut logs: Vec<LogEntry>) -> Self {
        for (i, entry) in logs.iter_mut().enumerate() {
            entry.index = i;
        }
        let chapters = crate::chapter::extract_chapters(&logs);
        Self {
            logs,
            chapters,
            ..Self::new(title)
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Entry at a canonical position.
    pub fn entry(&self, index: usize) -> Option<&LogEntry> {
        self.logs.get(index)
    }

    /// Sorted, de-duplicated speaker names, excluding system lines and
    /// chapter markers.
    pub fn character_list(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .logs
            .iter()
            .filter(|e| e.is_speaker() && !e.name.is_empty())
            .map(|e| e.name.as_str())
            .collect();
        names.into_iter().collect()
    }

    /// Sorted, de-duplicated channels, excluding chapter markers.
    pub fn channel_list(&self) -> Vec<&str> {
        let channels: BTreeSet<&str> = self
            .logs
            .iter()
            .filter(|e| !e.is_chapter && !e.channel.is_empty())
            .map(|e| e.channel.as_str())
            .collect();
        channels.into_iter().collect()
    }

    /// Chapters offered for navigation: the real ones, or a single chapter
    /// spanning the whole log when there are none.
    pub fn navigation_chapters(&self) -> Vec<Chapter> {
        if self.chapters.is_empty() {
            vec![Chapter::whole_log(self.logs.len())]
        } else {
            self.chapters.clone()
        }
    }

    /// Canonical position of a chapter's marker: the entry carrying the
    /// chapter's id if there is one, otherwise the recorded start index.
    pub fn chapter_position(&self, chapter: &Chapter) -> usize {
        self.logs
            .iter()
            .position(|e| e.id == chapter.id)
            .unwrap_or(chapter.start_index)
    }
}
