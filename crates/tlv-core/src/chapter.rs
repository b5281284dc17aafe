use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;

/// Delimiter the authoring tool wraps chapter titles in.
pub const CHAPTER_DELIMITER: &str = "===";

/// Identifier of the synthetic chapter covering a log without chapters.
pub const WHOLE_LOG_CHAPTER_ID: &str = "default-chapter";

/// A chapter: a named run of entries starting at `start_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Identifier, normally the id of the marker entry.
    pub id: String,
    /// Display name with delimiters stripped.
    pub name: String,
    /// Index of the first entry of the chapter in the canonical log.
    pub start_index: usize,
    /// Number of entries from `start_index` up to the next chapter.
    pub message_count: usize,
}

impl Chapter {
    /// The single chapter offered for navigation when a log has none.
    pub fn whole_log(len: usize) -> Self {
        Self {
            id: WHOLE_LOG_CHAPTER_ID.to_string(),
            name: "完整的冒险".to_string(),
            start_index: 0,
            message_count: len,
        }
    }

    /// One past the last entry index belonging to this chapter.
    pub fn end_index(&self) -> usize {
        self.start_index + self.message_count
    }

    /// Whether the entry at `index` falls inside this chapter.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index()
    }

    /// Page (1-based) the chapter starts on when the unfiltered log is cut
    /// into pages of `page_size`.
    pub fn page(&self, page_size: usize) -> usize {
        self.start_index / page_size.max(1) + 1
    }
}

/// Strip chapter delimiters from a marker text: `=== Act I ===` → `Act I`.
pub fn chapter_title(text: &str) -> String {
    text.replace(CHAPTER_DELIMITER, "").trim().to_string()
}

/// Whether an entry opens a chapter: an explicit marker, or a system line
/// whose text carries the delimiter.
pub fn is_chapter_marker(entry: &LogEntry) -> bool {
    entry.is_chapter || (entry.is_system() && entry.text.contains(CHAPTER_DELIMITER))
}

/// Derive chapters from the markers in a log.
pub fn extract_chapters(logs: &[LogEntry]) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = Vec::new();
    for (index, entry) in logs.iter().enumerate() {
        if !is_chapter_marker(entry) {
            continue;
        }
        let title = chapter_title(&entry.text);
        let name = if title.is_empty() {
            format!("章节 {}", chapters.len() + 1)
        } else {
            title
        };
        chapters.push(Chapter {
            id: entry.id.clone(),
            name,
            start_index: index,
            message_count: 0,
        });
    }
    fill_message_counts(&mut chapters, logs.len());
    chapters
}

/// Set each chapter's count to the distance to the next chapter start (or
/// the end of the log). Chapters are expected in start order.
pub fn fill_message_counts(chapters: &mut [Chapter], log_len: usize) {
    let starts: Vec<usize> = chapters.iter().map(|c| c.start_index).collect();
    for (i, chapter) in chapters.iter_mut().enumerate() {
        let next = starts.get(i + 1).copied().unwrap_or(log_len);
        chapter.message_count = next.saturating_sub(chapter.start_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> Vec<LogEntry> {
        vec![
            LogEntry::new(0, "System", "=== Chapter One ===").as_chapter(),
            LogEntry::new(1, "Alice", "hi").in_channel("Main"),
            LogEntry::new(2, "system", "=== ===").in_channel("Main"),
            LogEntry::new(3, "Bob", "hello").in_channel("Main"),
            LogEntry::new(4, "Bob", "=== not a chapter ===").in_channel("Main"),
        ]
    }

    #[test]
    fn title_strips_delimiters() {
        assert_eq!(chapter_title("=== Chapter One ==="), "Chapter One");
        assert_eq!(chapter_title("===Prologue==="), "Prologue");
        assert_eq!(chapter_title("plain"), "plain");
    }

    #[test]
    fn extract_finds_markers_and_counts() {
        let chapters = extract_chapters(&log());
        assert_eq!(chapters.len(), 2);

        assert_eq!(chapters[0].name, "Chapter One");
        assert_eq!(chapters[0].start_index, 0);
        assert_eq!(chapters[0].message_count, 2);
        assert_eq!(chapters[0].id, "msg-0");

        // system line with delimiters but no title gets a numbered name
        assert_eq!(chapters[1].name, "章节 2");
        assert_eq!(chapters[1].start_index, 2);
        assert_eq!(chapters[1].message_count, 3);
    }

    #[test]
    fn speaker_text_with_delimiter_is_not_a_chapter() {
        let chapters = extract_chapters(&log());
        assert!(chapters.iter().all(|c| c.start_index != 4));
    }

    #[test]
    fn page_and_contains() {
        let c = Chapter {
            id: "c".into(),
            name: "c".into(),
            start_index: 120,
            message_count: 30,
        };
        assert_eq!(c.page(50), 3);
        assert_eq!(c.page(0), 121);
        assert!(c.contains(120));
        assert!(c.contains(149));
        assert!(!c.contains(150));
    }

    #[test]
    fn whole_log_chapter() {
        let c = Chapter::whole_log(42);
        assert_eq!(c.start_index, 0);
        assert_eq!(c.message_count, 42);
        assert!(c.contains(41));
    }
}
