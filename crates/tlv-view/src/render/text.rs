//! Markdown and plain-text transcripts of the current view.

use tlv_core::chapter::chapter_title;
use tlv_core::time::format_time;
use tlv_core::{Document, LogEntry};

use super::page_status;
use crate::classify::{ResultCategory, roll_outcome};
use crate::config::ViewerConfig;
use crate::view::ViewState;

fn roll_suffix(entry: &LogEntry) -> Option<(String, ResultCategory)> {
    roll_outcome(entry).map(|o| (o.display, o.category))
}

/// Render the current page as Markdown.
pub fn render_markdown(doc: &Document, view: &ViewState, config: &ViewerConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", doc.title));
    if !doc.date.is_empty() {
        out.push_str(&format!("*{}*\n\n", doc.date));
    }

    for group in view.channel_groups(doc) {
        if group.is_chapter() {
            for entry in &group.messages {
                if entry.is_chapter {
                    out.push_str(&format!("## {}\n\n", chapter_title(&entry.text)));
                } else {
                    out.push_str(&format!("> {}\n\n", entry.text));
                }
            }
            continue;
        }

        let collapsed = view.is_collapsed(doc, &group.channel);
        out.push_str(&format!("### {}\n\n", group.channel));
        if collapsed {
            out.push_str(&format!("*{} messages collapsed*\n\n", group.messages.len()));
            continue;
        }

        for entry in &group.messages {
            let time = format_time(entry.time.as_deref(), config.time_format);
            let stamp = if time.is_empty() {
                String::new()
            } else {
                format!("`{time}` ")
            };
            if entry.is_system() {
                out.push_str(&format!("- {stamp}*{}*\n", entry.text));
            } else {
                out.push_str(&format!("- {stamp}**{}**: {}\n", entry.name, entry.text.replace('\n', "  \n  ")));
            }
            if let Some((display, category)) = roll_suffix(entry) {
                out.push_str(&format!("  - `{display}` ({category})\n"));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!("---\n\n{}\n", page_status(doc, view)));
    out
}

/// Render the current page as a plain transcript.
pub fn render_plain(doc: &Document, view: &ViewState, config: &ViewerConfig) -> String {
    let mut out = String::new();

    for group in view.channel_groups(doc) {
        if group.is_chapter() {
            for entry in &group.messages {
                if entry.is_chapter {
                    out.push_str(&format!("=== {} ===\n", chapter_title(&entry.text)));
                } else {
                    out.push_str(&format!("  * {}\n", entry.text));
                }
            }
            continue;
        }

        out.push_str(&format!("[{}]\n", group.channel));
        if view.is_collapsed(doc, &group.channel) {
            out.push_str(&format!("  ({} collapsed)\n", group.messages.len()));
            continue;
        }
        for entry in &group.messages {
            let time = format_time(entry.time.as_deref(), config.time_format);
            let stamp = if time.is_empty() {
                String::new()
            } else {
                format!("{time} ")
            };
            if entry.is_system() {
                out.push_str(&format!("  {stamp}* {}\n", entry.text));
            } else {
                out.push_str(&format!("  {stamp}<{}> {}\n", entry.name, entry.text));
            }
            if let Some((display, category)) = roll_suffix(entry) {
                out.push_str(&format!("      {display} [{}]\n", category.key()));
            }
        }
    }

    out.push_str(&format!("-- {} --\n", page_status(doc, view)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlv_core::parse_document;

    fn doc() -> Document {
        parse_document(
            r#"{
                "title": "Session",
                "date": "2024-03-02",
                "logs": [
                    {"name": "System", "text": "=== Chapter One ===", "isChapter": true},
                    {"name": "Alice", "channel": "Main", "text": "hi", "time": "2024-03-02 21:05:00"},
                    {"name": "System", "channel": "Main", "text": "roll: 80>成功", "dice": "D100=40/80 40>成功"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn plain_transcript() {
        let doc = doc();
        let text = render_plain(&doc, &ViewState::default(), &ViewerConfig::default());
        insta::assert_snapshot!(text, @r"
        === Chapter One ===
        [Main]
          21:05 <Alice> hi
          * roll: 80>成功
              D100=40/80 40>成功 [success]
        -- Page 1 / 1 --
        ");
    }

    #[test]
    fn markdown_transcript() {
        let doc = doc();
        let md = render_markdown(&doc, &ViewState::default(), &ViewerConfig::default());
        assert!(md.starts_with("# Session\n\n*2024-03-02*\n"));
        assert!(md.contains("## Chapter One"));
        assert!(md.contains("### Main"));
        assert!(md.contains("- `21:05` **Alice**: hi"));
        assert!(md.contains("- *roll: 80>成功*"));
        assert!(md.contains("  - `D100=40/80 40>成功` (Success)"));
        assert!(md.ends_with("Page 1 / 1\n"));
    }

    #[test]
    fn collapsed_lane_is_summarised() {
        let mut doc = doc();
        doc.global_channel_settings
            .collapsed_channels
            .insert("Main".into(), true);
        let md = render_markdown(&doc, &ViewState::default(), &ViewerConfig::default());
        assert!(md.contains("*2 messages collapsed*"));
        assert!(!md.contains("Alice"));
    }
}
