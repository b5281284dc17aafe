use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::chapter::{Chapter, chapter_title, extract_chapters, fill_message_counts};
use crate::document::{Document, UNTITLED};
use crate::entry::{
    DEFAULT_CHANNEL, LogEntry, RollPayload, SYSTEM_CHANNEL, SurfaceOverride, UNKNOWN_SPEAKER,
};
use crate::error::{LoadError, LoadResult};
use crate::rules::{
    ChannelRule, ChapterSettings, CharacterRule, ExtendFormats, FontSettings,
    GlobalChannelSettings, SystemSettings,
};

/// Everything in the document except the `logs` array.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawDocument {
    title: Option<String>,
    date: Option<String>,
    chapters: Option<Vec<RawChapter>>,
    font_settings: Option<FontSettings>,
    system_settings: Option<SystemSettings>,
    chapter_settings: Option<ChapterSettings>,
    channel_rules: Option<BTreeMap<String, ChannelRule>>,
    character_rules: Option<BTreeMap<String, CharacterRule>>,
    global_channel_settings: Option<GlobalChannelSettings>,
    default_channel_rule: Option<ChannelRule>,
    default_character_rule: Option<CharacterRule>,
    extend_formats: Option<ExtendFormats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawChapter {
    id: Value,
    name: Option<String>,
    title: Option<String>,
    start_index: Option<usize>,
    position: Option<usize>,
    message_count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawEntry {
    id: Value,
    name: Option<String>,
    text: Option<String>,
    color: Option<String>,
    channel: Option<String>,
    icon: Option<String>,
    dice: Value,
    extend: Value,
    to: Option<String>,
    time: Option<String>,
    message_image: Option<String>,
    is_chapter: Option<bool>,

    name_use_image: Option<bool>,
    name_background: Option<String>,
    name_opacity: Option<f64>,
    name_image: Option<String>,
    name_image_size: Option<String>,
    name_image_opacity: Option<f64>,

    bubble_use_image: Option<bool>,
    bubble_color: Option<String>,
    bubble_opacity: Option<f64>,
    bubble_image: Option<String>,
    bubble_image_size: Option<String>,
    bubble_image_opacity: Option<f64>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Strings and numbers become text; everything else counts as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawEntry {
    fn normalize(self, index: usize) -> LogEntry {
        let is_chapter = self.is_chapter.unwrap_or(false);
        let channel = if is_chapter {
            SYSTEM_CHANNEL.to_string()
        } else {
            non_empty(self.channel).unwrap_or_else(|| DEFAULT_CHANNEL.to_string())
        };
        let dice = RollPayload::from_value(self.dice).map(|p| p.as_text().into_owned());

        LogEntry {
            index,
            id: scalar_text(&self.id).unwrap_or_else(|| format!("msg-{index}")),
            name: non_empty(self.name).unwrap_or_else(|| UNKNOWN_SPEAKER.to_string()),
            text: self.text.unwrap_or_default(),
            color: non_empty(self.color),
            channel,
            icon: non_empty(self.icon),
            dice,
            extend: RollPayload::from_value(self.extend),
            to: non_empty(self.to),
            time: non_empty(self.time),
            message_image: non_empty(self.message_image),
            is_chapter,
            name_style: SurfaceOverride {
                use_image: self.name_use_image,
                color: non_empty(self.name_background),
                opacity: self.name_opacity,
                image: non_empty(self.name_image),
                image_size: non_empty(self.name_image_size),
                image_opacity: self.name_image_opacity,
            },
            bubble_style: SurfaceOverride {
                use_image: self.bubble_use_image,
                color: non_empty(self.bubble_color),
                opacity: self.bubble_opacity,
                image: non_empty(self.bubble_image),
                image_size: non_empty(self.bubble_image_size),
                image_opacity: self.bubble_image_opacity,
            },
        }
    }
}

/// Turn an explicit chapter list into chapters ordered by start.
fn explicit_chapters(raw: Vec<RawChapter>, logs: &[LogEntry]) -> Vec<Chapter> {
    let mut counted = Vec::with_capacity(raw.len());
    for (i, rc) in raw.into_iter().enumerate() {
        let id = scalar_text(&rc.id).unwrap_or_else(|| format!("chapter-{i}"));
        let start_index = rc
            .start_index
            .or(rc.position)
            .or_else(|| logs.iter().position(|e| e.id == id))
            .unwrap_or(0);
        let name = non_empty(rc.name)
            .or(non_empty(rc.title))
            .map(|n| chapter_title(&n))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("章节 {}", i + 1));
        counted.push((
            Chapter {
                id,
                name,
                start_index,
                message_count: 0,
            },
            rc.message_count,
        ));
    }
    counted.sort_by_key(|(c, _)| c.start_index);

    let mut chapters: Vec<Chapter> = counted.iter().map(|(c, _)| c.clone()).collect();
    fill_message_counts(&mut chapters, logs.len());
    for (chapter, (_, explicit)) in chapters.iter_mut().zip(&counted) {
        if let Some(n) = explicit {
            chapter.message_count = *n;
        }
    }
    chapters
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Parse and normalize a log document from JSON text.
///
/// The document may be an object with a `logs` array or a bare array of
/// entries. Missing optional fields are defaulted, never rejected.
pub fn parse_document(text: &str) -> LoadResult<Document> {
    if text.trim().is_empty() {
        return Err(LoadError::Empty);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| LoadError::from_parse(&e, text))?;

    let (raw_logs, meta) = match value {
        Value::Array(items) => (items, RawDocument::default()),
        Value::Object(mut map) => {
            let Some(Value::Array(items)) = map.remove("logs") else {
                return Err(LoadError::MissingLogs);
            };
            let meta: RawDocument = serde_json::from_value(Value::Object(map))
                .map_err(|e| LoadError::Schema(e.to_string()))?;
            (items, meta)
        }
        _ => return Err(LoadError::MissingLogs),
    };

    let logs = raw_logs
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawEntry = serde_json::from_value(item)
                .map_err(|e| LoadError::Schema(format!("entry {index}: {e}")))?;
            Ok(raw.normalize(index))
        })
        .collect::<LoadResult<Vec<_>>>()?;

    let chapters = match meta.chapters {
        Some(raw) if !raw.is_empty() => explicit_chapters(raw, &logs),
        _ => extract_chapters(&logs),
    };

    let doc = Document {
        title: non_empty(meta.title).unwrap_or_else(|| UNTITLED.to_string()),
        date: non_empty(meta.date).unwrap_or_else(today),
        logs,
        chapters,
        font_settings: meta.font_settings.unwrap_or_else(FontSettings::builtin),
        system_settings: meta.system_settings.unwrap_or_else(SystemSettings::builtin),
        chapter_settings: meta.chapter_settings.unwrap_or_else(ChapterSettings::builtin),
        channel_rules: meta.channel_rules.unwrap_or_default(),
        character_rules: meta.character_rules.unwrap_or_default(),
        global_channel_settings: meta.global_channel_settings.unwrap_or_default(),
        default_channel_rule: meta.default_channel_rule,
        default_character_rule: meta.default_character_rule,
        extend_formats: meta.extend_formats.unwrap_or_else(ExtendFormats::builtin),
    };

    tracing::debug!(
        title = %doc.title,
        entries = doc.logs.len(),
        chapters = doc.chapters.len(),
        characters = doc.character_list().len(),
        channels = doc.channel_list().len(),
        "log document parsed"
    );

    Ok(doc)
}

/// Read and parse a log document from disk.
pub fn load_document(path: &Path) -> LoadResult<Document> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object_with_logs() {
        let text = json!({
            "title": "The Haunting",
            "date": "2024-05-01",
            "logs": [
                {"name": "System", "text": "=== Chapter One ===", "isChapter": true, "channel": "Main"},
                {"name": "Alice", "channel": "Main", "text": "hi", "color": "#ff0000"},
                {"name": "System", "channel": "Main", "text": "roll: 80>成功"}
            ]
        })
        .to_string();

        let doc = parse_document(&text).unwrap();
        assert_eq!(doc.title, "The Haunting");
        assert_eq!(doc.date, "2024-05-01");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.logs[0].channel, SYSTEM_CHANNEL);
        assert_eq!(doc.logs[1].color.as_deref(), Some("#ff0000"));
        assert_eq!(doc.chapters.len(), 1);
        assert_eq!(doc.chapters[0].name, "Chapter One");
        assert_eq!(doc.chapters[0].start_index, 0);
    }

    #[test]
    fn parses_bare_array() {
        let doc = parse_document(r#"[{"name": "A", "text": "x"}]"#).unwrap();
        assert_eq!(doc.title, UNTITLED);
        assert_eq!(doc.len(), 1);
        assert!(!doc.date.is_empty());
    }

    #[test]
    fn defaults_missing_fields() {
        let doc = parse_document(r#"{"logs": [{}, {"id": 7, "name": "", "channel": ""}]}"#).unwrap();
        let a = &doc.logs[0];
        assert_eq!(a.id, "msg-0");
        assert_eq!(a.name, UNKNOWN_SPEAKER);
        assert_eq!(a.channel, DEFAULT_CHANNEL);
        assert_eq!(a.text, "");
        assert!(!a.is_chapter);
        assert!(a.name_style.is_empty());

        let b = &doc.logs[1];
        assert_eq!(b.id, "7");
        assert_eq!(b.name, UNKNOWN_SPEAKER);
        assert_eq!(b.index, 1);
    }

    #[test]
    fn reads_style_overrides() {
        let doc = parse_document(
            r##"{"logs": [{"name": "A", "bubbleUseImage": true, "bubbleImage": "b.png",
                "bubbleOpacity": 0.4, "nameBackground": "#123"}]}"##,
        )
        .unwrap();
        let e = &doc.logs[0];
        assert_eq!(e.bubble_style.use_image, Some(true));
        assert_eq!(e.bubble_style.image.as_deref(), Some("b.png"));
        assert_eq!(e.bubble_style.opacity, Some(0.4));
        assert!(e.bubble_style.image_opacity.is_none());
        assert_eq!(e.name_style.color.as_deref(), Some("#123"));
    }

    #[test]
    fn extend_string_and_object_kept() {
        let doc = parse_document(
            r#"{"logs": [
                {"name": "A", "extend": "{\"roll\":{\"result\":\"成功\"}}"},
                {"name": "B", "extend": {"roll": {"result": "失败"}}},
                {"name": "C", "dice": "1d100=42"}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(doc.logs[0].extend, Some(RollPayload::Text(_))));
        assert!(matches!(doc.logs[1].extend, Some(RollPayload::Structured(_))));
        assert_eq!(doc.logs[2].dice.as_deref(), Some("1d100=42"));
    }

    #[test]
    fn explicit_chapters_accept_aliases() {
        let doc = parse_document(
            r#"{
                "logs": [{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}],
                "chapters": [
                    {"id": "c2", "title": "=== Second ===", "position": 2},
                    {"id": "a", "name": "First"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.chapters.len(), 2);
        assert_eq!(doc.chapters[0].name, "First");
        assert_eq!(doc.chapters[0].start_index, 0);
        assert_eq!(doc.chapters[0].message_count, 2);
        assert_eq!(doc.chapters[1].name, "Second");
        assert_eq!(doc.chapters[1].message_count, 2);
    }

    #[test]
    fn settings_fall_back_to_builtin() {
        let doc = parse_document(r##"{"logs": [], "systemSettings": {"color": "#ff00ff"}}"##).unwrap();
        assert_eq!(doc.system_settings.color.as_deref(), Some("#ff00ff"));
        assert!(doc.system_settings.prefix.is_none());
        assert_eq!(doc.font_settings, FontSettings::builtin());
        assert!(doc.default_character_rule.is_none());
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(parse_document("  \n"), Err(LoadError::Empty)));
    }

    #[test]
    fn missing_logs_is_an_error() {
        assert!(matches!(parse_document(r#"{"title": "x"}"#), Err(LoadError::MissingLogs)));
        assert!(matches!(parse_document(r#"{"logs": {}}"#), Err(LoadError::MissingLogs)));
        assert!(matches!(parse_document("42"), Err(LoadError::MissingLogs)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(parse_document("{\"logs\": [}"), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn wrong_field_type_is_a_schema_error() {
        let err = parse_document(r#"{"logs": [{"name": ["not", "a", "string"]}]}"#).unwrap_err();
        match err {
            LoadError::Schema(msg) => assert!(msg.starts_with("entry 0")),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        std::fs::write(&path, r#"{"title": "T", "logs": [{"name": "A"}]}"#).unwrap();
        let doc = load_document(&path).unwrap();
        assert_eq!(doc.title, "T");
    }
}
