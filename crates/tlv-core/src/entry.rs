use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel assigned to entries that carry no channel of their own.
pub const DEFAULT_CHANNEL: &str = "默认频道";

/// Sentinel channel for chapter markers and unresolved system lines.
pub const SYSTEM_CHANNEL: &str = "系统";

/// Speaker name used when an entry has none.
pub const UNKNOWN_SPEAKER: &str = "未知角色";

/// Speaker name (compared case-insensitively) that marks a system line.
pub const SYSTEM_SPEAKER: &str = "system";

/// A roll result attached to an entry, as the authoring tool wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollPayload {
    /// A bare string. It may itself contain serialized JSON.
    Text(String),
    /// A structured object, usually `{ "roll": { "result": "…" } }`.
    Structured(Value),
}

impl RollPayload {
    /// Build a payload from an arbitrary JSON value. Empty strings and
    /// `null` yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Self::Text(s)),
            Value::Bool(false) => None,
            Value::Number(n) => Some(Self::Text(n.to_string())),
            other => Some(Self::Structured(other)),
        }
    }

    /// The payload as searchable text: strings verbatim, objects serialized.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Structured(v) => Cow::Owned(v.to_string()),
        }
    }
}

/// Per-message overrides for one visual surface (name label or bubble).
///
/// Every attribute is independently optional; the style resolver walks past
/// the ones that are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOverride {
    /// Prefer the image over the flat colour.
    pub use_image: Option<bool>,
    /// Flat background colour (hex or `rgba(…)`).
    pub color: Option<String>,
    /// Opacity applied to the flat colour.
    pub opacity: Option<f64>,
    /// Background image URL.
    pub image: Option<String>,
    /// CSS `background-size` for the image (`cover`, `contain`, `repeat`, …).
    pub image_size: Option<String>,
    /// Opacity applied to the image.
    pub image_opacity: Option<f64>,
}

impl SurfaceOverride {
    /// True when no attribute is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Coarse classification of an entry, used for display and type filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A structural chapter break.
    Chapter,
    /// A line produced by the dice bot or the system.
    System,
    /// A character line with a roll attached.
    Dice,
    /// An ordinary character line.
    Normal,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chapter => write!(f, "chapter"),
            Self::System => write!(f, "system"),
            Self::Dice => write!(f, "dice"),
            Self::Normal => write!(f, "normal"),
        }
    }
}

/// One normalized transcript line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the canonical log order.
    pub index: usize,
    /// Stable identifier; `msg-<index>` when the source had none.
    pub id: String,
    /// Speaker name.
    pub name: String,
    /// Message body.
    pub text: String,
    /// Speaker colour written by the authoring tool.
    pub color: Option<String>,
    /// Logical channel. Chapter markers always sit in [`SYSTEM_CHANNEL`].
    pub channel: String,
    /// Avatar URL.
    pub icon: Option<String>,
    /// Plain roll result text.
    pub dice: Option<String>,
    /// Extended roll payload.
    pub extend: Option<RollPayload>,
    /// Whisper target.
    pub to: Option<String>,
    /// Raw timestamp, kept verbatim.
    pub time: Option<String>,
    /// Inline image URL.
    pub message_image: Option<String>,
    /// Structural chapter break.
    pub is_chapter: bool,
    /// Overrides for the name label background.
    pub name_style: SurfaceOverride,
    /// Overrides for the message bubble.
    pub bubble_style: SurfaceOverride,
}

impl LogEntry {
    /// Create a plain entry at `index` with default fields.
    pub fn new(index: usize, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index,
            id: format!("msg-{index}"),
            name: name.into(),
            text: text.into(),
            color: None,
            channel: DEFAULT_CHANNEL.to_string(),
            icon: None,
            dice: None,
            extend: None,
            to: None,
            time: None,
            message_image: None,
            is_chapter: false,
            name_style: SurfaceOverride::default(),
            bubble_style: SurfaceOverride::default(),
        }
    }

    /// Set the channel.
    pub fn in_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Mark as a chapter break; moves the entry into the system channel.
    pub fn as_chapter(mut self) -> Self {
        self.is_chapter = true;
        self.channel = SYSTEM_CHANNEL.to_string();
        self
    }

    /// Attach a plain dice result.
    pub fn with_dice(mut self, dice: impl Into<String>) -> Self {
        self.dice = Some(dice.into());
        self
    }

    /// Whether the speaker is the system.
    pub fn is_system(&self) -> bool {
        self.name.eq_ignore_ascii_case(SYSTEM_SPEAKER)
    }

    /// Whether this line was spoken by a character (not system, not chapter).
    pub fn is_speaker(&self) -> bool {
        !self.is_chapter && !self.is_system()
    }

    /// Whether a roll result is attached.
    pub fn has_roll(&self) -> bool {
        self.dice.is_some() || self.extend.is_some()
    }

    /// Classify the entry for display and type filters.
    pub fn kind(&self) -> EntryKind {
        if self.is_chapter {
            EntryKind::Chapter
        } else if self.is_system() {
            EntryKind::System
        } else if self.has_roll() {
            EntryKind::Dice
        } else {
            EntryKind::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_speaker_is_case_insensitive() {
        assert!(LogEntry::new(0, "System", "").is_system());
        assert!(LogEntry::new(0, "SYSTEM", "").is_system());
        assert!(!LogEntry::new(0, "Systema", "").is_system());
    }

    #[test]
    fn chapter_moves_to_system_channel() {
        let e = LogEntry::new(3, "GM", "=== Act I ===").in_channel("Main").as_chapter();
        assert_eq!(e.channel, SYSTEM_CHANNEL);
        assert_eq!(e.kind(), EntryKind::Chapter);
        assert!(!e.is_speaker());
    }

    #[test]
    fn entry_kind() {
        assert_eq!(LogEntry::new(0, "system", "x").kind(), EntryKind::System);
        assert_eq!(
            LogEntry::new(0, "Alice", "x").with_dice("1d6=4").kind(),
            EntryKind::Dice
        );
        assert_eq!(LogEntry::new(0, "Alice", "x").kind(), EntryKind::Normal);
    }

    #[test]
    fn payload_from_value() {
        assert_eq!(RollPayload::from_value(Value::Null), None);
        assert_eq!(RollPayload::from_value(json!("")), None);
        assert_eq!(
            RollPayload::from_value(json!("80>成功")),
            Some(RollPayload::Text("80>成功".into()))
        );
        assert_eq!(
            RollPayload::from_value(json!(42)),
            Some(RollPayload::Text("42".into()))
        );
        let obj = json!({"roll": {"result": "成功"}});
        assert_eq!(
            RollPayload::from_value(obj.clone()),
            Some(RollPayload::Structured(obj))
        );
    }

    #[test]
    fn payload_as_text_serializes_objects() {
        let p = RollPayload::Structured(json!({"roll": {"result": "x"}}));
        assert_eq!(p.as_text(), r#"{"roll":{"result":"x"}}"#);
        assert_eq!(RollPayload::Text("abc".into()).as_text(), "abc");
    }
}
