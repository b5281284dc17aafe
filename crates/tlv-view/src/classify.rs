//! Roll result classification.
//!
//! Result text comes from the dice bot in free form, e.g.
//! `1D100=97/60 97>失败` or `D100=3/50: 3＞极限成功`. Classification looks for
//! a small set of phrases and two numeric thresholds.
//!
//! Thresholds are matched with all whitespace removed, so digits separated
//! only by spaces run together: `D100=3/50 3>极限成功` reads as `503`.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tlv_core::{LogEntry, RollPayload};

/// Critical failure phrase.
pub const CRITICAL_FAILURE: &str = "大失败";
/// Critical success phrase.
pub const CRITICAL_SUCCESS: &str = "大成功";
/// Limit success phrase; critical when the roll is at most [`LIMIT_CRITICAL_MAX`].
pub const LIMIT_SUCCESS: &str = "极限成功";
/// Plain success phrase.
pub const SUCCESS: &str = "成功";
/// Plain failure phrase.
pub const FAILURE: &str = "失败";

/// Failure rolls at or above this value are critical.
pub const FAILURE_CRITICAL_MIN: u64 = 96;
/// Limit-success rolls at or below this value are critical.
pub const LIMIT_CRITICAL_MAX: u64 = 5;

/// Alternate glyphs mapped to the forms the phrases use.
const GLYPHS: &[(&str, &str)] = &[("極限", "极限"), ("失敗", "失败"), ("成功", "成功")];

static FAILURE_THRESHOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)[＞>]失败").unwrap());

static LIMIT_THRESHOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)[＞>]极限成功").unwrap());

static FAILURE_DISPLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)(\s*[＞>]\s*)失败").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Outcome category of a roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultCategory {
    /// No recognizable outcome.
    #[default]
    Normal,
    /// Plain success.
    Success,
    /// Plain failure.
    Failure,
    /// Critical success.
    CriticalSuccess,
    /// Critical failure.
    CriticalFailure,
}

impl ResultCategory {
    /// Key used in `extendFormats` and CSS class names.
    pub fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::CriticalSuccess => "criticalSuccess",
            Self::CriticalFailure => "criticalFailure",
        }
    }

    /// Whether this is one of the critical categories.
    pub fn is_critical(self) -> bool {
        matches!(self, Self::CriticalSuccess | Self::CriticalFailure)
    }
}

impl fmt::Display for ResultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
            Self::CriticalSuccess => write!(f, "Critical Success"),
            Self::CriticalFailure => write!(f, "Critical Failure"),
        }
    }
}

/// A classified roll: the extracted text, its category, and the text to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    /// Result text as extracted from the entry.
    pub raw: String,
    /// Category of the result.
    pub category: ResultCategory,
    /// Text for display; critical results are spelled out.
    pub display: String,
}

/// `roll.result` of a structured payload, if it is a non-empty string.
fn nested_result(value: &Value) -> Option<&str> {
    value
        .get("roll")?
        .get("result")?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// Extract the roll result text from an entry.
///
/// A string `extend` is tried as JSON first and its `roll.result` used if
/// present; an object `extend` yields its `roll.result` or its serialized
/// form. Without `extend`, the plain `dice` field is used.
pub fn roll_text(entry: &LogEntry) -> String {
    match &entry.extend {
        Some(RollPayload::Text(s)) => serde_json::from_str::<Value>(s)
            .ok()
            .and_then(|v| nested_result(&v).map(str::to_string))
            .unwrap_or_else(|| s.clone()),
        Some(RollPayload::Structured(v)) => nested_result(v)
            .map(str::to_string)
            .unwrap_or_else(|| v.to_string()),
        None => entry.dice.clone().unwrap_or_default(),
    }
}

/// Map alternate glyphs to the ones the phrases are written in.
pub fn normalize_glyphs(text: &str) -> String {
    GLYPHS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Saturating parse of a digit run.
fn roll_value(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

/// Classify result text. Critical checks always win over suffix checks.
pub fn classify_text(text: &str) -> ResultCategory {
    if text.is_empty() {
        return ResultCategory::Normal;
    }
    let text = normalize_glyphs(text);
    let compact = WHITESPACE_RE.replace_all(&text, "");

    if text.contains(CRITICAL_FAILURE) {
        return ResultCategory::CriticalFailure;
    }
    if text.contains(CRITICAL_SUCCESS) {
        return ResultCategory::CriticalSuccess;
    }
    if let Some(caps) = FAILURE_THRESHOLD_RE.captures(&compact)
        && roll_value(&caps[1]) >= FAILURE_CRITICAL_MIN
    {
        return ResultCategory::CriticalFailure;
    }
    if let Some(caps) = LIMIT_THRESHOLD_RE.captures(&compact)
        && roll_value(&caps[1]) <= LIMIT_CRITICAL_MAX
    {
        return ResultCategory::CriticalSuccess;
    }

    let trimmed = text.trim();
    if trimmed.ends_with(SUCCESS) {
        ResultCategory::Success
    } else if trimmed.ends_with(FAILURE) {
        ResultCategory::Failure
    } else {
        ResultCategory::Normal
    }
}

/// Rewrite result text for display. Only critical categories change: a limit
/// success becomes a critical success, and a failure at or above the
/// critical threshold becomes a critical failure. Never used for
/// classification.
pub fn display_text(text: &str, category: ResultCategory) -> String {
    match category {
        ResultCategory::CriticalSuccess => normalize_glyphs(text).replace(LIMIT_SUCCESS, CRITICAL_SUCCESS),
        ResultCategory::CriticalFailure => FAILURE_DISPLAY_RE
            .replace_all(&normalize_glyphs(text), |caps: &Captures| {
                if roll_value(&caps[1]) >= FAILURE_CRITICAL_MIN {
                    format!("{}{}{CRITICAL_FAILURE}", &caps[1], &caps[2])
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned(),
        _ => text.to_string(),
    }
}

/// Classify an entry's roll result.
///
/// System lines carrying neither dice nor extend are dice-bot announcements
/// whose result sits in the text itself; their text is classified instead.
pub fn classify(entry: &LogEntry) -> ResultCategory {
    if entry.is_system() && !entry.has_roll() {
        return classify_text(&entry.text);
    }
    classify_text(&roll_text(entry))
}

/// Extract, classify, and rewrite an entry's roll result. `None` when the
/// entry carries no result text.
pub fn roll_outcome(entry: &LogEntry) -> Option<RollOutcome> {
    let raw = roll_text(entry);
    if raw.is_empty() {
        return None;
    }
    let category = classify_text(&raw);
    let display = display_text(&raw, category);
    Some(RollOutcome {
        raw,
        category,
        display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn entry_with_extend(extend: RollPayload) -> LogEntry {
        let mut e = LogEntry::new(0, "KP", "");
        e.extend = Some(extend);
        e
    }

    #[test]
    fn failure_threshold_boundary() {
        assert_eq!(classify_text("95>失败"), ResultCategory::Failure);
        assert_eq!(classify_text("96>失败"), ResultCategory::CriticalFailure);
        assert_eq!(classify_text("100＞失败"), ResultCategory::CriticalFailure);
    }

    #[test]
    fn limit_success_threshold_boundary() {
        assert_eq!(classify_text("5>极限成功"), ResultCategory::CriticalSuccess);
        assert_eq!(classify_text("6>极限成功"), ResultCategory::Success);
        assert_eq!(classify_text("1＞极限成功"), ResultCategory::CriticalSuccess);
    }

    #[test]
    fn whitespace_is_ignored_for_thresholds() {
        assert_eq!(classify_text("D100=98/50  98 > 失败"), ResultCategory::CriticalFailure);
        assert_eq!(classify_text("3 ＞ 极限成功"), ResultCategory::CriticalSuccess);
    }

    #[test]
    fn phrases_anywhere_beat_suffixes() {
        assert_eq!(classify_text("大失败！但是最后成功"), ResultCategory::CriticalFailure);
        assert_eq!(classify_text("大成功 then 失败"), ResultCategory::CriticalSuccess);
    }

    #[test]
    fn traditional_glyphs() {
        assert_eq!(classify_text("97>失敗"), ResultCategory::CriticalFailure);
        assert_eq!(classify_text("2>極限成功"), ResultCategory::CriticalSuccess);
        assert_eq!(classify_text("大失敗"), ResultCategory::CriticalFailure);
        assert_eq!(classify_text("40/50 困難失敗"), ResultCategory::Failure);
    }

    #[test]
    fn suffix_rules_use_trimmed_text() {
        assert_eq!(classify_text("roll: 80>成功  "), ResultCategory::Success);
        assert_eq!(classify_text("roll: 80>失败\n"), ResultCategory::Failure);
        assert_eq!(classify_text("成功 is not at the end"), ResultCategory::Normal);
        assert_eq!(classify_text(""), ResultCategory::Normal);
        assert_eq!(classify_text("1d6=4"), ResultCategory::Normal);
    }

    #[test]
    fn extraction_from_json_string() {
        let e = entry_with_extend(RollPayload::Text(
            r#"{"roll":{"result":"D100=97 97>失败"}}"#.into(),
        ));
        assert_eq!(roll_text(&e), "D100=97 97>失败");
        assert_eq!(classify(&e), ResultCategory::CriticalFailure);
    }

    #[test]
    fn extraction_from_plain_string() {
        let e = entry_with_extend(RollPayload::Text("12>成功".into()));
        assert_eq!(roll_text(&e), "12>成功");
        let e = entry_with_extend(RollPayload::Text("{not json".into()));
        assert_eq!(roll_text(&e), "{not json");
    }

    #[test]
    fn extraction_from_object() {
        let e = entry_with_extend(RollPayload::Structured(json!({"roll": {"result": "成功"}})));
        assert_eq!(roll_text(&e), "成功");
        let e = entry_with_extend(RollPayload::Structured(json!({"other": 1})));
        assert_eq!(roll_text(&e), r#"{"other":1}"#);
    }

    #[test]
    fn extraction_falls_back_to_dice() {
        let e = LogEntry::new(0, "A", "").with_dice("3>极限成功");
        assert_eq!(roll_text(&e), "3>极限成功");
        assert_eq!(classify(&e), ResultCategory::CriticalSuccess);
        assert_eq!(roll_text(&LogEntry::new(0, "A", "")), "");
        assert!(roll_outcome(&LogEntry::new(0, "A", "")).is_none());
    }

    #[test]
    fn bare_system_line_classifies_its_text() {
        let e = LogEntry::new(0, "System", "roll: 80>成功");
        assert_eq!(classify(&e), ResultCategory::Success);
        // a speaker's text is never a roll result
        let e = LogEntry::new(0, "Alice", "roll: 80>成功");
        assert_eq!(classify(&e), ResultCategory::Normal);
        // an attached roll still wins over the text
        let e = LogEntry::new(0, "System", "roll: 80>成功").with_dice("99>失败");
        assert_eq!(classify(&e), ResultCategory::CriticalFailure);
    }

    #[test]
    fn extend_wins_over_dice() {
        let mut e = LogEntry::new(0, "A", "").with_dice("99>失败");
        e.extend = Some(RollPayload::Text("10>成功".into()));
        assert_eq!(classify(&e), ResultCategory::Success);
    }

    #[test]
    fn display_rewrites_critical_success() {
        let text = "D100=3/50: 3>极限成功";
        let cat = classify_text(text);
        assert_eq!(cat, ResultCategory::CriticalSuccess);
        assert_eq!(display_text(text, cat), "D100=3/50: 3>大成功");
    }

    #[test]
    fn space_separated_digits_run_together() {
        // "3/50 3" compacts to "3/503"
        let text = "D100=3/50 3>极限成功";
        assert_eq!(classify_text(text), ResultCategory::Success);
        assert_eq!(display_text(text, ResultCategory::Success), text);

        // "40/50 40" compacts to "40/5040"
        assert_eq!(classify_text("D100=40/50 40>失败"), ResultCategory::CriticalFailure);
        assert_eq!(classify_text("D100=40/50, 40>失败"), ResultCategory::Failure);
    }

    #[test]
    fn display_rewrites_critical_failure_only_above_threshold() {
        let text = "D100=98/50 98 > 失败";
        assert_eq!(
            display_text(text, ResultCategory::CriticalFailure),
            "D100=98/50 98 > 大失败"
        );
        assert_eq!(
            display_text("40>失败", ResultCategory::CriticalFailure),
            "40>失败"
        );
    }

    #[test]
    fn display_leaves_other_categories_alone() {
        assert_eq!(display_text("6>极限成功", ResultCategory::Success), "6>极限成功");
        assert_eq!(display_text("95>失败", ResultCategory::Failure), "95>失败");
    }

    #[test]
    fn outcome_bundles_everything() {
        let e = LogEntry::new(0, "A", "").with_dice("97>失败");
        let outcome = roll_outcome(&e).unwrap();
        assert_eq!(outcome.raw, "97>失败");
        assert_eq!(outcome.category, ResultCategory::CriticalFailure);
        assert_eq!(outcome.display, "97>大失败");
    }

    #[test]
    fn category_keys_and_display() {
        assert_eq!(ResultCategory::CriticalSuccess.key(), "criticalSuccess");
        assert_eq!(ResultCategory::Failure.to_string(), "Failure");
        assert!(ResultCategory::CriticalFailure.is_critical());
        assert!(!ResultCategory::Success.is_critical());
    }

    proptest! {
        #[test]
        fn entry_classifies_as_its_extracted_text(
            n in 0u32..200,
            phrase in prop::sample::select(vec![
                "失败", "成功", "极限成功", "困难成功", "大成功", "大失败", "失敗", "極限成功",
            ]),
            sep in prop::sample::select(vec![">", "＞", " > "]),
            shape in 0u8..4,
            system in any::<bool>(),
        ) {
            let result = format!("D100={n}/50: {n}{sep}{phrase}");
            let name = if system { "System" } else { "KP" };
            let mut entry = LogEntry::new(0, name, "rolls");
            match shape {
                0 => entry.dice = Some(result.clone()),
                1 => entry.extend = Some(RollPayload::Text(result.clone())),
                2 => {
                    let wrapped = json!({"roll": {"result": result.as_str()}}).to_string();
                    entry.extend = Some(RollPayload::Text(wrapped));
                }
                _ => {
                    let object = json!({"roll": {"result": result.as_str()}});
                    entry.extend = Some(RollPayload::Structured(object));
                }
            }

            prop_assert_eq!(roll_text(&entry), result.as_str());
            prop_assert_eq!(classify(&entry), classify_text(&roll_text(&entry)));
        }

        #[test]
        fn failure_threshold(n in 0u64..1000) {
            let got = classify_text(&format!("{n}>失败"));
            if n >= 96 {
                prop_assert_eq!(got, ResultCategory::CriticalFailure);
            } else {
                prop_assert_eq!(got, ResultCategory::Failure);
            }
        }
    }
}
