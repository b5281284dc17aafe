//! Per-surface style resolution against a document's rules.
//!
//! Each surface walks its own source list, highest precedence first:
//! message override, entity rule, document default rule, fixed fallback.

use tlv_core::rules::{ChannelRule, CharacterRule, ExtendFormat};
use tlv_core::{Document, LogEntry, SurfaceOverride};

use super::cascade::{SurfaceDefaults, layer_background, resolve, resolve_or, resolve_surface};
use super::color::hex_to_rgba;
use super::{Background, Style};
use crate::classify::ResultCategory;

/// Name colour when nothing else supplies one.
pub const NAME_COLOR_FALLBACK: &str = "#e6e6e6";

/// The authoring tool writes this when no speaker colour was chosen.
pub const UNSET_SPEAKER_COLOR: &str = "#000000";

/// Chapter banner background when chapter settings supply none.
pub const CHAPTER_GRADIENT: &str = "linear-gradient(135deg, #3498db, #2c3e50)";

/// Chapter banner text colour when chapter settings supply none.
pub const CHAPTER_TEXT_FALLBACK: &str = "#ffffff";

/// System line colour when system settings supply none.
pub const SYSTEM_TEXT_FALLBACK: &str = "#7f8c8d";

const MASK_COLOR_FALLBACK: &str = "#cccccc";
const MASK_OPACITY_FALLBACK: f64 = 0.3;

/// Name label backgrounds.
pub const NAME_SURFACE: SurfaceDefaults = SurfaceDefaults {
    color: "#ffffff",
    opacity: 0.85,
    image_opacity: 1.0,
    image_size: "cover",
};

/// Message bubbles.
pub const BUBBLE_SURFACE: SurfaceDefaults = SurfaceDefaults {
    color: "#ffffff",
    opacity: 0.85,
    image_opacity: 1.0,
    image_size: "cover",
};

/// Channel group backgrounds.
pub const CHANNEL_SURFACE: SurfaceDefaults = SurfaceDefaults {
    color: "#2c3e50",
    opacity: 0.1,
    image_opacity: 1.0,
    image_size: "cover",
};

/// Chapter banners.
pub const CHAPTER_SURFACE: SurfaceDefaults = SurfaceDefaults {
    color: "#3498db",
    opacity: 0.9,
    image_opacity: 1.0,
    image_size: "cover",
};

/// Fixed accent for a result category: (tinted background, border colour).
pub fn category_accent(category: ResultCategory) -> (&'static str, &'static str) {
    match category {
        ResultCategory::CriticalSuccess => ("rgba(243, 156, 18, 0.1)", "#f39c12"),
        ResultCategory::CriticalFailure => ("rgba(192, 57, 43, 0.1)", "#c0392b"),
        ResultCategory::Success => ("rgba(39, 174, 96, 0.1)", "#27ae60"),
        ResultCategory::Failure => ("rgba(231, 76, 60, 0.1)", "#e74c3c"),
        ResultCategory::Normal => ("rgba(0, 0, 0, 0.2)", "#8b0000"),
    }
}

/// Resolves styles for every visual surface of a document.
pub struct StyleResolver<'d> {
    doc: &'d Document,
}

impl<'d> StyleResolver<'d> {
    /// Create a resolver over a document's rules.
    pub fn new(doc: &'d Document) -> Self {
        Self { doc }
    }

    /// The character rule for a speaker, if any.
    pub fn character_rule(&self, name: &str) -> Option<&'d CharacterRule> {
        self.doc.character_rules.get(name)
    }

    /// The channel rule for a channel, if any.
    pub fn channel_rule(&self, channel: &str) -> Option<&'d ChannelRule> {
        self.doc.channel_rules.get(channel)
    }

    fn default_character(&self) -> Option<&'d CharacterRule> {
        self.doc.default_character_rule.as_ref()
    }

    fn default_channel(&self) -> Option<&'d ChannelRule> {
        self.doc.default_channel_rule.as_ref()
    }

    /// Speaker name colour: character rule, then the entry's own colour,
    /// then the default rule, then a fixed light grey.
    pub fn name_color(&self, entry: &LogEntry) -> String {
        let own = entry
            .color
            .as_deref()
            .filter(|c| !c.eq_ignore_ascii_case(UNSET_SPEAKER_COLOR));
        resolve_or(
            [
                self.character_rule(&entry.name).and_then(|r| r.name_color.as_deref()),
                own,
                self.default_character().and_then(|r| r.name_color.as_deref()),
            ],
            NAME_COLOR_FALLBACK,
        )
        .to_string()
    }

    /// Name label background.
    pub fn name_background(&self, entry: &LogEntry) -> Background {
        let rule = self.character_rule(&entry.name).map(CharacterRule::name_surface);
        let default = self.default_character().map(CharacterRule::name_surface);
        resolve_surface(
            [Some(&entry.name_style), rule.as_ref(), default.as_ref()]
                .into_iter()
                .flatten(),
            &NAME_SURFACE,
        )
    }

    /// Full name label style.
    pub fn name_label(&self, entry: &LogEntry) -> Style {
        let fonts = &self.doc.font_settings;
        Style {
            color: Some(self.name_color(entry)),
            background: Some(self.name_background(entry)),
            font_family: resolve([fonts.character_name.clone()]),
            font_size: resolve([fonts.character_name_size]),
            bold: true,
            ..Default::default()
        }
    }

    /// Message bubble background.
    pub fn bubble(&self, entry: &LogEntry) -> Style {
        let rule = self.character_rule(&entry.name).map(CharacterRule::bubble_surface);
        let default = self.default_character().map(CharacterRule::bubble_surface);
        let background = resolve_surface(
            [Some(&entry.bubble_style), rule.as_ref(), default.as_ref()]
                .into_iter()
                .flatten(),
            &BUBBLE_SURFACE,
        );
        Style {
            background: Some(background),
            ..Default::default()
        }
    }

    /// Dialogue text inside a bubble.
    pub fn dialog_text(&self) -> Style {
        let fonts = &self.doc.font_settings;
        Style {
            color: resolve([fonts.dialog_text_color.clone()]),
            font_family: resolve([fonts.dialog_text.clone()]),
            font_size: resolve([fonts.dialog_text_size]),
            ..Default::default()
        }
    }

    /// Channel group background, with the mask overlay if enabled.
    pub fn channel_background(&self, channel: &str) -> Style {
        let rule = self.channel_rule(channel);
        let default = self.default_channel();
        let layers: Vec<SurfaceOverride> = [rule, default]
            .into_iter()
            .flatten()
            .map(ChannelRule::background)
            .collect();
        let background = resolve_surface(&layers, &CHANNEL_SURFACE);

        // the first rule that says anything about the mask decides it
        let overlay = [rule, default]
            .into_iter()
            .flatten()
            .find(|r| r.use_mask.is_some())
            .filter(|r| r.use_mask == Some(true))
            .map(|r| {
                hex_to_rgba(
                    Some(resolve_or([r.mask_color.as_deref()], MASK_COLOR_FALLBACK)),
                    resolve_or([r.mask_opacity], MASK_OPACITY_FALLBACK),
                )
            });

        Style {
            background: Some(background),
            overlay,
            ..Default::default()
        }
    }

    /// Channel header label.
    pub fn channel_header(&self) -> Style {
        let fonts = &self.doc.font_settings;
        Style {
            color: resolve([fonts.channel_name_color.clone()]),
            font_family: resolve([fonts.channel_name.clone()]),
            font_size: resolve([fonts.channel_name_size]),
            ..Default::default()
        }
    }

    /// Chapter banner.
    pub fn chapter_banner(&self) -> Style {
        let settings = &self.doc.chapter_settings;
        let background = layer_background(&settings.background(), &CHAPTER_SURFACE)
            .unwrap_or_else(|| Background::Gradient(CHAPTER_GRADIENT.to_string()));
        Style {
            color: Some(resolve_or([settings.color.clone()], CHAPTER_TEXT_FALLBACK.to_string())),
            background: Some(background),
            font_family: resolve([settings.font_family.clone()]),
            font_size: resolve([settings.font_size]),
            bold: resolve_or([settings.bold], true),
            shadow: resolve_or([settings.shadow], false),
            ..Default::default()
        }
    }

    /// System line text.
    pub fn system_text(&self) -> Style {
        let settings = &self.doc.system_settings;
        Style {
            color: Some(resolve_or([settings.color.clone()], SYSTEM_TEXT_FALLBACK.to_string())),
            font_family: resolve([settings.font_family.clone()]),
            font_size: resolve([settings.font_size]),
            bold: resolve_or([settings.bold], false),
            italic: resolve_or([settings.italic], false),
            underline: resolve_or([settings.underline], false),
            ..Default::default()
        }
    }

    /// Prefix shown before system lines, if configured.
    pub fn system_prefix(&self) -> Option<&'d str> {
        self.doc
            .system_settings
            .prefix
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    /// The configured format for a result category.
    pub fn extend_format(&self, category: ResultCategory) -> Option<&'d ExtendFormat> {
        let formats = &self.doc.extend_formats;
        match category {
            ResultCategory::Success => formats.success.as_ref(),
            ResultCategory::Failure => formats.failure.as_ref(),
            ResultCategory::CriticalSuccess => formats.critical_success.as_ref(),
            ResultCategory::CriticalFailure => formats.critical_failure.as_ref(),
            ResultCategory::Normal => None,
        }
    }

    /// Roll result line for a category: fixed accent, then the category's
    /// format over the general roll font settings.
    pub fn dice_line(&self, category: ResultCategory) -> Style {
        let fonts = &self.doc.font_settings;
        let format = self.extend_format(category);
        let (tint, border) = category_accent(category);

        // the generic roll colour only applies to unclassified results
        let generic_color = if category == ResultCategory::Normal {
            fonts.extend_text_color.clone()
        } else {
            None
        };

        Style {
            color: resolve([format.and_then(|f| f.color.clone()), generic_color]),
            background: Some(Background::Color(tint.to_string())),
            font_family: resolve([
                format.and_then(|f| f.font_family.clone()),
                fonts.extend_text.clone(),
            ]),
            font_size: resolve([format.and_then(|f| f.font_size), fonts.extend_text_size]),
            bold: resolve_or([format.and_then(|f| f.bold)], false),
            accent: Some(border.to_string()),
            ..Default::default()
        }
    }
}
