//! Style rule and settings types exported by the authoring tool.
//!
//! Every attribute is optional. The `builtin()` constructors return the
//! values the authoring tool itself ships with; they are what a document
//! gets when it omits a settings block entirely.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::SurfaceOverride;

/// Per-channel visual rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelRule {
    /// Prefer the background image over the flat colour.
    pub use_image: Option<bool>,
    /// Background colour.
    pub color: Option<String>,
    /// Background colour opacity.
    pub opacity: Option<f64>,
    /// Background image URL.
    pub image: Option<String>,
    /// CSS `background-size` for the image.
    pub image_size: Option<String>,
    /// Background image opacity.
    pub image_opacity: Option<f64>,
    /// Draw a tinted mask over the background.
    pub use_mask: Option<bool>,
    /// Mask colour.
    pub mask_color: Option<String>,
    /// Mask opacity.
    pub mask_opacity: Option<f64>,
    /// Start collapsed.
    pub collapsed: Option<bool>,
}

impl ChannelRule {
    /// The authoring tool's default channel rule.
    pub fn builtin() -> Self {
        Self {
            use_image: Some(false),
            color: Some("#2c3e50".into()),
            opacity: Some(0.1),
            image: Some(String::new()),
            image_size: Some("cover".into()),
            image_opacity: Some(1.0),
            use_mask: Some(false),
            mask_color: Some("#cccccc".into()),
            mask_opacity: Some(0.3),
            collapsed: Some(false),
        }
    }

    /// The channel background as a surface.
    pub fn background(&self) -> SurfaceOverride {
        SurfaceOverride {
            use_image: self.use_image,
            color: self.color.clone(),
            opacity: self.opacity,
            image: self.image.clone(),
            image_size: self.image_size.clone(),
            image_opacity: self.image_opacity,
        }
    }
}

/// Per-character visual rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterRule {
    /// Name text colour.
    pub name_color: Option<String>,
    /// Prefer the name background image.
    pub name_use_image: Option<bool>,
    /// Name background colour.
    pub name_background: Option<String>,
    /// Name background opacity.
    pub name_opacity: Option<f64>,
    /// Name background image URL.
    pub name_image: Option<String>,
    /// CSS `background-size` for the name image.
    pub name_image_size: Option<String>,
    /// Name image opacity.
    pub name_image_opacity: Option<f64>,
    /// Prefer the bubble background image.
    pub bubble_use_image: Option<bool>,
    /// Bubble background colour.
    pub bubble_color: Option<String>,
    /// Bubble background opacity.
    pub bubble_opacity: Option<f64>,
    /// Bubble background image URL.
    pub bubble_image: Option<String>,
    /// CSS `background-size` for the bubble image.
    pub bubble_image_size: Option<String>,
    /// Bubble image opacity.
    pub bubble_image_opacity: Option<f64>,
}

impl CharacterRule {
    /// The authoring tool's default character rule.
    pub fn builtin() -> Self {
        Self {
            name_color: Some("#000000".into()),
            name_use_image: Some(false),
            name_background: Some("#ffffff".into()),
            name_opacity: Some(0.85),
            name_image: Some(String::new()),
            name_image_size: Some("cover".into()),
            name_image_opacity: Some(1.0),
            bubble_use_image: Some(false),
            bubble_color: Some("#ffffff".into()),
            bubble_opacity: Some(0.85),
            bubble_image: Some(String::new()),
            bubble_image_size: Some("cover".into()),
            bubble_image_opacity: Some(1.0),
        }
    }

    /// The name label background as a surface.
    pub fn name_surface(&self) -> SurfaceOverride {
        SurfaceOverride {
            use_image: self.name_use_image,
            color: self.name_background.clone(),
            opacity: self.name_opacity,
            image: self.name_image.clone(),
            image_size: self.name_image_size.clone(),
            image_opacity: self.name_image_opacity,
        }
    }

    /// The message bubble as a surface.
    pub fn bubble_surface(&self) -> SurfaceOverride {
        SurfaceOverride {
            use_image: self.bubble_use_image,
            color: self.bubble_color.clone(),
            opacity: self.bubble_opacity,
            image: self.bubble_image.clone(),
            image_size: self.bubble_image_size.clone(),
            image_opacity: self.bubble_image_opacity,
        }
    }
}

/// Font choices for the recurring text roles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSettings {
    /// Channel header font family.
    pub channel_name: Option<String>,
    /// Channel header colour.
    pub channel_name_color: Option<String>,
    /// Channel header size in pixels.
    pub channel_name_size: Option<f64>,
    /// Character name font family.
    pub character_name: Option<String>,
    /// Character name colour.
    pub character_name_color: Option<String>,
    /// Character name size in pixels.
    pub character_name_size: Option<f64>,
    /// Dialogue font family.
    pub dialog_text: Option<String>,
    /// Dialogue colour.
    pub dialog_text_color: Option<String>,
    /// Dialogue size in pixels.
    pub dialog_text_size: Option<f64>,
    /// Roll result font family.
    pub extend_text: Option<String>,
    /// Roll result colour.
    pub extend_text_color: Option<String>,
    /// Roll result size in pixels.
    pub extend_text_size: Option<f64>,
}

impl FontSettings {
    /// The authoring tool's default font settings.
    pub fn builtin() -> Self {
        Self {
            channel_name: Some(String::new()),
            channel_name_color: Some("#2c3e50".into()),
            channel_name_size: Some(14.0),
            character_name: Some(String::new()),
            character_name_color: Some("#000000".into()),
            character_name_size: Some(13.0),
            dialog_text: Some(String::new()),
            dialog_text_color: Some("#000000".into()),
            dialog_text_size: Some(14.0),
            extend_text: Some("Consolas, Monaco, monospace".into()),
            extend_text_color: Some("#000000".into()),
            extend_text_size: Some(13.0),
        }
    }
}

/// How system lines are typeset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSettings {
    /// Font family.
    pub font_family: Option<String>,
    /// Text colour.
    pub color: Option<String>,
    /// Size in pixels.
    pub font_size: Option<f64>,
    /// Italic text.
    pub italic: Option<bool>,
    /// Bold text.
    pub bold: Option<bool>,
    /// Underlined text.
    pub underline: Option<bool>,
    /// Prefix printed before the line.
    pub prefix: Option<String>,
}

impl SystemSettings {
    /// The authoring tool's default system settings.
    pub fn builtin() -> Self {
        Self {
            font_family: Some("Consolas, Monaco, monospace".into()),
            color: Some("#7f8c8d".into()),
            font_size: Some(12.0),
            italic: Some(false),
            bold: Some(false),
            underline: Some(false),
            prefix: Some("system:".into()),
        }
    }
}

/// How chapter banners are drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChapterSettings {
    /// Font family.
    pub font_family: Option<String>,
    /// Text colour.
    pub color: Option<String>,
    /// Size in pixels.
    pub font_size: Option<f64>,
    /// Prefer the background image.
    pub use_image: Option<bool>,
    /// Background image URL.
    pub image: Option<String>,
    /// CSS `background-size` for the image.
    pub image_size: Option<String>,
    /// Background image opacity.
    pub image_opacity: Option<f64>,
    /// Background colour.
    pub background_color: Option<String>,
    /// Background colour opacity.
    pub background_opacity: Option<f64>,
    /// Bold text.
    pub bold: Option<bool>,
    /// Drop shadow under the text.
    pub shadow: Option<bool>,
}

impl ChapterSettings {
    /// The authoring tool's default chapter settings.
    pub fn builtin() -> Self {
        Self {
            font_family: Some("Microsoft YaHei, 微软雅黑".into()),
            color: Some("#ffffff".into()),
            font_size: Some(20.0),
            use_image: Some(false),
            image: Some(String::new()),
            image_size: Some("cover".into()),
            image_opacity: Some(1.0),
            background_color: Some("#3498db".into()),
            background_opacity: Some(0.9),
            bold: Some(true),
            shadow: Some(true),
        }
    }

    /// The banner background as a surface.
    pub fn background(&self) -> SurfaceOverride {
        SurfaceOverride {
            use_image: self.use_image,
            color: self.background_color.clone(),
            opacity: self.background_opacity,
            image: self.image.clone(),
            image_size: self.image_size.clone(),
            image_opacity: self.image_opacity,
        }
    }
}

/// Document-wide channel display options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalChannelSettings {
    /// Collapse off-topic channels unless told otherwise.
    pub auto_collapse_other: Option<bool>,
    /// Explicit collapsed state per channel.
    pub collapsed_channels: BTreeMap<String, bool>,
    /// Show collapse toggles on channel headers.
    pub show_collapse_buttons: Option<bool>,
}

/// Typesetting for one roll result category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtendFormat {
    /// Text colour.
    pub color: Option<String>,
    /// Font family.
    pub font_family: Option<String>,
    /// Size in pixels.
    pub font_size: Option<f64>,
    /// Bold text.
    pub bold: Option<bool>,
    /// Decorative image URL.
    pub image: Option<String>,
    /// Decorative image opacity.
    pub image_opacity: Option<f64>,
}

/// Typesetting for each roll result category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtendFormats {
    /// Plain success.
    pub success: Option<ExtendFormat>,
    /// Plain failure.
    pub failure: Option<ExtendFormat>,
    /// Critical success.
    pub critical_success: Option<ExtendFormat>,
    /// Critical failure.
    pub critical_failure: Option<ExtendFormat>,
}

impl ExtendFormats {
    /// The authoring tool's default formats.
    pub fn builtin() -> Self {
        let format = |color: &str, size: f64| ExtendFormat {
            color: Some(color.into()),
            font_family: Some(String::new()),
            font_size: Some(size),
            bold: Some(true),
            image: None,
            image_opacity: None,
        };
        Self {
            success: Some(format("#27ae60", 13.0)),
            failure: Some(format("#e74c3c", 13.0)),
            critical_success: Some(ExtendFormat {
                image: Some(String::new()),
                image_opacity: Some(1.0),
                ..format("#f39c12", 14.0)
            }),
            critical_failure: Some(ExtendFormat {
                image: Some(String::new()),
                image_opacity: Some(1.0),
                ..format("#c0392b", 14.0)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn character_rule_reads_camel_case() {
        let rule: CharacterRule = serde_json::from_value(json!({
            "nameColor": "#ff0000",
            "bubbleUseImage": true,
            "bubbleImage": "bg.png",
        }))
        .unwrap();
        assert_eq!(rule.name_color.as_deref(), Some("#ff0000"));
        assert_eq!(rule.bubble_use_image, Some(true));
        assert!(rule.bubble_color.is_none());

        let bubble = rule.bubble_surface();
        assert_eq!(bubble.image.as_deref(), Some("bg.png"));
        assert!(bubble.opacity.is_none());
    }

    #[test]
    fn global_settings_default_to_empty() {
        let g: GlobalChannelSettings = serde_json::from_value(json!({})).unwrap();
        assert!(g.collapsed_channels.is_empty());
        assert!(g.auto_collapse_other.is_none());
    }

    #[test]
    fn builtin_formats_cover_every_category() {
        let f = ExtendFormats::builtin();
        assert_eq!(f.success.unwrap().color.as_deref(), Some("#27ae60"));
        assert_eq!(f.critical_failure.unwrap().font_size, Some(14.0));
    }
}
