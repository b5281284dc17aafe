//! Style resolution: turning document rules into concrete style descriptors.

pub mod cascade;
pub mod color;
pub mod resolver;

pub use cascade::{Supplied, SurfaceDefaults, resolve, resolve_or, resolve_surface};
pub use color::{Rgba, hex_to_rgba};
pub use resolver::StyleResolver;

/// Text shadow applied to chapter banners with `shadow` enabled.
pub const TEXT_SHADOW: &str = "1px 1px 2px rgba(0,0,0,0.3)";

/// What is painted behind a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// A flat colour, already composed into `rgba(…)`.
    Color(String),
    /// A CSS gradient.
    Gradient(String),
    /// A background image.
    Image {
        /// Image URL.
        url: String,
        /// CSS `background-size`; `repeat` tiles the image.
        size: String,
        /// Opacity of the surface carrying the image.
        opacity: f64,
    },
}

impl Background {
    fn push_css(&self, out: &mut Vec<String>) {
        match self {
            Self::Color(c) => out.push(format!("background-color: {c}")),
            Self::Gradient(g) => out.push(format!("background: {g}")),
            Self::Image { url, size, opacity } => {
                out.push(format!("background-image: url({url})"));
                out.push(format!("background-size: {size}"));
                out.push("background-position: center".to_string());
                let repeat = if size == "repeat" { "repeat" } else { "no-repeat" };
                out.push(format!("background-repeat: {repeat}"));
                out.push(format!("opacity: {opacity}"));
            }
        }
    }
}

/// A concrete style for one surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    /// Text colour.
    pub color: Option<String>,
    /// Background.
    pub background: Option<Background>,
    /// Tint drawn over the background.
    pub overlay: Option<String>,
    /// Font family.
    pub font_family: Option<String>,
    /// Font size in pixels.
    pub font_size: Option<f64>,
    /// Bold text.
    pub bold: bool,
    /// Italic text.
    pub italic: bool,
    /// Underlined text.
    pub underline: bool,
    /// Text shadow.
    pub shadow: bool,
    /// Left border colour.
    pub accent: Option<String>,
}

impl Style {
    /// Serialize as an inline CSS declaration list.
    pub fn to_css(&self) -> String {
        let mut out = Vec::new();
        if let Some(color) = &self.color {
            out.push(format!("color: {color}"));
        }
        if let Some(background) = &self.background {
            background.push_css(&mut out);
        }
        if let Some(overlay) = &self.overlay {
            out.push(format!("box-shadow: inset 0 0 0 100vmax {overlay}"));
        }
        if let Some(family) = &self.font_family {
            out.push(format!("font-family: {family}"));
        }
        if let Some(size) = self.font_size {
            out.push(format!("font-size: {size}px"));
        }
        if self.bold {
            out.push("font-weight: bold".to_string());
        }
        if self.italic {
            out.push("font-style: italic".to_string());
        }
        if self.underline {
            out.push("text-decoration: underline".to_string());
        }
        if self.shadow {
            out.push(format!("text-shadow: {TEXT_SHADOW}"));
        }
        if let Some(accent) = &self.accent {
            out.push(format!("border-left: 3px solid {accent}"));
        }
        out.join("; ")
    }
}
