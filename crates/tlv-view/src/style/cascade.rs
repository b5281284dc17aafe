//! The precedence walk shared by every visual surface.
//!
//! Sources are listed highest-precedence first; the first one that supplies
//! a non-empty value wins. Callers build the list per attribute, so two
//! attributes of the same surface may be won by different sources.

use tlv_core::SurfaceOverride;

use super::Background;
use super::color::hex_to_rgba;

/// Whether a value counts as supplied. Empty strings and non-finite numbers
/// do not.
pub trait Supplied {
    /// True when the value should win over lower-precedence sources.
    fn is_supplied(&self) -> bool;
}

impl Supplied for String {
    fn is_supplied(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Supplied for &str {
    fn is_supplied(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Supplied for f64 {
    fn is_supplied(&self) -> bool {
        self.is_finite()
    }
}

impl Supplied for bool {
    fn is_supplied(&self) -> bool {
        true
    }
}

impl<T: Supplied> Supplied for &T {
    fn is_supplied(&self) -> bool {
        (**self).is_supplied()
    }
}

/// First supplied value among `layers`.
pub fn resolve<T: Supplied>(layers: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    layers.into_iter().flatten().find(Supplied::is_supplied)
}

/// First supplied value among `layers`, or `fallback`.
pub fn resolve_or<T: Supplied>(layers: impl IntoIterator<Item = Option<T>>, fallback: T) -> T {
    resolve(layers).unwrap_or(fallback)
}

/// Fixed values used when a surface layer leaves an attribute empty, and
/// the colour drawn when no layer supplies anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDefaults {
    /// Colour of the last-resort background.
    pub color: &'static str,
    /// Opacity for flat colours lacking their own.
    pub opacity: f64,
    /// Opacity for images lacking their own.
    pub image_opacity: f64,
    /// `background-size` for images lacking their own.
    pub image_size: &'static str,
}

/// The background a single layer would draw, if it draws one.
///
/// An image wins over a flat colour at the same level, but only when the
/// layer asks for it and names an image. Opacity never falls through to the
/// next layer: a missing value takes the fixed default.
pub fn layer_background(layer: &SurfaceOverride, defaults: &SurfaceDefaults) -> Option<Background> {
    let image = layer.image.as_ref().filter(|i| i.is_supplied());
    if layer.use_image == Some(true)
        && let Some(url) = image
    {
        return Some(Background::Image {
            url: url.clone(),
            size: resolve_or([layer.image_size.clone()], defaults.image_size.to_string()),
            opacity: resolve_or([layer.image_opacity], defaults.image_opacity),
        });
    }

    layer
        .color
        .as_ref()
        .filter(|c| c.is_supplied())
        .map(|color| {
            let opacity = resolve_or([layer.opacity], defaults.opacity);
            Background::Color(hex_to_rgba(Some(color), opacity))
        })
}

/// Walk `layers` in precedence order and return the first background drawn;
/// otherwise the fallback colour.
pub fn resolve_surface<'a>(
    layers: impl IntoIterator<Item = &'a SurfaceOverride>,
    defaults: &SurfaceDefaults,
) -> Background {
    layers
        .into_iter()
        .find_map(|layer| layer_background(layer, defaults))
        .unwrap_or_else(|| Background::Color(hex_to_rgba(Some(defaults.color), defaults.opacity)))
}
