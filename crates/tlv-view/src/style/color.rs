//! Colour composition: hex colour plus opacity into `rgba(…)`.

use std::fmt;

/// An RGB colour with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f64,
}

impl Rgba {
    /// Opaque-white base used when no colour is given.
    pub const WHITE: (u8, u8, u8) = (255, 255, 255);

    /// Parse `#rgb`, `#rrggbb`, `rgb` or `rrggbb`. Returns `None` for any
    /// other shape or for non-hex digits.
    pub fn from_hex(hex: &str, alpha: f64) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: alpha,
        })
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Compose a colour and an opacity into an `rgba(…)` string.
///
/// Values already in `rgba` form pass through unchanged. A missing, empty,
/// or unparseable colour becomes white at the given opacity.
pub fn hex_to_rgba(color: Option<&str>, opacity: f64) -> String {
    let color = color.map(str::trim).unwrap_or_default();
    if color.starts_with("rgba") {
        return color.to_string();
    }
    let (r, g, b) = Rgba::WHITE;
    Rgba::from_hex(color, opacity)
        .unwrap_or(Rgba { r, g, b, a: opacity })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn expands_shorthand() {
        assert_eq!(hex_to_rgba(Some("#fff"), 0.5), "rgba(255, 255, 255, 0.5)");
        assert_eq!(hex_to_rgba(Some("#3498db"), 0.9), "rgba(52, 152, 219, 0.9)");
        assert_eq!(hex_to_rgba(Some("abc"), 1.0), "rgba(170, 187, 204, 1)");
    }

    #[test]
    fn shorthand_matches_long_form() {
        assert_eq!(hex_to_rgba(Some("#fff"), 0.5), hex_to_rgba(Some("#ffffff"), 0.5));
    }

    #[test]
    fn rgba_passes_through() {
        let c = "rgba(1, 2, 3, 0.4)";
        assert_eq!(hex_to_rgba(Some(c), 0.9), c);
    }

    #[test]
    fn missing_is_white() {
        assert_eq!(hex_to_rgba(None, 0.85), "rgba(255, 255, 255, 0.85)");
        assert_eq!(hex_to_rgba(Some(""), 0.1), "rgba(255, 255, 255, 0.1)");
    }

    #[test]
    fn garbage_is_white() {
        assert_eq!(hex_to_rgba(Some("#zzzzzz"), 1.0), "rgba(255, 255, 255, 1)");
        assert_eq!(hex_to_rgba(Some("#12345"), 1.0), "rgba(255, 255, 255, 1)");
        assert_eq!(hex_to_rgba(Some("red"), 1.0), "rgba(255, 255, 255, 1)");
    }

    proptest! {
        #[test]
        fn shorthand_equivalence(r in 0u8..16, g in 0u8..16, b in 0u8..16, a in 0.0f64..=1.0) {
            let short = format!("#{r:x}{g:x}{b:x}");
            let long = format!("#{r:x}{r:x}{g:x}{g:x}{b:x}{b:x}");
            prop_assert_eq!(hex_to_rgba(Some(&short), a), hex_to_rgba(Some(&long), a));
        }
    }
}
