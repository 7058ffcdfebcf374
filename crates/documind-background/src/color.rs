//! CSS-compatible colors for the 2D canvas

use serde::{Deserialize, Serialize};

/// A color as the canvas understands it
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    /// 8-bit RGB with a 0..1 alpha
    Rgba { r: u8, g: u8, b: u8, a: f32 },
    /// Hue in degrees, saturation and lightness in percent, 0..1 alpha
    Hsla { h: f32, s: f32, l: f32, a: f32 },
}

impl Color {
    /// Default accent used by the flow-field background
    pub const INDIGO: Color = Color::rgba(0x63, 0x66, 0xf1, 1.0);

    /// Create an RGBA color
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color::Rgba { r, g, b, a }
    }

    /// Create an HSLA color
    pub const fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        Color::Hsla { h, s, l, a }
    }

    /// Parse `#rgb` or `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        let nibble = |i: usize| u8::from_str_radix(digits.get(i..i + 1)?, 16).ok();
        let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            3 => Some(Color::rgba(
                nibble(0)? * 17,
                nibble(1)? * 17,
                nibble(2)? * 17,
                1.0,
            )),
            6 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, 1.0)),
            _ => None,
        }
    }

    /// Alpha component
    pub fn alpha(&self) -> f32 {
        match *self {
            Color::Rgba { a, .. } | Color::Hsla { a, .. } => a,
        }
    }

    /// Same color with alpha replaced, clamped to 0..1
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = alpha.clamp(0.0, 1.0);
        match self {
            Color::Rgba { r, g, b, .. } => Color::Rgba { r, g, b, a },
            Color::Hsla { h, s, l, .. } => Color::Hsla { h, s, l, a },
        }
    }

    /// CSS color string, e.g. `rgba(2, 11, 24, 0.1)`
    pub fn css(&self) -> String {
        match *self {
            Color::Rgba { r, g, b, a } => format!("rgba({}, {}, {}, {})", r, g, b, a),
            Color::Hsla { h, s, l, a } => format!("hsla({}, {}%, {}%, {})", h, s, l, a),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::INDIGO
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("Invalid hex color: {}", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        match color {
            Color::Rgba { r, g, b, .. } => format!("#{:02x}{:02x}{:02x}", r, g, b),
            hsla => hsla.css(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#6366f1"), Some(Color::INDIGO));
        assert_eq!(Color::from_hex("#fff"), Some(Color::rgba(255, 255, 255, 1.0)));
        assert_eq!(Color::from_hex("6366f1"), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_css() {
        assert_eq!(Color::rgba(2, 11, 24, 0.1).css(), "rgba(2, 11, 24, 0.1)");
        assert_eq!(Color::hsla(240.0, 85.0, 70.0, 0.5).css(), "hsla(240, 85%, 70%, 0.5)");
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(Color::INDIGO.with_alpha(-0.3).alpha(), 0.0);
        assert_eq!(Color::INDIGO.with_alpha(2.0).alpha(), 1.0);
        assert!((Color::hsla(190.0, 85.0, 70.0, 1.0).with_alpha(0.25).alpha() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::INDIGO).unwrap();
        assert_eq!(json, "\"#6366f1\"");

        let parsed: Color = serde_json::from_str("\"#06b6d4\"").unwrap();
        assert_eq!(parsed, Color::rgba(6, 182, 212, 1.0));

        assert!(serde_json::from_str::<Color>("\"teal\"").is_err());
    }
}
