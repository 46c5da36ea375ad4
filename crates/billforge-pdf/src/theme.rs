//! Colours used by the renderer.

use std::fmt;
use std::str::FromStr;

use billforge_core::DocType;
use serde::{Deserialize, Serialize};

/// RGB colour with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(format!("invalid hex colour: {hex}"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| format!("invalid hex colour: {hex}"))
        };
        Ok(Color::rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn white() -> Self {
        Color::rgb8(255, 255, 255)
    }

    fn to_u8(component: f32) -> u8 {
        (component.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}",
            Self::to_u8(self.r),
            Self::to_u8(self.g),
            Self::to_u8(self.b)
        )
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// The palette a document is drawn with.
///
/// `primary` fills the table header and colours the title, `border` strokes
/// the table grids, `text` is everything else. Fields missing from a config
/// table take the invoice palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTheme {
    pub primary: Color,
    pub border: Color,
    pub text: Color,
}

impl ColorTheme {
    /// Default palette per document type: slate for invoices, blue for
    /// quotations.
    pub fn for_doc_type(doc_type: DocType) -> Self {
        match doc_type {
            DocType::Invoice => ColorTheme::default(),
            DocType::Quotation => ColorTheme {
                primary: Color::rgb8(0x2C, 0x52, 0x82),
                ..ColorTheme::default()
            },
        }
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        ColorTheme {
            primary: Color::rgb8(0x2D, 0x37, 0x48),
            border: Color::rgb8(0xE2, 0xE8, 0xF0),
            text: Color::rgb8(0x2D, 0x37, 0x48),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Color::from_hex("#2D3748").unwrap();
        assert_eq!(c, Color::rgb8(45, 55, 72));
        assert_eq!(Color::from_hex("e2e8f0").unwrap().to_string(), "#E2E8F0");
    }

    #[test]
    fn test_quotation_palette_differs() {
        let invoice = ColorTheme::for_doc_type(DocType::Invoice);
        let quotation = ColorTheme::for_doc_type(DocType::Quotation);
        assert_eq!(invoice, ColorTheme::default());
        assert_ne!(invoice.primary, quotation.primary);
        assert_eq!(quotation.primary.to_string(), "#2C5282");
        assert_eq!(invoice.border, quotation.border);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_hex("#ÄÄÄÄ").is_err());
    }

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.primary.to_string(), "#2D3748");
        assert_eq!(theme.border.to_string(), "#E2E8F0");
    }

    #[test]
    fn test_color_serde_as_hex_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            primary: Color,
        }
        let parsed: Wrapper = serde_json::from_str(r##"{"primary": "#FF0000"}"##).unwrap();
        assert_eq!(parsed.primary, Color::rgb8(255, 0, 0));
    }
}
