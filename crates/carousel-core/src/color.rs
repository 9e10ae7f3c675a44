//! Slide background color.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::white()
    }
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse a CSS color string (`#rgb`, `#rrggbb`, `#rrggbbaa`, named colors).
    ///
    /// Returns `None` for anything the parser rejects; validation of user input
    /// is left to the caller.
    pub fn parse(input: &str) -> Option<Self> {
        let parsed = parse_color(input.trim()).ok()?;
        Some(parsed.to_alpha_color::<Srgb>().into())
    }

    /// Parse a color string, falling back to white.
    pub fn parse_or_white(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|| {
            log::warn!("Unrecognised background color {:?}, using white", input);
            Self::white()
        })
    }

    /// Format as an uppercase `#RRGGBB` string (alpha appended when not opaque).
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}
