//! Color strings for rendering
//!
//! Hex colors (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`) are decoded
//! directly; every other CSS form (`rgb()`, `hsl()`, named colors, ...) goes
//! through lightningcss.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::{CssColor, FloatColor};
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    /// Hex color with a digit count other than 3, 4, 6 or 8
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// Rejected by the CSS parser
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a color string into RGBA.
///
/// # Examples
///
/// ```
/// use fractgrid::color::parse_color;
/// use image::Rgba;
///
/// assert_eq!(parse_color("#00F").unwrap(), Rgba([0, 0, 255, 255]));
/// assert_eq!(parse_color("#FFFFFF80").unwrap(), Rgba([255, 255, 255, 128]));
/// assert_eq!(parse_color("white").unwrap(), Rgba([255, 255, 255, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    match s.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => parse_css(s),
    }
}

fn parse_hex(hex: &str) -> Result<Rgba<u8>, ColorError> {
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(bad));
    }
    let value = u32::from_str_radix(hex, 16).map_err(|_| ColorError::InvalidLength(hex.len()))?;
    let byte = |shift: u32| ((value >> shift) & 0xFF) as u8;
    // Short forms repeat each nibble: 0xF -> 0xFF
    let nibble = |shift: u32| ((value >> shift) & 0xF) as u8 * 17;

    match hex.len() {
        3 => Ok(Rgba([nibble(8), nibble(4), nibble(0), 255])),
        4 => Ok(Rgba([nibble(12), nibble(8), nibble(4), nibble(0)])),
        6 => Ok(Rgba([byte(16), byte(8), byte(0), 255])),
        8 => Ok(Rgba([byte(24), byte(16), byte(8), byte(0)])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

fn parse_css(s: &str) -> Result<Rgba<u8>, ColorError> {
    let color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let srgb = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse(format!("'{}' has no sRGB equivalent", s)))?;

    match srgb {
        CssColor::RGBA(c) => Ok(Rgba([c.red, c.green, c.blue, c.alpha])),
        CssColor::Float(float) => match float.as_ref() {
            FloatColor::RGB(c) => {
                let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                Ok(Rgba([channel(c.r), channel(c.g), channel(c.b), channel(c.alpha)]))
            }
            _ => Err(ColorError::CssParse(format!("'{}' did not convert to RGB", s))),
        },
        _ => Err(ColorError::CssParse(format!("'{}' did not convert to RGB", s))),
    }
}

/// Format a color as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
pub fn to_hex(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_short_forms() {
        assert_eq!(parse_color("#F00").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("#0F08").unwrap(), Rgba([0, 255, 0, 136]));
    }

    #[test]
    fn test_hex_long_forms() {
        assert_eq!(parse_color("#1D2B53").unwrap(), Rgba([0x1D, 0x2B, 0x53, 255]));
        assert_eq!(parse_color("#00000000").unwrap(), Rgba([0, 0, 0, 0]));
        assert_eq!(parse_color("#abcdef").unwrap(), Rgba([0xAB, 0xCD, 0xEF, 255]));
    }

    #[test]
    fn test_hex_errors() {
        assert_eq!(parse_color("").unwrap_err(), ColorError::Empty);
        assert_eq!(parse_color("#12345").unwrap_err(), ColorError::InvalidLength(5));
        assert_eq!(parse_color("#GG0000").unwrap_err(), ColorError::InvalidHex('G'));
        assert_eq!(parse_color("#").unwrap_err(), ColorError::InvalidLength(0));
    }

    #[test]
    fn test_css_forms() {
        assert_eq!(parse_color("rgb(0, 0, 255)").unwrap(), Rgba([0, 0, 255, 255]));
        assert_eq!(parse_color("black").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_color("transparent").unwrap(), Rgba([0, 0, 0, 0]));
        assert_eq!(parse_color("hsl(0, 100%, 50%)").unwrap(), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_css_invalid() {
        assert!(matches!(parse_color("not-a-color"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(Rgba([255, 0, 16, 255])), "#FF0010");
        assert_eq!(to_hex(Rgba([0, 0, 0, 0])), "#00000000");
    }
}
