//! Hex colour parsing for document colour fields.
//!
//! Documents keep colours as the strings the user entered; they are only
//! parsed when something needs pixels.

use std::str::FromStr;

use palette::Srgb;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid colour {value:?}: expected #rgb or #rrggbb")]
pub struct ColorError {
    pub value: String,
}

/// Parses a `#rgb` or `#rrggbb` colour string.
pub fn parse_color(value: &str) -> Result<Srgb<u8>, ColorError> {
    let trimmed = value.trim();
    if !trimmed.starts_with('#') {
        return Err(ColorError {
            value: value.to_string(),
        });
    }
    Srgb::<u8>::from_str(trimmed).map_err(|_| ColorError {
        value: value.to_string(),
    })
}

/// Formats a colour as lowercase `#rrggbb`.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Normalises a user-entered colour to lowercase `#rrggbb`.
pub fn normalize(value: &str) -> Result<String, ColorError> {
    parse_color(value).map(to_hex)
}
