//! Color parsing and keyword-to-palette resolution
//!
//! Free-text background descriptors ("elegant navy velvet", "rose gold") are
//! resolved against a single ordered keyword table. The first entry with a
//! matching keyword wins, so the order of [`PALETTE_TABLE`] is significant.

use crate::error::{Result, StudioError};
use image::Rgb;

/// A two-color palette used by the background generators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// First color (gradient top, solid fill, texture base)
    pub primary: Rgb<u8>,
    /// Second color (gradient bottom)
    pub secondary: Rgb<u8>,
}

impl Palette {
    #[must_use]
    pub const fn new(primary: [u8; 3], secondary: [u8; 3]) -> Self {
        Self {
            primary: Rgb(primary),
            secondary: Rgb(secondary),
        }
    }
}

/// Dark navy to dark blue, used when nothing else matches
pub const DEFAULT_PALETTE: Palette = Palette::new([0x1a, 0x1a, 0x2e], [0x0f, 0x34, 0x60]);

/// Keyword table checked in priority order
pub const PALETTE_TABLE: &[(&[&str], Palette)] = &[
    // dark navy
    (&["blue", "navy"], Palette::new([0x0f, 0x17, 0x2a], [0x1e, 0x3a, 0x8a])),
    // dark brown
    (&["gold", "luxury"], Palette::new([0x3e, 0x27, 0x23], [0x5d, 0x40, 0x37])),
    // near-black
    (&["black", "dark"], Palette::new([0x0a, 0x0a, 0x0a], [0x1c, 0x1c, 0x1c])),
    // dark rose
    (&["pink", "rose"], Palette::new([0x4a, 0x1c, 0x2b], [0x83, 0x18, 0x43])),
    // dark green
    (&["green"], Palette::new([0x05, 0x2e, 0x16], [0x14, 0x53, 0x2d])),
    // light neutral
    (&["white", "clean", "light"], Palette::new([0xf5, 0xf5, 0xf4], [0xe7, 0xe5, 0xe4])),
];

/// Resolve a free-text descriptor to a palette by case-insensitive substring match
#[must_use]
pub fn resolve_palette(descriptor: &str) -> Palette {
    let descriptor = descriptor.to_lowercase();
    PALETTE_TABLE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| descriptor.contains(k)))
        .map_or(DEFAULT_PALETTE, |(_, palette)| *palette)
}

/// Parse a `#rrggbb` (or `rrggbb`) hex color string
///
/// # Errors
/// Returns `StudioError::Config` when the string is not six hex digits.
pub fn parse_hex_color(value: &str) -> Result<Rgb<u8>> {
    let trimmed = value.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if hex.len() != 6 || !hex.is_ascii() {
        return Err(StudioError::config(format!(
            "Invalid hex color '{}': expected #rrggbb",
            value
        )));
    }

    let channel = |range: std::ops::Range<usize>| -> Result<u8> {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .ok_or_else(|| {
                StudioError::config(format!("Invalid hex color '{}': non-hex digits", value))
            })
    };

    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

/// Rec. 601 luma of a color, 0-255
#[must_use]
pub fn luma(color: Rgb<u8>) -> f32 {
    0.299 * f32::from(color[0]) + 0.587 * f32::from(color[1]) + 0.114 * f32::from(color[2])
}
