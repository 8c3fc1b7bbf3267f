/// Color parsing and per-pixel compositing rules
///
/// Every combination is computed in floating or signed space and clamped back
/// into a channel, so no strategy can wrap around or go negative.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextureError};

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parse a `#RRGGBB` string
    ///
    /// The leading `#` is optional and hex digits may be either case. Short
    /// forms such as `#FFF` are rejected rather than padded.
    pub fn from_hex(input: &str) -> Result<Self> {
        let digits = input.trim().strip_prefix('#').unwrap_or(input.trim());
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TextureError::InvalidColor(input.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| TextureError::InvalidColor(input.to_string()))
        };

        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Canonical `#RRGGBB` form (upper case)
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Clamp a float to a channel, truncating toward zero
pub fn clamp_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Multiply every channel by `factor`
pub fn scale(color: Rgb, factor: f64) -> [u8; 3] {
    [
        clamp_channel(color.r as f64 * factor),
        clamp_channel(color.g as f64 * factor),
        clamp_channel(color.b as f64 * factor),
    ]
}

/// Add a signed offset to every channel
pub fn offset(color: Rgb, delta: i32) -> [u8; 3] {
    let shift = |c: u8| (c as i32 + delta).clamp(0, 255) as u8;
    [shift(color.r), shift(color.g), shift(color.b)]
}

// ============================================================================
// Strategy compositors
// ============================================================================

/// Star photosphere: brightness varies between 20% and 100% of the base color
pub fn star_pixel(base: Rgb, noise: f64) -> [u8; 3] {
    scale(base, 0.6 + 0.4 * noise)
}

/// Gas giant bands: a gentler modulation that may brighten slightly
pub fn gas_pixel(base: Rgb, noise: f64) -> [u8; 3] {
    scale(base, 0.8 + 0.3 * noise)
}

/// Rocky surface: noise maps to an additive offset in roughly [-50, 50]
pub fn rocky_pixel(base: Rgb, noise: f64) -> [u8; 3] {
    let shifted = ((noise + 1.0) / 2.0 * 100.0) as i32 - 50;
    offset(base, shifted)
}

/// Ice crack pattern; blue always sits 20 above red and green
pub fn ice_pixel(noise: f64) -> [u8; 3] {
    let crack = ((noise + 1.0) * 128.0).clamp(0.0, 255.0) as u8;
    [crack, crack, crack.saturating_add(20)]
}

pub const LAND: [u8; 3] = [34, 139, 34];
pub const OCEAN: [u8; 3] = [65, 105, 225];

/// Binary land/ocean mask
pub fn terrestrial_pixel(noise: f64) -> [u8; 3] {
    if noise > 0.1 { LAND } else { OCEAN }
}
