//! # Color Module
//!
//! Flat RGB colors and their packed "hex triplet" form.
//!
//! The packed form is what the face masks store. A leading `0x1000000` bias is
//! added so that even black packs to a non-zero value, which leaves `0` free to
//! mean "no visible face here".

use serde::{Deserialize, Serialize};

/// Packed RGB color with the `0x1000000` presence bias.
pub type HexTriplet = u32;

/// The bias bit that keeps every packed color non-zero.
pub const HEX_TRIPLET_BIAS: HexTriplet = 1 << 24;

/// A flat 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Creates a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// Packs a color into a single comparable integer.
///
/// The result is `0x1000000 + (r << 16) + (g << 8) + b` and is never zero.
#[inline]
pub fn to_hex_triplet(color: Color) -> HexTriplet {
    HEX_TRIPLET_BIAS + ((color.r as u32) << 16) + ((color.g as u32) << 8) + color.b as u32
}

/// Unpacks a value produced by [`to_hex_triplet`].
#[inline]
pub fn from_hex_triplet(value: HexTriplet) -> Color {
    Color {
        r: ((value >> 16) & 0xFF) as u8,
        g: ((value >> 8) & 0xFF) as u8,
        b: (value & 0xFF) as u8,
    }
}
