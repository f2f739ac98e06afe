// Color - Resolved RGBA color values
//
// Palette sources describe colors as floating-point RGB intent (0.0-1.0).
// Indexed systems have no alpha channel, so every resolved color is opaque.

use serde::{Deserialize, Serialize};

/// A resolved color with floating-point channels in the range 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Opaque black, used for freshly allocated buffer slots
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Magenta, the default diagnostic color for unresolvable indices
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);

    /// Create an opaque color from RGB channels
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an opaque color from a packed 0xRRGGBB value
    pub fn from_rgb_u32(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
        )
    }

    /// Create an opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Convert to the [R, G, B, A] byte layout expected by pixel surfaces
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    /// Convert to [R, G, B] bytes, dropping alpha
    #[inline]
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[inline]
fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
