//! CSS color resolution.
//!
//! Markup colors arrive as free-form CSS strings (`red`, `#f80`,
//! `rgb(255, 128, 0)`, `hsl(...)`). They are resolved once at parse time
//! into floating point components in `[0, 1]`, or into a packed
//! `0xRRGGBB` integer for material parameters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Unpacks a `0xRRGGBB` integer.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Packs the color into `0xRRGGBB`, rounding each channel.
    #[must_use]
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    #[inline]
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    #[inline]
    #[must_use]
    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Resolves a CSS color string. Returns `None` for anything
/// `csscolorparser` does not understand; alpha is discarded.
#[must_use]
pub fn parse_color(text: &str) -> Option<Rgb> {
    let color = csscolorparser::parse(text.trim()).ok()?;
    Some(Rgb::new(color.r as f32, color.g as f32, color.b as f32))
}

/// Resolves a CSS color string into a packed `0xRRGGBB` integer.
#[must_use]
pub fn parse_color_hex(text: &str) -> Option<u32> {
    parse_color(text).map(Rgb::to_hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_hex_colors_resolve() {
        assert_eq!(parse_color_hex("red"), Some(0xff0000));
        assert_eq!(parse_color_hex("#00ff00"), Some(0x00ff00));
        assert_eq!(parse_color_hex(" rgb(0, 0, 255) "), Some(0x0000ff));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_color("not-a-color").is_none());
    }

    #[test]
    fn hex_round_trips_through_components() {
        let c = Rgb::from_hex(0x336699);
        assert_eq!(c.to_hex(), 0x336699);
    }
}
