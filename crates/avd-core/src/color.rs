use crate::error::ValueError;
use glam::Vec4;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// A straight (non-premultiplied) 32-bit ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::argb(0, 0, 0, 0);
    pub const BLACK: Color = Color::argb(0xFF, 0, 0, 0);

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Parses `#RGB`, `#ARGB`, `#RRGGBB` or `#AARRGGBB`.
    pub fn from_hex(literal: &str) -> Result<Self, ValueError> {
        let invalid = || ValueError::InvalidColor(literal.to_string());
        let hex = literal.trim().strip_prefix('#').ok_or_else(invalid)?;
        let digits = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(invalid)?;

        let single = |i: usize| digits[i] * 17;
        let pair = |i: usize| digits[i] << 4 | digits[i + 1];

        let color = match digits.len() {
            3 => Color::argb(0xFF, single(0), single(1), single(2)),
            4 => Color::argb(single(0), single(1), single(2), single(3)),
            6 => Color::argb(0xFF, pair(0), pair(2), pair(4)),
            8 => Color::argb(pair(0), pair(2), pair(4), pair(6)),
            _ => return Err(invalid()),
        };
        Ok(color)
    }

    /// Like [`Color::from_hex`], but resource and theme references (`@color/x`, `?attr/x`),
    /// which are never resolved, read as opaque black.
    pub fn from_literal(literal: &str) -> Result<Self, ValueError> {
        let trimmed = literal.trim();
        if trimmed.starts_with('@') || trimmed.starts_with('?') {
            debug!(reference = trimmed, "Unresolved color reference, using black");
            return Ok(Color::BLACK);
        }
        Color::from_hex(trimmed)
    }

    /// `#AARRGGBB`, upper-case.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }

    /// Component-wise linear blend in ARGB space, rounded to the nearest channel value.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        fn mix(from: u8, to: u8, t: f64) -> u8 {
            let v = from as f64 + (to as f64 - from as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        }
        Color::argb(
            mix(self.a, other.a, t),
            mix(self.r, other.r, t),
            mix(self.g, other.g, t),
            mix(self.b, other.b, t),
        )
    }

    pub fn alpha_f(&self) -> f32 {
        self.a as f32 / 255.0
    }

    pub fn is_transparent_sentinel(&self) -> bool {
        *self == Color::TRANSPARENT
    }

    /// RGBA in `[0, 1]`.
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.alpha_f(),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
