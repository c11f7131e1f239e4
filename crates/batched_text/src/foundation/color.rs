//! RGB colors used by text styles and instance buffers

use serde::{Deserialize, Serialize};

/// Linear RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    
    /// Create a color from float components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
    
    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }
    
    /// Packed `0xRRGGBB` value, each channel clamped and rounded to 8 bits
    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
    
    /// Lowercase six digit hex string, e.g. `"ff8800"`
    ///
    /// Two colors with the same hex string are considered the same style
    /// color even if their float components differ slightly.
    pub fn hex_string(&self) -> String {
        format!("{:06x}", self.to_hex())
    }
    
    /// RGBA components with the given alpha
    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
