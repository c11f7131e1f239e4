//! Bitmap font metrics (BMFont JSON)
//!
//! Immutable lookup of glyph atlas rectangles, bearings, advances and kerning
//! pairs. Loaded once per font and shared by reference with every layout run.

use super::{read_descriptor, FontError, FontResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Characters probed, in order, to find the font's x-height
const X_HEIGHT_PROBES: [char; 13] = ['x', 'e', 'a', 'o', 'n', 's', 'r', 'c', 'u', 'm', 'v', 'w', 'z'];

/// Characters probed, in order, when the font has no space glyph
const M_WIDTH_PROBES: [char; 2] = ['m', 'w'];

/// Characters probed, in order, to find the font's cap height
const CAP_HEIGHT_PROBES: [char; 14] = ['H', 'I', 'N', 'E', 'F', 'K', 'L', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z'];

/// Geometry of a single glyph in the atlas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphEntry {
    /// Character code
    pub id: u32,
    /// Atlas rect left, in texels
    pub x: f32,
    /// Atlas rect top, in texels
    pub y: f32,
    /// Bitmap width
    pub width: f32,
    /// Bitmap height
    pub height: f32,
    /// Horizontal bearing
    pub xoffset: f32,
    /// Vertical bearing
    pub yoffset: f32,
    /// Pen advance after this glyph
    pub xadvance: f32,
}

impl GlyphEntry {
    /// Whether the bitmap covers any texels
    pub fn has_area(&self) -> bool {
        self.width * self.height > 0.0
    }
}

/// Kerning adjustment between two adjacent glyphs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KerningPair {
    /// Left glyph id
    pub first: u32,
    /// Right glyph id
    pub second: u32,
    /// Horizontal adjustment added before the right glyph
    pub amount: f32,
}

/// Shared line metrics and atlas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonMetrics {
    /// Distance between consecutive baselines
    pub line_height: f32,
    /// Distance from the top of a line to its baseline
    pub base: f32,
    /// Atlas texture width
    pub scale_w: f32,
    /// Atlas texture height
    pub scale_h: f32,
}

/// Raw BMFont JSON descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitmapFontDescriptor {
    /// Glyph entries
    pub chars: Vec<GlyphEntry>,
    /// Kerning pairs
    #[serde(default)]
    pub kernings: Vec<KerningPair>,
    /// Line metrics
    pub common: CommonMetrics,
}

/// Per-font glyph lookup used by text layout
///
/// Glyph order from the descriptor is preserved; the first entry doubles as
/// the last-resort fallback for the space glyph. When a descriptor lists the
/// same id or kerning pair twice, the first occurrence wins.
#[derive(Debug, Clone)]
pub struct GlyphMetricsTable {
    glyphs: Vec<GlyphEntry>,
    index: HashMap<u32, usize>,
    kernings: HashMap<(u32, u32), f32>,
    common: CommonMetrics,
}

impl GlyphMetricsTable {
    /// Build a table from glyphs, kerning pairs and line metrics
    pub fn new(glyphs: Vec<GlyphEntry>, kernings: &[KerningPair], common: CommonMetrics) -> Self {
        let mut index = HashMap::with_capacity(glyphs.len());
        for (i, glyph) in glyphs.iter().enumerate() {
            index.entry(glyph.id).or_insert(i);
        }
        
        let mut kerning_map = HashMap::with_capacity(kernings.len());
        for pair in kernings {
            kerning_map.entry((pair.first, pair.second)).or_insert(pair.amount);
        }
        
        Self {
            glyphs,
            index,
            kernings: kerning_map,
            common,
        }
    }
    
    /// Build a table from a parsed descriptor
    pub fn from_descriptor(descriptor: BitmapFontDescriptor) -> Self {
        Self::new(descriptor.chars, &descriptor.kernings, descriptor.common)
    }
    
    /// Parse a BMFont JSON descriptor
    ///
    /// A descriptor without glyphs is rejected with [`FontError::Invalid`].
    pub fn from_json(json: &str) -> FontResult<Self> {
        let descriptor: BitmapFontDescriptor = serde_json::from_str(json)?;
        if descriptor.chars.is_empty() {
            return Err(FontError::Invalid("descriptor has no chars".to_string()));
        }
        
        let table = Self::from_descriptor(descriptor);
        
        log::debug!(
            "Loaded bitmap font: {} glyphs, {} kerning pairs, line height {}",
            table.glyphs.len(),
            table.kernings.len(),
            table.common.line_height
        );
        Ok(table)
    }
    
    /// Load a BMFont JSON descriptor from disk
    pub fn from_file(path: impl AsRef<Path>) -> FontResult<Self> {
        let json = read_descriptor(path.as_ref())?;
        Self::from_json(&json)
    }
    
    /// Glyph for a character code, if the font has one
    pub fn glyph(&self, id: u32) -> Option<&GlyphEntry> {
        self.index.get(&id).map(|&i| &self.glyphs[i])
    }
    
    /// Glyph for a character, if the font has one
    pub fn glyph_for_char(&self, ch: char) -> Option<&GlyphEntry> {
        self.glyph(ch as u32)
    }
    
    /// First glyph in descriptor order
    pub fn first_glyph(&self) -> Option<&GlyphEntry> {
        self.glyphs.first()
    }
    
    /// All glyphs in descriptor order
    pub fn glyphs(&self) -> &[GlyphEntry] {
        &self.glyphs
    }
    
    /// Whether the font has no glyphs at all
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
    
    /// Kerning between two glyph ids, 0 when the pair is not listed
    pub fn kerning(&self, left: u32, right: u32) -> f32 {
        self.kernings.get(&(left, right)).copied().unwrap_or(0.0)
    }
    
    /// Line metrics and atlas size
    pub fn common(&self) -> &CommonMetrics {
        &self.common
    }
    
    /// Font line height
    pub fn line_height(&self) -> f32 {
        self.common.line_height
    }
    
    /// Distance from line top to baseline
    pub fn base(&self) -> f32 {
        self.common.base
    }
    
    /// Atlas texture dimensions
    pub fn texture_size(&self) -> (f32, f32) {
        (self.common.scale_w, self.common.scale_h)
    }
    
    /// Height of the first present x-height probe glyph, 0 if none
    pub fn x_height(&self) -> f32 {
        self.probe(&X_HEIGHT_PROBES).map_or(0.0, |g| g.height)
    }
    
    /// Height of the first present cap-height probe glyph, 0 if none
    pub fn cap_height(&self) -> f32 {
        self.probe(&CAP_HEIGHT_PROBES).map_or(0.0, |g| g.height)
    }
    
    /// Glyph used as the base for synthesized whitespace
    ///
    /// The space glyph, else `m` or `w`, else the first glyph.
    pub fn space_source_glyph(&self) -> Option<&GlyphEntry> {
        self.glyph_for_char(' ')
            .or_else(|| self.probe(&M_WIDTH_PROBES))
            .or_else(|| self.first_glyph())
    }
    
    fn probe(&self, candidates: &[char]) -> Option<&GlyphEntry> {
        candidates.iter().find_map(|&ch| self.glyph_for_char(ch))
    }
}

/// Test fixtures shared across modules
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    
    /// Glyph with a square bitmap
    pub fn glyph(ch: char, advance: f32, size: f32) -> GlyphEntry {
        GlyphEntry {
            id: ch as u32,
            x: 0.0,
            y: 0.0,
            width: size,
            height: size,
            xoffset: 0.0,
            yoffset: 0.0,
            xadvance: advance,
        }
    }
    
    /// Small monospace-ish font: every glyph 8 wide with advance 10,
    /// space 0x0 with advance 5; line height 20, base 16
    pub fn test_font() -> GlyphMetricsTable {
        let mut glyphs: Vec<GlyphEntry> = "HIWVAabcdefghijklmnopqrstuvwxyz?"
            .chars()
            .map(|ch| glyph(ch, 10.0, 8.0))
            .collect();
        glyphs.push(GlyphEntry {
            width: 0.0,
            height: 0.0,
            ..glyph(' ', 5.0, 0.0)
        });
        
        GlyphMetricsTable::new(
            glyphs,
            &[KerningPair { first: 'A' as u32, second: 'V' as u32, amount: -2.0 }],
            CommonMetrics {
                line_height: 20.0,
                base: 16.0,
                scale_w: 256.0,
                scale_h: 128.0,
            },
        )
    }
}
