//! Font metadata for the 3D instanced glyph path
//!
//! Glyph outlines are baked into data textures addressed by
//! `(vertex id, glyph index)`; the CPU side only needs advances, the
//! character map and the vertex budget of the largest glyph.

use super::{read_descriptor, FontError, FontResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Glyph outline bounds in font units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontBoundingBox {
    /// Left edge
    pub x_min: f32,
    /// Bottom edge
    pub y_min: f32,
    /// Right edge
    pub x_max: f32,
    /// Top edge
    pub y_max: f32,
}

/// Raw 3D font metadata as produced by the font texture generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancedFontMetadata {
    /// Font units to scene units
    pub font_scale: f32,
    /// Underline thickness in font units
    pub underline_thickness: f32,
    /// Union of all glyph bounds
    pub bounding_box: FontBoundingBox,
    /// Advance per glyph index, in font units
    pub advances: Vec<f32>,
    /// Vertex count of the largest glyph mesh
    pub max_vertices: usize,
    /// Character to glyph index
    pub char_to_index: HashMap<String, u32>,
    /// Normalization shift applied when baking vertex offsets
    #[serde(default)]
    pub x_shift: f32,
    /// Normalization shift applied when baking vertex offsets
    #[serde(default)]
    pub y_shift: f32,
    /// Normalization shift applied when baking vertex offsets
    #[serde(default)]
    pub z_shift: f32,
    /// Normalization scale applied when baking vertex offsets
    #[serde(default = "unit_scale")]
    pub x_scale: f32,
    /// Normalization scale applied when baking vertex offsets
    #[serde(default = "unit_scale")]
    pub y_scale: f32,
    /// Normalization scale applied when baking vertex offsets
    #[serde(default = "unit_scale")]
    pub z_scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

/// 3D font with character lookups resolved
#[derive(Debug, Clone)]
pub struct InstancedFontInfo {
    metadata: InstancedFontMetadata,
    char_map: HashMap<char, u32>,
}

impl InstancedFontInfo {
    /// Build from parsed metadata
    ///
    /// Map keys that are not exactly one character are rejected.
    pub fn from_metadata(metadata: InstancedFontMetadata) -> FontResult<Self> {
        let mut char_map = HashMap::with_capacity(metadata.char_to_index.len());
        for (key, &index) in &metadata.char_to_index {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => {
                    char_map.insert(ch, index);
                }
                _ => {
                    return Err(FontError::Invalid(format!(
                        "charToIndex key {:?} is not a single character",
                        key
                    )))
                }
            }
        }
        
        Ok(Self { metadata, char_map })
    }
    
    /// Parse 3D font metadata JSON
    pub fn from_json(json: &str) -> FontResult<Self> {
        let metadata: InstancedFontMetadata = serde_json::from_str(json)?;
        let font = Self::from_metadata(metadata)?;
        
        log::debug!(
            "Loaded instanced font: {} mapped chars, {} advances, {} max vertices",
            font.char_map.len(),
            font.metadata.advances.len(),
            font.metadata.max_vertices
        );
        Ok(font)
    }
    
    /// Load 3D font metadata JSON from disk
    pub fn from_file(path: impl AsRef<Path>) -> FontResult<Self> {
        let json = read_descriptor(path.as_ref())?;
        Self::from_json(&json)
    }
    
    /// Raw metadata
    pub fn metadata(&self) -> &InstancedFontMetadata {
        &self.metadata
    }
    
    /// Glyph index for a character, if mapped
    pub fn mapped_index(&self, ch: char) -> Option<u32> {
        self.char_map.get(&ch).copied()
    }
    
    /// Glyph index written into the instance buffer for a character
    ///
    /// Unmapped whitespace uses the space glyph when there is one; anything
    /// else unmapped uses `?`, then index 0.
    pub fn glyph_index(&self, ch: char) -> u32 {
        if let Some(index) = self.mapped_index(ch) {
            return index;
        }
        
        if ch.is_whitespace() {
            if let Some(space) = self.mapped_index(' ') {
                return space;
            }
        }
        
        self.unknown_glyph_index().unwrap_or(0)
    }
    
    /// Index of the `?` glyph used for unmapped characters
    pub fn unknown_glyph_index(&self) -> Option<u32> {
        self.mapped_index('?')
    }
    
    /// Advance of a character in font units
    ///
    /// Falls back to the `?` glyph's advance, then 0.
    pub fn advance(&self, ch: char) -> f32 {
        let advance_of = |index: u32| self.metadata.advances.get(index as usize).copied();
        
        self.mapped_index(ch)
            .and_then(advance_of)
            .or_else(|| self.unknown_glyph_index().and_then(advance_of))
            .unwrap_or(0.0)
    }
    
    /// Font units to scene units
    pub fn font_scale(&self) -> f32 {
        self.metadata.font_scale
    }
    
    /// Vertex count of the largest glyph
    pub fn max_vertices(&self) -> usize {
        self.metadata.max_vertices
    }
    
    /// Glyph bounds in font units
    pub fn bounding_box(&self) -> &FontBoundingBox {
        &self.metadata.bounding_box
    }
    
    /// Scene-space distance between consecutive lines
    pub fn line_height(&self) -> f32 {
        let bbox = &self.metadata.bounding_box;
        (bbox.y_max - bbox.y_min + self.metadata.underline_thickness) * self.metadata.font_scale
    }
    
    /// Scene-space vertical shift that centers a line on the anchor
    pub fn vertical_center_shift(&self) -> f32 {
        let bbox = &self.metadata.bounding_box;
        -((bbox.y_max - bbox.y_min) / 2.0 + bbox.y_min) * self.metadata.font_scale
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::instanced_font;
    use super::*;
    use approx::assert_relative_eq;
    
    #[test]
    fn test_glyph_index_fallbacks() {
        let font = instanced_font();
        
        assert_eq!(font.glyph_index('c'), 2);
        assert_eq!(font.glyph_index('\n'), 5);
        assert_eq!(font.glyph_index('Z'), 6);
    }
    
    #[test]
    fn test_advance_falls_back_to_unknown_glyph() {
        let font = instanced_font();
        
        assert_eq!(font.advance('b'), 11.0);
        assert_eq!(font.advance('Z'), 9.0);
    }
    
    #[test]
    fn test_line_metrics() {
        let font = instanced_font();
        
        assert_relative_eq!(font.line_height(), 11.0);
        assert_relative_eq!(font.vertical_center_shift(), -3.0);
    }
    
    #[test]
    fn test_multi_char_key_rejected() {
        let json = r#"{
            "fontScale": 1, "underlineThickness": 0,
            "boundingBox": {"xMin": 0, "yMin": 0, "xMax": 1, "yMax": 1},
            "advances": [1], "maxVertices": 3, "charToIndex": {"ab": 0}
        }"#;
        
        assert!(matches!(InstancedFontInfo::from_json(json), Err(FontError::Invalid(_))));
    }
    
    #[test]
    fn test_optional_normalization_fields_default() {
        let json = r#"{
            "fontScale": 1, "underlineThickness": 0,
            "boundingBox": {"xMin": 0, "yMin": 0, "xMax": 1, "yMax": 1},
            "advances": [1], "maxVertices": 3, "charToIndex": {"a": 0}
        }"#;
        let font = InstancedFontInfo::from_json(json).unwrap();
        
        assert_eq!(font.metadata().x_scale, 1.0);
        assert_eq!(font.metadata().z_shift, 0.0);
    }
}
