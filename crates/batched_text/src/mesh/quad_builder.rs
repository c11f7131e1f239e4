//! Quad-per-glyph geometry
//!
//! Converts laid out glyph records into flat vertex attribute arrays.
//! Each glyph generates 4 vertices (BL, TL, TR, BR) and 6 indices.

use crate::layout::GlyphRecord;
use bytemuck::{Pod, Zeroable};

/// Vertices per glyph quad
pub const VERTICES_PER_QUAD: usize = 4;

/// Floats per quad in the position attribute (4 corners x 3)
pub const POSITION_FLOATS_PER_QUAD: usize = VERTICES_PER_QUAD * 3;

/// Interleaved vertex for text rendering
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TextVertex {
    /// Position in local space
    pub position: [f32; 3],
    /// UV texture coordinates
    pub uv: [f32; 2],
    /// Centroid of the owning quad, for outline distance in the fragment stage
    pub center: [f32; 2],
}

/// Flat vertex attributes for a run of glyph quads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadAttributes {
    /// xyz per vertex
    pub positions: Vec<f32>,
    /// uv per vertex
    pub uvs: Vec<f32>,
    /// quad centroid xy per vertex
    pub centers: Vec<f32>,
}

impl QuadAttributes {
    /// Number of quads
    pub fn quad_count(&self) -> usize {
        self.positions.len() / POSITION_FLOATS_PER_QUAD
    }
    
    /// Attributes interleaved into [`TextVertex`] records
    pub fn vertices(&self) -> Vec<TextVertex> {
        self.positions
            .chunks_exact(3)
            .zip(self.uvs.chunks_exact(2))
            .zip(self.centers.chunks_exact(2))
            .map(|((p, uv), c)| TextVertex {
                position: [p[0], p[1], p[2]],
                uv: [uv[0], uv[1]],
                center: [c[0], c[1]],
            })
            .collect()
    }
}

/// Build one quad per glyph
///
/// UVs come from the glyph's atlas rect normalized by the texture size; with
/// `flip_y` the V axis is measured from the bottom of the texture. Corners
/// span `position + bearing` to `position + bearing + bitmap size`. Callers
/// pass only glyphs with a non-empty bitmap.
pub fn build_quads<'g>(
    glyphs: impl IntoIterator<Item = &'g GlyphRecord>,
    texture_width: f32,
    texture_height: f32,
    flip_y: bool,
) -> QuadAttributes {
    let glyphs = glyphs.into_iter();
    let (lower, _) = glyphs.size_hint();
    let mut attributes = QuadAttributes {
        positions: Vec::with_capacity(lower * POSITION_FLOATS_PER_QUAD),
        uvs: Vec::with_capacity(lower * VERTICES_PER_QUAD * 2),
        centers: Vec::with_capacity(lower * VERTICES_PER_QUAD * 2),
    };
    
    for record in glyphs {
        let bitmap = &record.glyph;
        
        let u0 = bitmap.x / texture_width;
        let u1 = (bitmap.x + bitmap.width) / texture_width;
        let (v0, v1) = if flip_y {
            (
                (texture_height - (bitmap.y + bitmap.height)) / texture_height,
                (texture_height - bitmap.y) / texture_height,
            )
        } else {
            ((bitmap.y + bitmap.height) / texture_height, bitmap.y / texture_height)
        };
        
        // BL, TL, TR, BR
        attributes.uvs.extend_from_slice(&[u0, v1, u0, v0, u1, v0, u1, v1]);
        
        let x = record.position[0] + bitmap.xoffset;
        let y = record.position[1] + bitmap.yoffset;
        let w = bitmap.width;
        let h = bitmap.height;
        
        attributes.positions.extend_from_slice(&[
            x, y, 0.0,
            x, y + h, 0.0,
            x + w, y + h, 0.0,
            x + w, y, 0.0,
        ]);
        
        let center = [x + w / 2.0, y + h / 2.0];
        for _ in 0..VERTICES_PER_QUAD {
            attributes.centers.extend_from_slice(&center);
        }
    }
    
    attributes
}

/// Triangle indices for `quad_count` quads, two triangles each
pub fn quad_indices(quad_count: usize) -> Vec<u32> {
    (0..quad_count as u32)
        .flat_map(|quad| {
            let base = quad * VERTICES_PER_QUAD as u32;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::GlyphEntry;
    
    fn record(x: f32, y: f32, glyph: GlyphEntry) -> GlyphRecord {
        GlyphRecord {
            position: [x, y],
            glyph,
            index: 0,
            lines_total: 1,
            line_index: 0,
            line_letters_total: 1,
            line_letter_index: 0,
            line_words_total: 1,
            line_word_index: 0,
            words_total: 1,
            word_index: 0,
            letters_total: 1,
            letter_index: 0,
        }
    }
    
    fn atlas_glyph() -> GlyphEntry {
        GlyphEntry {
            id: 'a' as u32,
            x: 32.0,
            y: 16.0,
            width: 16.0,
            height: 8.0,
            xoffset: 1.0,
            yoffset: 2.0,
            xadvance: 18.0,
        }
    }
    
    #[test]
    fn test_text_vertex_size() {
        assert_eq!(
            std::mem::size_of::<TextVertex>(),
            std::mem::size_of::<f32>() * 7 // 3 position + 2 uv + 2 center
        );
    }
    
    #[test]
    fn test_quad_corners_and_centers() {
        let glyphs = [record(10.0, -20.0, atlas_glyph())];
        let quads = build_quads(&glyphs, 64.0, 32.0, false);
        
        assert_eq!(quads.quad_count(), 1);
        assert_eq!(
            quads.positions,
            vec![11.0, -18.0, 0.0, 11.0, -10.0, 0.0, 27.0, -10.0, 0.0, 27.0, -18.0, 0.0]
        );
        assert_eq!(quads.centers, [19.0, -14.0].repeat(4));
    }
    
    #[test]
    fn test_uvs_without_flip() {
        let glyphs = [record(0.0, 0.0, atlas_glyph())];
        let quads = build_quads(&glyphs, 64.0, 32.0, false);
        
        assert_eq!(quads.uvs, vec![0.5, 0.5, 0.5, 0.75, 0.75, 0.75, 0.75, 0.5]);
    }
    
    #[test]
    fn test_uvs_with_flip() {
        let glyphs = [record(0.0, 0.0, atlas_glyph())];
        let quads = build_quads(&glyphs, 64.0, 32.0, true);
        
        assert_eq!(quads.uvs, vec![0.5, 0.5, 0.5, 0.25, 0.75, 0.25, 0.75, 0.5]);
    }
    
    #[test]
    fn test_interleaved_vertices() {
        let glyphs = [record(0.0, 0.0, atlas_glyph())];
        let vertices = build_quads(&glyphs, 64.0, 32.0, true).vertices();
        
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[2].position, [17.0, 10.0, 0.0]);
        assert_eq!(vertices[2].uv, [0.75, 0.25]);
        assert_eq!(vertices[2].center, [9.0, 6.0]);
    }
    
    #[test]
    fn test_quad_indices() {
        assert_eq!(quad_indices(2), vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }
}
