//! Batched text geometry shared by many 2D text instances
//!
//! Every instance of a style group is laid out and appended into one set of
//! position/UV/center buffers. The untransformed positions are kept in a
//! frozen copy so a single instance can be moved by re-projecting its
//! corners, without rebuilding the rest of the batch.

use super::{build_quads, quad_indices, TextBounds, POSITION_FLOATS_PER_QUAD};
use crate::config::TextEngineConfig;
use crate::font::GlyphMetricsTable;
use crate::foundation::math::{Mat4, Point3};
use crate::layout::{LayoutOptions, LayoutResult, TextConfig, TextLayout};

/// Geometry and layouts for a batch of text instances
#[derive(Debug, Clone, Default)]
pub struct BatchedTextMesh {
    layouts: Vec<TextLayout>,
    positions: Vec<f32>,
    original_positions: Vec<f32>,
    uvs: Vec<f32>,
    centers: Vec<f32>,
    indices: Vec<u32>,
    instance_offsets: Vec<usize>,
    instance_lengths: Vec<usize>,
    positions_dirty: bool,
}

impl BatchedTextMesh {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Lay out every instance and rebuild all buffers
    ///
    /// Instance `i` of the batch is `texts[i]`; its quads occupy
    /// `instance_range(i)` in glyph units.
    pub fn update(
        &mut self,
        texts: &[TextConfig],
        font: &GlyphMetricsTable,
        config: &TextEngineConfig,
    ) -> LayoutResult<()> {
        let layouts = texts
            .iter()
            .map(|text| {
                let options = LayoutOptions::from_config(text, font, config.tab_size);
                crate::layout::layout(&text.text, &options)
            })
            .collect::<LayoutResult<Vec<_>>>()?;
        
        let (texture_width, texture_height) = font.texture_size();
        
        self.positions.clear();
        self.uvs.clear();
        self.centers.clear();
        self.instance_offsets.clear();
        self.instance_lengths.clear();
        
        let mut offset = 0;
        for layout in &layouts {
            let quads = build_quads(layout.visible_glyphs(), texture_width, texture_height, config.flip_y);
            let length = quads.quad_count();
            
            self.instance_offsets.push(offset);
            self.instance_lengths.push(length);
            offset += length;
            
            self.positions.extend_from_slice(&quads.positions);
            self.uvs.extend_from_slice(&quads.uvs);
            self.centers.extend_from_slice(&quads.centers);
        }
        
        self.indices = quad_indices(offset);
        self.original_positions = self.positions.clone();
        self.layouts = layouts;
        self.positions_dirty = true;
        
        log::debug!("Rebuilt text batch: {} instances, {} glyph quads", texts.len(), offset);
        Ok(())
    }
    
    /// Write instance `instance`'s corners, transformed by `transform`, into the live positions
    ///
    /// Reads from the frozen untransformed copy, so repeated calls do not
    /// accumulate. Other instances are left untouched. Returns `false` when
    /// the instance does not exist.
    pub fn reproject_instance(&mut self, transform: &Mat4, instance: usize) -> bool {
        let Some((offset, length)) = self.instance_range(instance) else {
            return false;
        };
        
        let start = offset * POSITION_FLOATS_PER_QUAD;
        let end = start + length * POSITION_FLOATS_PER_QUAD;
        
        let source = self.original_positions[start..end].chunks_exact(3);
        let target = self.positions[start..end].chunks_exact_mut(3);
        for (original, live) in source.zip(target) {
            let point = transform.transform_point(&Point3::new(original[0], original[1], original[2]));
            live.copy_from_slice(&[point.x, point.y, point.z]);
        }
        
        self.positions_dirty = true;
        true
    }
    
    /// `(offset, length)` of an instance in glyph quads
    pub fn instance_range(&self, instance: usize) -> Option<(usize, usize)> {
        Some((*self.instance_offsets.get(instance)?, *self.instance_lengths.get(instance)?))
    }
    
    /// Laid out instances, in batch order
    pub fn layouts(&self) -> &[TextLayout] {
        &self.layouts
    }
    
    /// Number of instances in the batch
    pub fn instance_count(&self) -> usize {
        self.layouts.len()
    }
    
    /// Total glyph quads in the batch
    pub fn glyph_count(&self) -> usize {
        self.instance_lengths.iter().sum()
    }
    
    /// Live (transformed) positions
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }
    
    /// Untransformed positions as produced by layout
    pub fn original_positions(&self) -> &[f32] {
        &self.original_positions
    }
    
    /// Texture coordinates
    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }
    
    /// Per-vertex quad centroids
    pub fn centers(&self) -> &[f32] {
        &self.centers
    }
    
    /// Triangle indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
    
    /// Live positions as raw bytes for upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }
    
    /// Return and clear the positions dirty flag
    pub fn take_positions_dirty(&mut self) -> bool {
        std::mem::take(&mut self.positions_dirty)
    }
    
    /// Bounds of the live positions, `None` for an empty batch
    pub fn bounds(&self) -> Option<TextBounds> {
        TextBounds::from_points(
            self.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0], p[1], p[2])),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::bitmap_font::fixtures::test_font;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use approx::assert_relative_eq;
    
    fn batch(texts: &[&str]) -> BatchedTextMesh {
        let font = test_font();
        let configs: Vec<TextConfig> = texts.iter().map(|t| TextConfig::new(*t)).collect();
        let mut mesh = BatchedTextMesh::new();
        mesh.update(&configs, &font, &TextEngineConfig::default()).unwrap();
        mesh
    }
    
    #[test]
    fn test_instance_ranges_skip_whitespace_quads() {
        let mesh = batch(&["ab c", "de"]);
        
        assert_eq!(mesh.instance_count(), 2);
        assert_eq!(mesh.instance_range(0), Some((0, 3)));
        assert_eq!(mesh.instance_range(1), Some((3, 2)));
        assert_eq!(mesh.instance_range(2), None);
        assert_eq!(mesh.glyph_count(), 5);
        assert_eq!(mesh.positions().len(), 5 * 12);
        assert_eq!(mesh.uvs().len(), 5 * 8);
        assert_eq!(mesh.centers().len(), 5 * 8);
        assert_eq!(mesh.indices().len(), 5 * 6);
    }
    
    #[test]
    fn test_reproject_only_touches_one_instance() {
        let mut mesh = batch(&["ab", "cd"]);
        let before = mesh.positions().to_vec();
        
        assert!(mesh.reproject_instance(&Mat4::translation_xy(100.0, 0.0), 1));
        
        let after = mesh.positions();
        assert_eq!(&after[..24], &before[..24]);
        for (moved, original) in after[24..].chunks_exact(3).zip(before[24..].chunks_exact(3)) {
            assert_relative_eq!(moved[0], original[0] + 100.0);
            assert_relative_eq!(moved[1], original[1]);
        }
    }
    
    #[test]
    fn test_reproject_reads_frozen_copy() {
        let mut mesh = batch(&["ab"]);
        let shift = Mat4::new_translation(&Vec3::new(5.0, 5.0, 5.0));
        
        mesh.reproject_instance(&shift, 0);
        mesh.reproject_instance(&shift, 0);
        
        assert_relative_eq!(mesh.positions()[0], mesh.original_positions()[0] + 5.0);
        assert_relative_eq!(mesh.positions()[2], 5.0);
    }
    
    #[test]
    fn test_reproject_unknown_instance() {
        let mut mesh = batch(&["ab"]);
        mesh.take_positions_dirty();
        
        assert!(!mesh.reproject_instance(&Mat4::identity(), 3));
        assert!(!mesh.take_positions_dirty());
    }
    
    #[test]
    fn test_bounds() {
        assert!(batch(&[]).bounds().is_none());
        
        let bounds = batch(&["ab"]).bounds().unwrap();
        assert_eq!(bounds.width(), 18.0);
        assert_eq!(bounds.height(), 8.0);
    }
    
    #[test]
    fn test_position_bytes_length() {
        let mesh = batch(&["ab"]);
        assert_eq!(mesh.position_bytes().len(), mesh.positions().len() * 4);
    }
}
