//! GPU-facing per-glyph attribute buffers
//!
//! Plain `f32` vectors sized to the pool capacity, one slot per glyph. The
//! renderer uploads whatever [`InstanceBuffers::take_dirty`] reports and
//! reads the byte views directly.

use super::{PoolError, PoolResult};
use bitflags::bitflags;

/// Floats per glyph slot in the color buffer (RGBA)
pub const COLOR_STRIDE: usize = 4;

/// Floats per glyph slot in the transform buffer (column-major 4x4)
pub const TRANSFORM_STRIDE: usize = 16;

bitflags! {
    /// Buffers that changed since the renderer last uploaded them
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        /// Glyph index buffer
        const GLYPH_INDEX = 1 << 0;
        /// Color buffer
        const COLOR = 1 << 1;
        /// Transform buffer
        const TRANSFORM = 1 << 2;
        /// Vertex template, only after (re)allocation
        const VERTEX_TEMPLATE = 1 << 3;
    }
}

/// Live attribute buffers of one pool
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffers {
    capacity: usize,
    glyph_indices: Vec<f32>,
    colors: Vec<f32>,
    transforms: Vec<f32>,
    vertex_template: Vec<f32>,
    dirty: DirtyFlags,
}

fn zeroed(len: usize) -> PoolResult<Vec<f32>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| PoolError::AllocationFailed { requested: len })?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}

impl InstanceBuffers {
    /// Create unallocated buffers for a font whose largest glyph has `max_vertices` vertices
    pub fn new(max_vertices: usize) -> Self {
        Self {
            vertex_template: vec![0.0; max_vertices * 3],
            ..Self::default()
        }
    }
    
    /// Replace every buffer with zeroed storage for `capacity` glyph slots
    ///
    /// Existing contents are copied into the new storage up to the smaller
    /// of the two capacities.
    pub fn allocate(&mut self, capacity: usize) -> PoolResult<()> {
        let mut glyph_indices = zeroed(capacity)?;
        let mut colors = zeroed(capacity * COLOR_STRIDE)?;
        let mut transforms = zeroed(capacity * TRANSFORM_STRIDE)?;
        
        let kept = self.capacity.min(capacity);
        glyph_indices[..kept].copy_from_slice(&self.glyph_indices[..kept]);
        colors[..kept * COLOR_STRIDE].copy_from_slice(&self.colors[..kept * COLOR_STRIDE]);
        transforms[..kept * TRANSFORM_STRIDE].copy_from_slice(&self.transforms[..kept * TRANSFORM_STRIDE]);
        
        self.glyph_indices = glyph_indices;
        self.colors = colors;
        self.transforms = transforms;
        self.capacity = capacity;
        self.dirty = DirtyFlags::all();
        Ok(())
    }
    
    /// Glyph slots available
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    
    /// Write glyph indices starting at `slot`
    pub fn write_glyph_indices(&mut self, slot: usize, indices: &[f32]) {
        self.glyph_indices[slot..slot + indices.len()].copy_from_slice(indices);
        self.dirty |= DirtyFlags::GLYPH_INDEX;
    }
    
    /// Write flat RGBA colors starting at glyph `slot`
    pub fn write_colors(&mut self, slot: usize, colors: &[f32]) {
        let start = slot * COLOR_STRIDE;
        self.colors[start..start + colors.len()].copy_from_slice(colors);
        self.dirty |= DirtyFlags::COLOR;
    }
    
    /// Set the alpha of `length` glyphs starting at `slot`
    pub fn set_alpha(&mut self, slot: usize, length: usize, alpha: f32) {
        for rgba in self.colors[slot * COLOR_STRIDE..(slot + length) * COLOR_STRIDE].chunks_exact_mut(COLOR_STRIDE) {
            rgba[3] = alpha;
        }
        self.dirty |= DirtyFlags::COLOR;
    }
    
    /// Zero glyph index and color slots in `start..end`
    pub fn clear_slots(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        self.glyph_indices[start..end].fill(0.0);
        self.colors[start * COLOR_STRIDE..end * COLOR_STRIDE].fill(0.0);
        self.dirty |= DirtyFlags::GLYPH_INDEX | DirtyFlags::COLOR;
    }
    
    /// Mutable transform of one glyph slot
    pub fn transform_slot_mut(&mut self, slot: usize) -> &mut [f32] {
        &mut self.transforms[slot * TRANSFORM_STRIDE..(slot + 1) * TRANSFORM_STRIDE]
    }
    
    /// Zero the whole transform buffer
    pub fn clear_transforms(&mut self) {
        self.transforms.fill(0.0);
        self.dirty |= DirtyFlags::TRANSFORM;
    }
    
    /// Flag buffers as changed
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }
    
    /// Buffers changed since the last [`take_dirty`](Self::take_dirty)
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }
    
    /// Return and clear the dirty flags
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }
    
    /// Glyph index per slot, stored as `f32`
    pub fn glyph_indices(&self) -> &[f32] {
        &self.glyph_indices
    }
    
    /// RGBA per slot
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }
    
    /// Column-major world matrix per slot
    pub fn transforms(&self) -> &[f32] {
        &self.transforms
    }
    
    /// Zeroed per-vertex template; positions come from the font data texture
    pub fn vertex_template(&self) -> &[f32] {
        &self.vertex_template
    }
    
    /// Byte view of the glyph index buffer
    pub fn glyph_index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.glyph_indices)
    }
    
    /// Byte view of the color buffer
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
    
    /// Byte view of the transform buffer
    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }
    
    /// Byte view of the vertex template
    pub fn vertex_template_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertex_template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_new_is_unallocated() {
        let buffers = InstanceBuffers::new(24);
        
        assert_eq!(buffers.capacity(), 0);
        assert!(buffers.glyph_indices().is_empty());
        assert_eq!(buffers.vertex_template().len(), 72);
        assert!(buffers.vertex_template().iter().all(|v| *v == 0.0));
        assert!(buffers.dirty().is_empty());
    }
    
    #[test]
    fn test_allocate_sizes_and_preserves_prefix() {
        let mut buffers = InstanceBuffers::new(3);
        buffers.allocate(2).unwrap();
        buffers.write_glyph_indices(0, &[4.0, 5.0]);
        buffers.write_colors(1, &[0.1, 0.2, 0.3, 0.4]);
        buffers.transform_slot_mut(1)[15] = 1.0;
        
        buffers.allocate(6).unwrap();
        
        assert_eq!(buffers.capacity(), 6);
        assert_eq!(buffers.glyph_indices(), &[4.0, 5.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(buffers.colors().len(), 24);
        assert_eq!(&buffers.colors()[4..8], &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(buffers.transforms().len(), 96);
        assert_eq!(buffers.transforms()[31], 1.0);
        assert_eq!(buffers.take_dirty(), DirtyFlags::all());
        assert!(buffers.take_dirty().is_empty());
    }
    
    #[test]
    fn test_set_alpha_only_touches_range() {
        let mut buffers = InstanceBuffers::new(0);
        buffers.allocate(3).unwrap();
        buffers.write_colors(0, &[1.0; 12]);
        buffers.take_dirty();
        
        buffers.set_alpha(1, 1, 0.25);
        
        assert_eq!(buffers.colors()[3], 1.0);
        assert_eq!(buffers.colors()[7], 0.25);
        assert_eq!(buffers.colors()[11], 1.0);
        assert_eq!(buffers.take_dirty(), DirtyFlags::COLOR);
    }
    
    #[test]
    fn test_clear_slots_and_transforms() {
        let mut buffers = InstanceBuffers::new(0);
        buffers.allocate(2).unwrap();
        buffers.write_glyph_indices(0, &[1.0, 2.0]);
        buffers.transform_slot_mut(0).fill(3.0);
        
        buffers.clear_slots(1, 2);
        buffers.clear_transforms();
        
        assert_eq!(buffers.glyph_indices(), &[1.0, 0.0]);
        assert!(buffers.transforms().iter().all(|v| *v == 0.0));
    }
    
    #[test]
    fn test_byte_views() {
        let mut buffers = InstanceBuffers::new(2);
        buffers.allocate(2).unwrap();
        
        assert_eq!(buffers.glyph_index_bytes().len(), 8);
        assert_eq!(buffers.color_bytes().len(), 32);
        assert_eq!(buffers.transform_bytes().len(), 128);
        assert_eq!(buffers.vertex_template_bytes().len(), 24);
    }
}
