//! One instanced glyph pool per font
//!
//! Each font has its own data textures, so glyphs of different fonts can
//! never share a draw. The registry owns a pool per registered font and
//! routes instance operations to the pool that holds them.

use super::{
    AnchorTransforms, GlyphShiftLayout, InstancedGlyphPool, PoolError, PoolResult, PoolStats,
    TextInstance,
};
use crate::font::InstancedFontInfo;
use crate::foundation::collections::{AnchorId, FontId, InstanceHandle, SlotMap};
use crate::layout::AlignX;
use std::sync::Arc;

/// Handle to a 3D text instance held by an [`InstancedTextRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstancedTextHandle {
    /// Font pool holding the instance
    pub font: FontId,
    /// Instance within that pool
    pub instance: InstanceHandle,
}

/// Registry of per-font instanced glyph pools
#[derive(Default)]
pub struct InstancedTextRegistry {
    pools: SlotMap<FontId, InstancedGlyphPool>,
}

impl InstancedTextRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Register a font and create its (unallocated) pool
    pub fn register_font(&mut self, font: Arc<InstancedFontInfo>) -> FontId {
        let max_vertices = font.max_vertices();
        let id = self.pools.insert(InstancedGlyphPool::new(font));
        
        log::info!("Created instanced glyph pool {:?} ({} vertices per glyph)", id, max_vertices);
        id
    }
    
    /// Drop a font and every instance in its pool
    pub fn unregister_font(&mut self, font: FontId) -> Option<InstancedGlyphPool> {
        let pool = self.pools.remove(font)?;
        log::info!("Destroyed instanced glyph pool {:?} ({} instances)", font, pool.len());
        Some(pool)
    }
    
    /// Pool of a font
    pub fn pool(&self, font: FontId) -> Option<&InstancedGlyphPool> {
        self.pools.get(font)
    }
    
    /// Mutable pool of a font
    pub fn pool_mut(&mut self, font: FontId) -> Option<&mut InstancedGlyphPool> {
        self.pools.get_mut(font)
    }
    
    /// All pools with their font ids
    pub fn pools(&self) -> impl Iterator<Item = (FontId, &InstancedGlyphPool)> {
        self.pools.iter()
    }
    
    /// All pools, mutably, for uploading and clearing dirty buffers
    pub fn pools_mut(&mut self) -> impl Iterator<Item = (FontId, &mut InstancedGlyphPool)> {
        self.pools.iter_mut()
    }
    
    /// Insert text with precomputed shifts into a font's pool
    pub fn insert(
        &mut self,
        font: FontId,
        text: &str,
        rgba: [f32; 4],
        shifts: &[[f32; 2]],
        anchor: AnchorId,
    ) -> PoolResult<InstancedTextHandle> {
        let pool = self.pools.get_mut(font).ok_or(PoolError::UnknownFont)?;
        let instance = pool.insert(text, rgba, shifts, anchor)?;
        Ok(InstancedTextHandle { font, instance })
    }
    
    /// Lay out text with [`GlyphShiftLayout`] and insert it
    ///
    /// The layout is returned so callers can use its bounds for culling.
    pub fn insert_text(
        &mut self,
        font: FontId,
        text: &str,
        rgba: [f32; 4],
        align: Option<AlignX>,
        anchor: AnchorId,
    ) -> PoolResult<(InstancedTextHandle, GlyphShiftLayout)> {
        let pool = self.pools.get_mut(font).ok_or(PoolError::UnknownFont)?;
        let layout = GlyphShiftLayout::compute(text, pool.font(), align);
        let instance = pool.insert(text, rgba, &layout.shifts, anchor)?;
        Ok((InstancedTextHandle { font, instance }, layout))
    }
    
    /// Remove an instance; stale handles are ignored
    pub fn remove(&mut self, handle: InstancedTextHandle) -> Option<TextInstance> {
        self.pools.get_mut(handle.font)?.remove(handle.instance)
    }
    
    /// Set an instance's opacity, `false` for stale handles
    pub fn set_opacity(&mut self, handle: InstancedTextHandle, opacity: f32) -> bool {
        self.pools
            .get_mut(handle.font)
            .is_some_and(|pool| pool.set_opacity(handle.instance, opacity))
    }
    
    /// Replace an instance's glyphs with same-length text
    pub fn set_glyphs(&mut self, handle: InstancedTextHandle, text: &str) -> PoolResult<bool> {
        match self.pools.get_mut(handle.font) {
            Some(pool) => pool.set_glyphs(handle.instance, text),
            None => Ok(false),
        }
    }
    
    /// Instance data for a handle
    pub fn instance(&self, handle: InstancedTextHandle) -> Option<&TextInstance> {
        self.pools.get(handle.font)?.instance(handle.instance)
    }
    
    /// Refresh transforms in every pool; returns instances with missing anchors
    pub fn refresh_all<A: AnchorTransforms + ?Sized>(&mut self, anchors: &A) -> usize {
        self.pools
            .values_mut()
            .map(|pool| pool.refresh_transforms(anchors))
            .sum()
    }
    
    /// Number of registered fonts
    pub fn font_count(&self) -> usize {
        self.pools.len()
    }
    
    /// Statistics summed over every pool
    pub fn stats(&self) -> PoolStats {
        self.pools.values().map(InstancedGlyphPool::stats).fold(PoolStats::default(), |total, pool| PoolStats {
            total_inserted: total.total_inserted + pool.total_inserted,
            total_removed: total.total_removed + pool.total_removed,
            reallocations: total.reallocations + pool.reallocations,
            live_instances: total.live_instances + pool.live_instances,
            live_glyphs: total.live_glyphs + pool.live_glyphs,
            allocated_capacity: total.allocated_capacity + pool.allocated_capacity,
        })
    }
}
