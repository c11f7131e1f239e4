//! Per-frame transform refresh
//!
//! Anchors move every frame, so every live glyph's world transform is
//! recomputed once per frame. The update must run after all anchors have
//! their final transforms for the frame and before instance buffers are
//! submitted; running it earlier draws last frame's positions.

use super::{AnchorTransforms, InstancedTextRegistry};

/// Statistics for the frame transform updater
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameUpdateStats {
    /// Frames processed
    pub frames: u64,
    /// Glyph transforms written in the last frame
    pub last_glyphs_updated: usize,
    /// Instances whose anchor was missing in the last frame
    pub last_missing_anchors: usize,
    /// Missing anchors summed over every frame
    pub total_missing_anchors: u64,
}

/// Drives [`InstancedTextRegistry::refresh_all`] once per frame
#[derive(Debug, Default)]
pub struct FrameTransformUpdater {
    stats: FrameUpdateStats,
}

impl FrameTransformUpdater {
    /// Create a new updater
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Refresh every pool for the current frame
    ///
    /// Returns the number of glyph transforms written.
    pub fn tick<A: AnchorTransforms + ?Sized>(&mut self, registry: &mut InstancedTextRegistry, anchors: &A) -> usize {
        let missing = registry.refresh_all(anchors);
        let glyphs = registry.stats().live_glyphs;
        
        self.stats.frames += 1;
        self.stats.last_glyphs_updated = glyphs;
        self.stats.last_missing_anchors = missing;
        self.stats.total_missing_anchors += missing as u64;
        
        if missing > 0 {
            log::debug!("Frame {}: {} text instances without anchors", self.stats.frames, missing);
        }
        glyphs
    }
    
    /// Updater statistics
    pub fn stats(&self) -> &FrameUpdateStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::instanced_font::fixtures::instanced_font;
    use crate::foundation::math::{Mat4, Vec3};
    use crate::instancing::{AnchorSet, DirtyFlags};
    use std::sync::Arc;
    
    #[test]
    fn test_tick_follows_moving_anchor() {
        let mut anchors = AnchorSet::new();
        let anchor = anchors.insert(Mat4::identity());
        let mut registry = InstancedTextRegistry::new();
        let font = registry.register_font(Arc::new(instanced_font()));
        let (handle, _) = registry.insert_text(font, "ab", [1.0; 4], None, anchor).unwrap();
        let mut updater = FrameTransformUpdater::new();
        
        assert_eq!(updater.tick(&mut registry, &anchors), 2);
        
        anchors.set(anchor, Mat4::new_translation(&Vec3::new(0.0, 7.0, 0.0)));
        updater.tick(&mut registry, &anchors);
        
        let pool = registry.pool_mut(handle.font).unwrap();
        assert_eq!(pool.buffers().transforms()[13], 7.0);
        assert!(pool.buffers_mut().take_dirty().contains(DirtyFlags::TRANSFORM));
        assert_eq!(updater.stats().frames, 2);
        assert_eq!(updater.stats().last_missing_anchors, 0);
    }
    
    #[test]
    fn test_missing_anchor_statistics() {
        let mut anchors = AnchorSet::new();
        let anchor = anchors.insert(Mat4::identity());
        let mut registry = InstancedTextRegistry::new();
        let font = registry.register_font(Arc::new(instanced_font()));
        registry.insert_text(font, "a", [1.0; 4], None, anchor).unwrap();
        anchors.remove(anchor);
        let mut updater = FrameTransformUpdater::new();
        
        updater.tick(&mut registry, &anchors);
        updater.tick(&mut registry, &anchors);
        
        assert_eq!(updater.stats().last_missing_anchors, 1);
        assert_eq!(updater.stats().total_missing_anchors, 2);
    }
}
