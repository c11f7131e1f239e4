//! World transforms that text instances are attached to

use crate::foundation::collections::{AnchorId, SlotMap};
use crate::foundation::math::{Mat4, Transform};

/// Source of anchor world transforms
///
/// Anchors must be final for the frame before transforms are refreshed;
/// an anchor that cannot be resolved yields `None`.
pub trait AnchorTransforms {
    /// World matrix of an anchor
    fn world_transform(&self, anchor: AnchorId) -> Option<Mat4>;
}

/// Arena of anchor world matrices
#[derive(Debug, Clone, Default)]
pub struct AnchorSet {
    anchors: SlotMap<AnchorId, Mat4>,
}

impl AnchorSet {
    /// Create an empty anchor set
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Add an anchor with the given world matrix
    pub fn insert(&mut self, world: Mat4) -> AnchorId {
        self.anchors.insert(world)
    }
    
    /// Add an anchor placed by a transform
    pub fn insert_transform(&mut self, transform: &Transform) -> AnchorId {
        self.insert(transform.to_matrix())
    }
    
    /// Replace an anchor's world matrix, `false` if the anchor is gone
    pub fn set(&mut self, anchor: AnchorId, world: Mat4) -> bool {
        match self.anchors.get_mut(anchor) {
            Some(slot) => {
                *slot = world;
                true
            }
            None => false,
        }
    }
    
    /// Replace an anchor's world matrix from a transform
    pub fn set_transform(&mut self, anchor: AnchorId, transform: &Transform) -> bool {
        self.set(anchor, transform.to_matrix())
    }
    
    /// Remove an anchor
    pub fn remove(&mut self, anchor: AnchorId) -> Option<Mat4> {
        self.anchors.remove(anchor)
    }
    
    /// World matrix of an anchor
    pub fn get(&self, anchor: AnchorId) -> Option<&Mat4> {
        self.anchors.get(anchor)
    }
    
    /// Number of anchors
    pub fn len(&self) -> usize {
        self.anchors.len()
    }
    
    /// Whether there are no anchors
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

impl AnchorTransforms for AnchorSet {
    fn world_transform(&self, anchor: AnchorId) -> Option<Mat4> {
        self.get(anchor).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    
    #[test]
    fn test_set_and_resolve() {
        let mut anchors = AnchorSet::new();
        let id = anchors.insert(Mat4::identity());
        
        let moved = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert!(anchors.set_transform(id, &moved));
        assert_eq!(anchors.world_transform(id), Some(moved.to_matrix()));
    }
    
    #[test]
    fn test_removed_anchor_is_unresolved() {
        let mut anchors = AnchorSet::new();
        let id = anchors.insert(Mat4::identity());
        
        assert!(anchors.remove(id).is_some());
        assert!(anchors.world_transform(id).is_none());
        assert!(!anchors.set(id, Mat4::identity()));
        assert!(anchors.is_empty());
    }
}
