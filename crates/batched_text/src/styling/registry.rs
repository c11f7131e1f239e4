//! Routing of 2D text instances into style groups

use super::{DrawPass, StyleGroup, TextStyle};
use crate::config::TextEngineConfig;
use crate::font::GlyphMetricsTable;
use crate::foundation::collections::AnchorId;
use crate::foundation::math::Mat4;
use crate::instancing::AnchorTransforms;
use crate::layout::{LayoutResult, TextConfig};
use std::collections::HashMap;
use std::sync::Arc;

/// Handle to a 2D text instance: its group signature and key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleInstanceHandle {
    /// Signature of the owning style group
    pub signature: String,
    /// Instance key within the group
    pub key: String,
}

/// Statistics for the style registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRegistryStats {
    /// Groups currently alive
    pub active_groups: usize,
    /// Instances across all groups
    pub total_instances: usize,
    /// Groups created since creation
    pub groups_created: u64,
    /// Groups destroyed since creation
    pub groups_destroyed: u64,
    /// Group relayouts since creation
    pub relayouts: u64,
}

/// Owner of every 2D style group and the regular/bold fonts they use
pub struct TextStyleRegistry {
    regular: Arc<GlyphMetricsTable>,
    bold: Arc<GlyphMetricsTable>,
    config: TextEngineConfig,
    groups: HashMap<String, StyleGroup>,
    stats: StyleRegistryStats,
}

impl TextStyleRegistry {
    /// Create a registry over a regular and a bold font
    pub fn new(regular: Arc<GlyphMetricsTable>, bold: Arc<GlyphMetricsTable>, config: TextEngineConfig) -> Self {
        Self {
            regular,
            bold,
            config,
            groups: HashMap::new(),
            stats: StyleRegistryStats::default(),
        }
    }
    
    /// Add an instance to the group for `style`, creating the group if needed
    ///
    /// Inserting an existing key of the same style replaces that instance.
    pub fn insert(
        &mut self,
        style: TextStyle,
        key: impl Into<String>,
        config: TextConfig,
        anchor: Option<AnchorId>,
    ) -> StyleInstanceHandle {
        let key = key.into();
        let signature = style.signature();
        
        let stats = &mut self.stats;
        let group = self.groups.entry(signature.clone()).or_insert_with(|| {
            stats.groups_created += 1;
            log::info!("Created text style group '{}'", signature);
            StyleGroup::new(style)
        });
        group.insert(key.clone(), config, anchor);
        
        log::trace!("Inserted text '{}' into style group '{}'", key, signature);
        StyleInstanceHandle { signature, key }
    }
    
    /// Remove an instance; the group goes with its last instance
    ///
    /// Returns `false` for stale handles.
    pub fn remove(&mut self, handle: &StyleInstanceHandle) -> bool {
        let Some(group) = self.groups.get_mut(&handle.signature) else {
            return false;
        };
        
        if group.remove(&handle.key).is_none() {
            return false;
        }
        
        if group.is_empty() {
            self.groups.remove(&handle.signature);
            self.stats.groups_destroyed += 1;
            log::info!("Destroyed text style group '{}'", handle.signature);
        }
        
        log::trace!("Removed text '{}' from style group '{}'", handle.key, handle.signature);
        true
    }
    
    /// Set an instance's local transform
    pub fn set_transform(&mut self, handle: &StyleInstanceHandle, transform: Mat4) -> bool {
        self.groups
            .get_mut(&handle.signature)
            .is_some_and(|group| group.set_transform(&handle.key, transform))
    }
    
    /// Relayout every group whose membership changed
    ///
    /// Returns the number of groups laid out.
    pub fn relayout(&mut self) -> LayoutResult<usize> {
        let mut count = 0;
        
        for group in self.groups.values_mut() {
            let font = if group.style().is_bold() { &self.bold } else { &self.regular };
            if group.relayout(font, &self.config)? {
                count += 1;
            }
        }
        
        self.stats.relayouts += count as u64;
        Ok(count)
    }
    
    /// Place every instance for this frame; run once anchors are final
    ///
    /// Groups whose membership changed are laid out again first, so
    /// inserts and removals are visible in the same frame. Returns the
    /// number of instances placed.
    pub fn update_transforms<A: AnchorTransforms + ?Sized>(&mut self, anchors: &A) -> LayoutResult<usize> {
        self.relayout()?;
        
        let config = &self.config;
        Ok(self
            .groups
            .values_mut()
            .map(|group| group.update_transforms(anchors, config))
            .sum())
    }
    
    /// Group by signature
    pub fn group(&self, signature: &str) -> Option<&StyleGroup> {
        self.groups.get(signature)
    }
    
    /// All groups
    pub fn groups(&self) -> impl Iterator<Item = &StyleGroup> {
        self.groups.values()
    }
    
    /// All groups, mutably, for uploading and clearing dirty geometry
    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut StyleGroup> {
        self.groups.values_mut()
    }
    
    /// Draw passes of every group, keyed by signature
    pub fn draw_passes(&self) -> Vec<(&str, DrawPass)> {
        self.groups
            .values()
            .flat_map(|group| {
                group
                    .draw_passes(&self.config)
                    .into_iter()
                    .map(move |pass| (group.signature(), pass))
            })
            .collect()
    }
    
    /// Font used by a style
    pub fn font_for(&self, style: &TextStyle) -> &Arc<GlyphMetricsTable> {
        if style.is_bold() {
            &self.bold
        } else {
            &self.regular
        }
    }
    
    /// Engine configuration
    pub fn config(&self) -> &TextEngineConfig {
        &self.config
    }
    
    /// Registry statistics
    pub fn stats(&self) -> StyleRegistryStats {
        StyleRegistryStats {
            active_groups: self.groups.len(),
            total_instances: self.groups.values().map(StyleGroup::len).sum(),
            ..self.stats.clone()
        }
    }
}
