//! A batch of 2D text instances sharing one style
//!
//! All instances of a group live in one [`BatchedTextMesh`]. Membership
//! changes mark the group for relayout; the whole group is laid out again
//! together. Placement runs every frame and only rewrites positions.

use super::TextStyle;
use crate::config::TextEngineConfig;
use crate::font::GlyphMetricsTable;
use crate::foundation::collections::AnchorId;
use crate::foundation::color::Color;
use crate::foundation::math::{constants::PI, Mat4, Mat4Ext};
use crate::instancing::AnchorTransforms;
use crate::layout::{AlignX, AlignY, LayoutResult, TextConfig, TextLayout};
use crate::mesh::BatchedTextMesh;

/// One 2D text instance of a style group
#[derive(Debug, Clone)]
pub struct StyleInstance {
    /// Caller key, unique within the group
    pub key: String,
    /// Text and layout configuration
    pub config: TextConfig,
    /// Scene anchor; identity placement when `None`
    pub anchor: Option<AnchorId>,
    /// Local transform applied between the anchor and the text
    pub transform: Mat4,
}

/// Which of a group's two draws a pass is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Text body
    Foreground,
    /// Outline drawn behind the body
    Outline,
}

/// Material parameters of one draw of a style group
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPass {
    /// Foreground or outline
    pub kind: PassKind,
    /// Sample the bold font atlas
    pub bold: bool,
    /// Fill color
    pub color: Color,
    /// Fill opacity
    pub opacity: f32,
    /// Distance field offset, the outline width for outlines
    pub offset: f32,
    /// Render order; outlines sort before the foreground
    pub render_order: i32,
    /// Whether the pass writes depth
    pub depth_write: bool,
}

/// Instances sharing a style, with their batched geometry
#[derive(Debug, Clone)]
pub struct StyleGroup {
    style: TextStyle,
    signature: String,
    instances: Vec<StyleInstance>,
    mesh: BatchedTextMesh,
    needs_relayout: bool,
}

impl StyleGroup {
    /// Create an empty group for a style
    pub fn new(style: TextStyle) -> Self {
        let signature = style.signature();
        
        Self {
            style,
            signature,
            instances: Vec::new(),
            mesh: BatchedTextMesh::new(),
            needs_relayout: false,
        }
    }
    
    /// Append an instance
    ///
    /// An existing instance with the same key is replaced and the new one
    /// moves to the end of the batch. Returns `true` when a replacement
    /// happened.
    pub fn insert(&mut self, key: impl Into<String>, config: TextConfig, anchor: Option<AnchorId>) -> bool {
        let key = key.into();
        let replaced = self.remove(&key).is_some();
        
        self.instances.push(StyleInstance {
            key,
            config,
            anchor,
            transform: Mat4::identity(),
        });
        self.needs_relayout = true;
        replaced
    }
    
    /// Remove an instance by key
    pub fn remove(&mut self, key: &str) -> Option<StyleInstance> {
        let index = self.instances.iter().position(|instance| instance.key == key)?;
        self.needs_relayout = true;
        Some(self.instances.remove(index))
    }
    
    /// Set an instance's local transform, `false` for unknown keys
    pub fn set_transform(&mut self, key: &str, transform: Mat4) -> bool {
        match self.instances.iter_mut().find(|instance| instance.key == key) {
            Some(instance) => {
                instance.transform = transform;
                true
            }
            None => false,
        }
    }
    
    /// Lay out every instance again if membership changed
    ///
    /// Returns whether a relayout ran.
    pub fn relayout(&mut self, font: &GlyphMetricsTable, config: &TextEngineConfig) -> LayoutResult<bool> {
        if !self.needs_relayout {
            return Ok(false);
        }
        
        let texts: Vec<TextConfig> = self.instances.iter().map(|instance| instance.config.clone()).collect();
        self.mesh.update(&texts, font, config)?;
        self.needs_relayout = false;
        
        log::debug!("Relaid out style group '{}': {} instances", self.signature, texts.len());
        Ok(true)
    }
    
    /// Place every laid out instance in the scene
    ///
    /// Each instance's original quads are reprojected through
    /// `anchor × transform × scale(world_scale) × translate(alignment) × rotX(π)`.
    /// An anchor that cannot be resolved collapses the instance to a zero
    /// matrix. A group whose membership changed since the last
    /// [`relayout`](Self::relayout) is not placed. Returns the number of
    /// instances placed.
    pub fn update_transforms<A: AnchorTransforms + ?Sized>(
        &mut self,
        anchors: &A,
        config: &TextEngineConfig,
    ) -> usize {
        if self.needs_relayout {
            log::warn!("Style group '{}' placed before relayout; skipping", self.signature);
            return 0;
        }
        
        let mut placed = 0;
        
        for (index, instance) in self.instances.iter().enumerate() {
            let Some(layout) = self.mesh.layouts().get(index) else {
                break;
            };
            
            let anchor = match instance.anchor {
                Some(id) => anchors.world_transform(id).unwrap_or_else(|| {
                    log::warn!("Anchor {:?} of text '{}' is missing", id, instance.key);
                    Mat4::zeros()
                }),
                None => Mat4::identity(),
            };
            
            let (x_shift, y_shift) = alignment_shift(layout, &instance.config);
            let transform = anchor
                * instance.transform
                * Mat4::new_scaling(config.world_scale)
                * Mat4::translation_xy(x_shift, y_shift)
                * Mat4::rotation_x(PI);
            
            if self.mesh.reproject_instance(&transform, index) {
                placed += 1;
            }
        }
        
        placed
    }
    
    /// Draws for this group, outline first when present
    pub fn draw_passes(&self, config: &TextEngineConfig) -> Vec<DrawPass> {
        let bold = self.style.is_bold();
        let mut passes = Vec::with_capacity(2);
        
        if self.style.has_outline() {
            passes.push(DrawPass {
                kind: PassKind::Outline,
                bold,
                color: self.style.outline_color.unwrap_or(Color::BLACK),
                opacity: self.style.outline_opacity.unwrap_or(config.default_outline_opacity),
                offset: self.style.outline_width.unwrap_or(0.0),
                render_order: config.outline_render_order,
                depth_write: false,
            });
        }
        
        passes.push(DrawPass {
            kind: PassKind::Foreground,
            bold,
            color: self.style.color.unwrap_or(Color::WHITE),
            opacity: self.style.opacity.unwrap_or(config.default_opacity),
            offset: 0.0,
            render_order: config.foreground_render_order,
            depth_write: true,
        });
        
        passes
    }
    
    /// Group style
    pub fn style(&self) -> &TextStyle {
        &self.style
    }
    
    /// Group key
    pub fn signature(&self) -> &str {
        &self.signature
    }
    
    /// Instances in batch order
    pub fn instances(&self) -> &[StyleInstance] {
        &self.instances
    }
    
    /// Batched geometry
    pub fn mesh(&self) -> &BatchedTextMesh {
        &self.mesh
    }
    
    /// Batched geometry, for clearing dirty flags after upload
    pub fn mesh_mut(&mut self) -> &mut BatchedTextMesh {
        &mut self.mesh
    }
    
    /// Whether membership changed since the last relayout
    pub fn needs_relayout(&self) -> bool {
        self.needs_relayout
    }
    
    /// Number of instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }
    
    /// Whether the group has no instances
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Offset that puts a laid out block at its alignment point
fn alignment_shift(layout: &TextLayout, config: &TextConfig) -> (f32, f32) {
    let x_shift = match config.align_x {
        AlignX::Left => 0.0,
        AlignX::Center => -layout.width() / 2.0,
        AlignX::Right => -layout.width(),
    };
    
    let bottom = -layout.height() + layout.line_height() / 4.0;
    let top = layout.line_height() / 2.0;
    let extra = config.y_shift.unwrap_or(0.0);
    let y_shift = match config.align_y {
        AlignY::Top => bottom + extra,
        AlignY::Middle => (bottom + top) / 2.0 - layout.ascender() + extra,
        AlignY::Bottom => top + extra,
    };
    
    (x_shift, y_shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::bitmap_font::fixtures::test_font;
    use crate::foundation::math::Vec3;
    use crate::instancing::AnchorSet;
    use approx::assert_relative_eq;
    
    fn group_with(texts: &[(&str, TextConfig)]) -> StyleGroup {
        let mut group = StyleGroup::new(TextStyle::default());
        for (key, config) in texts {
            group.insert(*key, config.clone(), None);
        }
        group
    }
    
    #[test]
    fn test_insert_marks_relayout() {
        let mut group = group_with(&[("a", TextConfig::new("ab"))]);
        assert!(group.needs_relayout());
        
        assert_eq!(group.relayout(&test_font(), &TextEngineConfig::default()), Ok(true));
        assert!(!group.needs_relayout());
        assert_eq!(group.relayout(&test_font(), &TextEngineConfig::default()), Ok(false));
        assert_eq!(group.mesh().instance_count(), 1);
    }
    
    #[test]
    fn test_same_key_replaces_and_moves_to_end() {
        let mut group = group_with(&[("a", TextConfig::new("ab")), ("b", TextConfig::new("cd"))]);
        
        assert!(group.insert("a", TextConfig::new("xyz"), None));
        
        let keys: Vec<&str> = group.instances().iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(group.instances()[1].config.text, "xyz");
    }
    
    #[test]
    fn test_remove_and_set_transform() {
        let mut group = group_with(&[("a", TextConfig::new("ab"))]);
        
        assert!(group.set_transform("a", Mat4::new_scaling(2.0)));
        assert!(!group.set_transform("missing", Mat4::identity()));
        assert!(group.remove("missing").is_none());
        assert!(group.remove("a").is_some());
        assert!(group.is_empty());
    }
    
    #[test]
    fn test_alignment_shift() {
        let font = test_font();
        let layout = crate::layout::layout("ab", &crate::layout::LayoutOptions::with_font(&font)).unwrap();
        
        let top = alignment_shift(&layout, &TextConfig::new("ab"));
        assert_relative_eq!(top.0, 0.0);
        assert_relative_eq!(top.1, -layout.height() + 5.0);
        
        let config = TextConfig::new("ab")
            .with_align_x(AlignX::Right)
            .with_align_y(AlignY::Bottom);
        let bottom = alignment_shift(&layout, &TextConfig { y_shift: Some(1.0), ..config });
        assert_relative_eq!(bottom.0, -layout.width());
        assert_relative_eq!(bottom.1, 11.0);
        
        let middle = alignment_shift(&layout, &TextConfig::new("ab").with_align_y(AlignY::Middle));
        let expected = ((-layout.height() + 5.0) + 10.0) / 2.0 - layout.ascender();
        assert_relative_eq!(middle.1, expected);
    }
    
    #[test]
    fn test_update_transforms_places_instances() {
        let config = TextEngineConfig::default();
        let mut anchors = AnchorSet::new();
        let anchor = anchors.insert(Mat4::new_translation(&Vec3::new(3.0, 0.0, 0.0)));
        let mut group = StyleGroup::new(TextStyle::default());
        group.insert("a", TextConfig::new("a"), Some(anchor));
        group.insert("b", TextConfig::new("b"), None);
        group.relayout(&test_font(), &config).unwrap();
        
        assert_eq!(group.update_transforms(&anchors, &config), 2);
        
        let positions = group.mesh().positions();
        let original = group.mesh().original_positions();
        let layout = &group.mesh().layouts()[0];
        let y_shift = -layout.height() + layout.line_height() / 4.0;
        
        assert_relative_eq!(positions[0], 3.0 + original[0] * 0.01, epsilon = 1e-5);
        assert_relative_eq!(positions[1], (y_shift - original[1]) * 0.01, epsilon = 1e-5);
        assert_relative_eq!(positions[12], original[12] * 0.01, epsilon = 1e-5);
    }
    
    #[test]
    fn test_membership_change_blocks_placement_until_relayout() {
        let config = TextEngineConfig::default();
        let mut anchors = AnchorSet::new();
        let origin = anchors.insert(Mat4::identity());
        let far = anchors.insert(Mat4::new_translation(&Vec3::new(100.0, 0.0, 0.0)));
        let mut group = StyleGroup::new(TextStyle::default());
        group.insert("first", TextConfig::new("abcd"), Some(origin));
        group.insert("second", TextConfig::new("ef"), Some(far));
        group.relayout(&test_font(), &config).unwrap();
        group.update_transforms(&anchors, &config);
        
        group.remove("first");
        let before = group.mesh().positions().to_vec();
        
        assert_eq!(group.update_transforms(&anchors, &config), 0);
        assert_eq!(group.mesh().positions(), before.as_slice());
        
        group.relayout(&test_font(), &config).unwrap();
        assert_eq!(group.mesh().instance_count(), group.len());
        assert_eq!(group.update_transforms(&anchors, &config), 1);
        
        let original_x = group.mesh().original_positions()[0];
        assert_relative_eq!(group.mesh().positions()[0], 100.0 + original_x * 0.01, epsilon = 1e-4);
        assert_eq!(group.mesh().glyph_count(), 2);
    }
    
    #[test]
    fn test_missing_anchor_collapses_instance() {
        let config = TextEngineConfig::default();
        let mut anchors = AnchorSet::new();
        let anchor = anchors.insert(Mat4::identity());
        let mut group = StyleGroup::new(TextStyle::default());
        group.insert("a", TextConfig::new("a"), Some(anchor));
        group.relayout(&test_font(), &config).unwrap();
        anchors.remove(anchor);
        
        group.update_transforms(&anchors, &config);
        
        assert!(group.mesh().positions().iter().all(|v| *v == 0.0));
    }
    
    #[test]
    fn test_draw_passes() {
        let config = TextEngineConfig::default();
        
        let plain = StyleGroup::new(TextStyle::default()).draw_passes(&config);
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].kind, PassKind::Foreground);
        assert_eq!(plain[0].color, Color::WHITE);
        assert_eq!(plain[0].opacity, 1.0);
        assert_eq!(plain[0].render_order, 99_999);
        
        let outlined = StyleGroup::new(
            TextStyle::default()
                .with_bold(true)
                .with_outline(3.0, Color::from_hex(0x00ff00)),
        )
        .draw_passes(&config);
        assert_eq!(outlined.len(), 2);
        assert_eq!(outlined[0].kind, PassKind::Outline);
        assert_eq!(outlined[0].offset, 3.0);
        assert_eq!(outlined[0].opacity, 0.4);
        assert_eq!(outlined[0].render_order, 99_998);
        assert!(!outlined[0].depth_write);
        assert!(outlined.iter().all(|pass| pass.bold));
    }
}
