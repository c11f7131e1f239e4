//! Per-glyph offsets for 3D text
//!
//! The 3D path has no wrapping or kerning: characters advance by their font
//! advance, `\n` starts a new line, and the whole block is aligned against
//! its widest line.

use crate::font::InstancedFontInfo;
use crate::foundation::math::{Point3, Vec3};
use crate::layout::AlignX;
use crate::mesh::TextBounds;

/// Shift pairs and local bounds for one 3D string
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphShiftLayout {
    /// `(x, y)` offset per character, in scene units before anchor scaling
    pub shifts: Vec<[f32; 2]>,
    /// Width of the widest line
    pub width: f32,
    /// Local bounds, depth spanning the unit extrusion
    pub bounds: TextBounds,
}

impl GlyphShiftLayout {
    /// Lay out `text` in `font`
    ///
    /// With an alignment, glyphs are moved left by 0, half or all of the
    /// widest line and centered vertically on the anchor. Without one, the
    /// raw pen positions are kept. Newline characters keep a zero shift.
    pub fn compute(text: &str, font: &InstancedFontInfo, align: Option<AlignX>) -> Self {
        let font_scale = font.font_scale();
        let line_height = font.line_height();
        
        let mut shifts = Vec::with_capacity(text.len());
        let mut newline = Vec::with_capacity(text.len());
        let mut line_widths = Vec::new();
        let (mut x, mut y) = (0.0_f32, 0.0_f32);
        
        for ch in text.chars() {
            if ch == '\n' {
                line_widths.push(x);
                x = 0.0;
                y -= line_height;
                shifts.push([0.0, 0.0]);
                newline.push(true);
            } else {
                shifts.push([x, y]);
                newline.push(false);
                x += font.advance(ch) * font_scale;
            }
        }
        line_widths.push(x);
        
        let width = line_widths.iter().copied().fold(0.0_f32, f32::max);
        let offset = align.map(|align| {
            let x = match align {
                AlignX::Left => 0.0,
                AlignX::Center => -width / 2.0,
                AlignX::Right => -width,
            };
            Vec3::new(x, font.vertical_center_shift(), 0.0)
        });
        
        if let Some(offset) = offset {
            for (shift, _) in shifts.iter_mut().zip(&newline).filter(|(_, is_newline)| !**is_newline) {
                shift[0] += offset.x;
                shift[1] += offset.y;
            }
        }
        
        let bbox = font.bounding_box();
        let bounds = TextBounds::from_corners(
            Point3::new(0.0, bbox.y_min * font_scale, 0.0),
            Point3::new(width, bbox.y_max * font_scale, 1.0),
        );
        
        Self {
            shifts,
            width,
            bounds: offset.map_or(bounds, |offset| bounds.translated(offset)),
        }
    }
    
    /// Anchor scale for a font size, extrusion thickness and extra scale
    pub fn anchor_scale(font_size: f32, thickness: f32, scale: Vec3) -> Vec3 {
        Vec3::new(font_size * scale.x, font_size * scale.y, thickness * scale.z)
    }
}
