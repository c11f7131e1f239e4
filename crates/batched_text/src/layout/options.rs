//! Layout options and per-instance text configuration

use crate::font::GlyphMetricsTable;
use serde::{Deserialize, Serialize};

/// Horizontal alignment of lines within the widest line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignX {
    /// Flush left
    #[default]
    Left,
    /// Centered
    Center,
    /// Flush right
    Right,
}

impl AlignX {
    /// Offset applied to every glyph of a line of `line_width`
    pub fn line_offset(self, max_line_width: f32, line_width: f32) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => (max_line_width - line_width) / 2.0,
            Self::Right => max_line_width - line_width,
        }
    }
}

/// Vertical placement of a text block relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignY {
    /// Anchor at the top of the block
    #[default]
    Top,
    /// Anchor at the block's middle
    Middle,
    /// Anchor at the bottom of the block
    Bottom,
}

/// A measured span of text: `[start, end)` in char indices and its width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMeasure {
    /// First char index
    pub start: usize,
    /// One past the last char index
    pub end: usize,
    /// Pixel width of the span
    pub width: f32,
}

/// Measures how much of a span fits in an available width
///
/// Implementations walk the span left to right and stop before the first
/// glyph that would reach `width`. The returned `end - start` is the number
/// of chars that fit.
pub trait MeasureText {
    /// Measure `text[start..end]` against `width`
    fn measure(&self, text: &[char], start: usize, end: usize, width: f32) -> LineMeasure;
}

/// Options for a single layout run
#[derive(Clone, Copy)]
pub struct LayoutOptions<'a> {
    /// Font table; layout fails without one
    pub font: Option<&'a GlyphMetricsTable>,
    /// Wrap width, also the minimum block width
    pub width: Option<f32>,
    /// Line height override, defaults to the font's
    pub line_height: Option<f32>,
    /// Extra advance added after every glyph
    pub letter_spacing: f32,
    /// Tab width in space advances
    pub tab_size: f32,
    /// Horizontal alignment
    pub align_x: AlignX,
    /// Custom measurement; the font-based measure is used when `None`
    pub measure: Option<&'a dyn MeasureText>,
}

impl<'a> Default for LayoutOptions<'a> {
    fn default() -> Self {
        Self {
            font: None,
            width: None,
            line_height: None,
            letter_spacing: 0.0,
            tab_size: 4.0,
            align_x: AlignX::Left,
            measure: None,
        }
    }
}

impl std::fmt::Debug for LayoutOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("has_font", &self.font.is_some())
            .field("width", &self.width)
            .field("line_height", &self.line_height)
            .field("letter_spacing", &self.letter_spacing)
            .field("tab_size", &self.tab_size)
            .field("align_x", &self.align_x)
            .field("custom_measure", &self.measure.is_some())
            .finish()
    }
}

impl<'a> LayoutOptions<'a> {
    /// Options using `font` and defaults for everything else
    pub fn with_font(font: &'a GlyphMetricsTable) -> Self {
        Self {
            font: Some(font),
            ..Default::default()
        }
    }
    
    /// Options for a configured text instance
    pub fn from_config(config: &TextConfig, font: &'a GlyphMetricsTable, tab_size: f32) -> Self {
        Self {
            font: Some(font),
            width: config.width,
            line_height: config.line_height,
            letter_spacing: config.letter_spacing.unwrap_or(0.0),
            tab_size,
            align_x: config.align_x,
            measure: None,
        }
    }
}

/// Configuration of one 2D text instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Text to lay out
    pub text: String,
    /// Horizontal alignment
    pub align_x: AlignX,
    /// Vertical alignment
    pub align_y: AlignY,
    /// Extra advance between glyphs
    pub letter_spacing: Option<f32>,
    /// Wrap width and minimum block width
    pub width: Option<f32>,
    /// Line height override
    pub line_height: Option<f32>,
    /// Additional vertical shift applied at placement time
    pub y_shift: Option<f32>,
}

impl TextConfig {
    /// Config for `text` with default alignment
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
    
    /// Set horizontal alignment
    pub fn with_align_x(mut self, align_x: AlignX) -> Self {
        self.align_x = align_x;
        self
    }
    
    /// Set vertical alignment
    pub fn with_align_y(mut self, align_y: AlignY) -> Self {
        self.align_y = align_y;
        self
    }
    
    /// Set wrap width
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }
}
