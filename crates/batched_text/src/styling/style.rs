//! Resolved visual style of a 2D text instance

use crate::foundation::color::Color;
use serde::{Deserialize, Serialize};

/// Visual style shared by every instance of a style group
///
/// Unset fields fall back to the engine defaults when draw passes are built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Use the bold font and atlas
    pub bold: Option<bool>,
    /// Foreground color, white when unset
    pub color: Option<Color>,
    /// Foreground opacity
    pub opacity: Option<f32>,
    /// Outline width; no outline pass unless positive
    pub outline_width: Option<f32>,
    /// Outline opacity
    pub outline_opacity: Option<f32>,
    /// Outline color, black when unset
    pub outline_color: Option<Color>,
}

fn field<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl TextStyle {
    /// Set the bold flag
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }
    
    /// Set the foreground color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
    
    /// Set the foreground opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }
    
    /// Set the outline width and color
    pub fn with_outline(mut self, width: f32, color: Color) -> Self {
        self.outline_width = Some(width);
        self.outline_color = Some(color);
        self
    }
    
    /// Set the outline opacity
    pub fn with_outline_opacity(mut self, opacity: f32) -> Self {
        self.outline_opacity = Some(opacity);
        self
    }
    
    /// Whether the bold font is used
    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }
    
    /// Whether an outline pass is drawn
    pub fn has_outline(&self) -> bool {
        self.outline_width.is_some_and(|width| width > 0.0)
    }
    
    /// Deterministic group key
    ///
    /// Fields joined by `_` in the order bold, color, opacity, outline
    /// width, outline opacity, outline color. Colors are six-digit hex and
    /// unset fields are empty, so equal styles always share a key.
    pub fn signature(&self) -> String {
        [
            field(self.bold),
            field(self.color.map(|c| c.hex_string())),
            field(self.opacity),
            field(self.outline_width),
            field(self.outline_opacity),
            field(self.outline_color.map(|c| c.hex_string())),
        ]
        .join("_")
    }
}
