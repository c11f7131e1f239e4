//! Text layout engine
//!
//! Turns a string plus [`LayoutOptions`] into positioned [`GlyphRecord`]s and
//! aggregate line metrics. Layout is a pure function of the text, the options
//! and the font table: every run rebuilds the glyph sequence from scratch.

pub mod options;
pub mod word_wrap;
pub mod text_layout;

pub use options::*;
pub use word_wrap::*;
pub use text_layout::*;

/// Errors that can occur during layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Layout was requested without a font table
    #[error("Configuration error: a valid bitmap font must be provided for text layout")]
    MissingFont,
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
