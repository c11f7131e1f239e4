//! Font metric tables
//!
//! Two font descriptions feed the pipeline:
//! - [`GlyphMetricsTable`]: BMFont-style atlas metrics for the 2D MSDF path
//! - [`InstancedFontInfo`]: per-glyph advances and vertex budgets for the 3D
//!   instanced path, whose glyph geometry lives in data textures

pub mod bitmap_font;
pub mod instanced_font;

pub use bitmap_font::*;
pub use instanced_font::*;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while loading font descriptors
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to read the descriptor file
    #[error("Failed to read font descriptor '{path}': {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },
    
    /// Descriptor is not valid JSON for the expected format
    #[error("Failed to parse font descriptor: {0}")]
    Parse(#[from] serde_json::Error),
    
    /// Descriptor parsed but its contents are unusable
    #[error("Invalid font descriptor: {0}")]
    Invalid(String),
}

pub(crate) fn read_descriptor(path: &std::path::Path) -> FontResult<String> {
    std::fs::read_to_string(path).map_err(|source| FontError::Io {
        path: path.display().to_string(),
        source,
    })
}
