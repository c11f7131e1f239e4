//! Instanced glyph pools for the 3D text path
//!
//! Every glyph of every 3D text instance occupies one slot in a small set of
//! flat attribute buffers (glyph index, RGBA color, world transform). A
//! vertex shader expands each slot into the glyph outline baked in the font's
//! data textures, so any number of labels renders in one draw per font.
//!
//! # Architecture
//!
//! - [`InstanceBuffers`]: the live GPU-facing buffers with dirty tracking
//! - [`InstancedGlyphPool`]: arena of `(start, length)` instances over those
//!   buffers, with doubling growth and compaction on removal
//! - [`InstancedTextRegistry`]: one pool per registered font
//! - [`AnchorSet`]: world transforms the instances are attached to
//! - [`FrameTransformUpdater`]: per-frame transform refresh driver
//! - [`GlyphShiftLayout`]: per-glyph offsets for a string in a 3D font
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut anchors = AnchorSet::new();
//! let mut pool = InstancedGlyphPool::new(Arc::new(font));
//!
//! let anchor = anchors.insert(Mat4::identity());
//! let layout = GlyphShiftLayout::compute("Hello", pool.font(), Some(AlignX::Center));
//! let handle = pool.insert("Hello", Color::WHITE.to_rgba(1.0), &layout.shifts, anchor)?;
//!
//! // Every frame, once anchors are final
//! pool.refresh_transforms(&anchors);
//! ```

pub mod anchor;
pub mod buffers;
pub mod frame_updater;
pub mod pool;
pub mod registry;
pub mod shift_layout;

pub use anchor::*;
pub use buffers::*;
pub use frame_updater::*;
pub use pool::*;
pub use registry::*;
pub use shift_layout::*;

use thiserror::Error;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors raised by instanced glyph pools
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Growing the attribute buffers failed
    #[error("Failed to allocate instance buffers for {requested} glyph slots")]
    AllocationFailed {
        /// Glyph slots requested
        requested: usize,
    },
    
    /// Shift pairs did not match the character count of the text
    #[error("Expected {glyphs} shift pairs, got {shifts}")]
    ShiftCountMismatch {
        /// Characters in the text
        glyphs: usize,
        /// Shift pairs supplied
        shifts: usize,
    },
    
    /// Replacement text had a different character count than the instance
    #[error("Instance holds {expected} glyphs, replacement has {actual}")]
    GlyphCountMismatch {
        /// Glyphs held by the instance
        expected: usize,
        /// Characters in the replacement text
        actual: usize,
    },
    
    /// No pool is registered for the font
    #[error("No pool registered for font")]
    UnknownFont,
}
