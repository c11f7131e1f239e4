//! # Batched Text
//!
//! Text rendering support for real-time 3D scenes where thousands of labels
//! have to share a handful of draw calls.
//!
//! ## Features
//!
//! - **Text Layout**: word wrap, alignment, kerning and multi-line metrics
//!   over BMFont-style glyph tables
//! - **2D Batching**: labels with the same style share one quad mesh;
//!   each label is placed per frame by reprojecting its quads
//! - **3D Instancing**: one glyph slot per character in growable attribute
//!   buffers, with compaction on removal and per-frame transform refresh
//! - **Configuration**: TOML/RON engine settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batched_text::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TextEngineConfig::load_from_file("text.toml").unwrap_or_default();
//!     batched_text::foundation::logging::init_from_config(&config);
//!
//!     // 2D labels
//!     let regular = Arc::new(GlyphMetricsTable::from_file("fonts/regular.json")?);
//!     let bold = Arc::new(GlyphMetricsTable::from_file("fonts/bold.json")?);
//!     let mut labels = TextStyleRegistry::new(regular, bold, config.clone());
//!     let mut anchors = AnchorSet::new();
//!
//!     let anchor = anchors.insert(Mat4::identity());
//!     labels.insert(TextStyle::default(), "title", TextConfig::new("Hello"), Some(anchor));
//!
//!     // 3D labels
//!     let mut pools = InstancedTextRegistry::new();
//!     let font = pools.register_font(Arc::new(InstancedFontInfo::from_file("fonts/3d.json")?));
//!     pools.insert_text(font, "World", Color::WHITE.to_rgba(1.0), Some(AlignX::Center), anchor)?;
//!
//!     // Every frame, once anchors are final
//!     let mut updater = FrameTransformUpdater::new();
//!     labels.update_transforms(&anchors)?;
//!     updater.tick(&mut pools, &anchors);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod font;
pub mod foundation;
pub mod instancing;
pub mod layout;
pub mod mesh;
pub mod styling;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, TextEngineConfig},
        font::{FontError, GlyphMetricsTable, InstancedFontInfo},
        foundation::{
            collections::{AnchorId, FontId, InstanceHandle},
            color::Color,
            math::{Mat4, Transform, Vec3},
        },
        instancing::{
            AnchorSet, AnchorTransforms, FrameTransformUpdater, GlyphShiftLayout, InstancedGlyphPool,
            InstancedTextHandle, InstancedTextRegistry, PoolError,
        },
        layout::{layout, AlignX, AlignY, LayoutError, LayoutOptions, TextConfig, TextLayout},
        mesh::{BatchedTextMesh, TextBounds},
        styling::{StyleInstanceHandle, TextStyle, TextStyleRegistry},
    };
}
