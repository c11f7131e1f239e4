//! Quad geometry for the 2D batched text path
//!
//! - [`build_quads`]: one quad per visible glyph (positions, UVs, centers)
//! - [`BatchedTextMesh`]: many laid out instances concatenated into shared
//!   buffers, each re-projectable through its own transform
//! - [`TextBounds`]: axis-aligned bounds used for culling and picking

pub mod bounds;
pub mod quad_builder;
pub mod batched_mesh;

pub use bounds::*;
pub use quad_builder::*;
pub use batched_mesh::*;
