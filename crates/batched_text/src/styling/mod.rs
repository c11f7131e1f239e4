//! Style-grouped batching for the 2D text path
//!
//! 2D labels that resolve to the same [`TextStyle`] share one
//! [`BatchedTextMesh`](crate::mesh::BatchedTextMesh) and one set of draw
//! passes. Groups are keyed by the style signature, created on first insert
//! and dropped with their last instance.
//!
//! # Frame order
//!
//! 1. Insert/remove instances and set their local transforms
//! 2. [`TextStyleRegistry::update_transforms`] once anchors are final; it
//!    relays out groups whose membership changed before placing them
//! 3. Upload dirty positions and draw each group's passes

pub mod registry;
pub mod style;
pub mod style_group;

pub use registry::*;
pub use style::*;
pub use style_group::*;
