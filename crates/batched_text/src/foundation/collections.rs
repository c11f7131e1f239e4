//! Handle types for arena-backed collections
//!
//! All handles are generational `slotmap` keys: a removed slot's key never
//! resolves again, even after the slot is reused.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Opaque handle to one text instance inside an instanced glyph pool
    pub struct InstanceHandle;
    
    /// Handle to an anchor transform in an [`crate::instancing::AnchorSet`]
    pub struct AnchorId;
    
    /// Handle to a font registered with an [`crate::instancing::InstancedTextRegistry`]
    pub struct FontId;
}
