//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Colors and their hex encoding
//! - Handle types for arena-backed collections
//! - Logging utilities

pub mod math;
pub mod color;
pub mod collections;
pub mod logging;
