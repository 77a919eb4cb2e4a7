//! Toolpath rendering
//!
//! This module provides:
//! - Render primitives and the grouped drawing surface
//! - Path geometry construction (segments, arc tessellation, depth markers)
//! - Batched render scheduling with generation-based cancellation
//! - The pan/zoom viewport transform

pub mod path_builder;
pub mod primitives;
pub mod scheduler;
pub mod viewport;
