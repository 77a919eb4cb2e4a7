//! G-code text handling and interpretation
//!
//! This module provides:
//! - Text normalization (comments, spacing, float truncation)
//! - Program storage with the lazy coordinate-shift rewrite
//! - Field scanning over letter/number pairs
//! - The modal motion interpreter

pub mod interpreter;
pub mod preprocessor;
pub mod program;
pub mod scanner;
