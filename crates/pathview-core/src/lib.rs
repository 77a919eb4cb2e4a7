//! # Pathview Core
//!
//! Core types, traits, and utilities for Pathview.
//! Provides the fundamental abstractions shared by the interpreter and
//! rendering crates: error taxonomy, unit management, geometry primitives,
//! and the queues through which the core talks to its hosting application.

pub mod channels;
pub mod error;
pub mod geometry;
pub mod units;

pub use channels::{CommandQueue, MessageLevel, MessageQueue, UserMessage};
pub use error::{RenderError, Result};
pub use geometry::Point3;
pub use units::Units;
