//! # Pathview Visualizer
//!
//! G-code interpretation and incremental 2D toolpath rendering.
//! Includes the preprocessor, modal motion interpreter, path geometry
//! builder, batched render scheduler, and viewport transform, tied
//! together by the [`canvas::GcodeCanvas`] session object.

pub mod canvas;
pub mod gcode;
pub mod render;

pub use canvas::{CanvasSettings, GcodeCanvas};

pub use gcode::{
    interpreter::{InterpreterState, MotionCommand, MotionInterpreter, MotionMode, Positioning},
    preprocessor::{GcodePreprocessor, PreprocessorSettings},
    program::{GcodeProgram, ProgramLine},
    scanner::{scan_field, Field, ScanError},
};

pub use render::{
    path_builder::PathGeometryBuilder,
    primitives::{Color, Group, LineStyle, RenderPrimitive, Scene},
    scheduler::{BatchPlan, BatchStatus, RenderGeneration, RenderScheduler},
    viewport::ViewportController,
};
