//! Error handling for Pathview
//!
//! Provides the error taxonomy for the interpretation and rendering
//! pipeline. Every variant except `Other` is recoverable: the component
//! that detects it handles it locally (skip, log, notify) and processing
//! continues. Only genuinely unexpected defects surface through `Other`.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Error type for the G-code interpretation and rendering pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The active G-code file is missing or unreadable
    #[error("cannot open G-code file '{path}': {reason}")]
    FileAccess {
        /// Path of the file that could not be read.
        path: String,
        /// The underlying I/O failure.
        reason: String,
    },

    /// A single line's numeric field could not be parsed
    #[error("cannot parse line {line_number}: {reason}")]
    LineParse {
        /// 1-based line number of the offending line.
        line_number: usize,
        /// What failed to parse.
        reason: String,
    },

    /// A recognized but unimplemented G-code (e.g. a plane other than XY)
    #[error("unsupported G-code at line {line_number}: {code}")]
    UnsupportedCode {
        /// 1-based line number where the code appeared.
        line_number: usize,
        /// The offending code word.
        code: String,
    },

    /// The loaded program exceeds the render ceiling
    #[error("program has {total_lines} lines, only the first {limit} are rendered")]
    OversizeProgram {
        /// Total line count of the loaded program.
        total_lines: usize,
        /// The render ceiling.
        limit: usize,
    },

    /// Generic error for unexpected defects
    #[error("{0}")]
    Other(String),
}

impl RenderError {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        RenderError::Other(msg.into())
    }

    /// Check whether this error is handled locally by the pipeline.
    ///
    /// Recoverable errors never terminate the hosting process; they are
    /// logged (and surfaced to the user where the taxonomy calls for it)
    /// and processing continues.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RenderError::Other(_))
    }
}

/// Result type using RenderError
pub type Result<T> = std::result::Result<T, RenderError>;
