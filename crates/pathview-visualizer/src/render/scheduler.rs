//! Batched render scheduling
//!
//! Very large programs cannot be pushed onto the drawing surface in one
//! turn without stalling the interactive surface, so rendering proceeds
//! in fixed-size batches: each `advance` turn processes one batch and
//! returns control to the hosting event loop, which re-invokes until the
//! run completes. A hard ceiling bounds the total number of rendered
//! lines; the rest of the program still executes on the machine.
//!
//! Every restart bumps a generation counter. A driver still holding a
//! token from an earlier run gets `Stale` back instead of interleaving
//! output from two runs.

use tracing::debug;

/// Hard ceiling on rendered program lines
pub const MAX_RENDERED_LINES: usize = 60_000;
/// Program lines processed per scheduling turn
pub const LINES_PER_BATCH: usize = 500;

/// Token identifying one render run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderGeneration(u64);

/// What a driver turn may do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchPlan {
    /// The token belongs to a superseded run; stop driving it
    Stale,
    /// The run has reached the end of the program or the ceiling
    Done,
    /// Process this line range, then yield
    Lines(std::ops::Range<usize>),
}

/// Outcome of one `advance` turn on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// The token belongs to a superseded run
    Stale,
    /// More lines remain; re-invoke to continue
    InProgress {
        /// Lines rendered so far in this run
        lines_rendered: usize,
    },
    /// The run is finished
    Complete,
}

/// Hands out line batches for the current render run
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    generation: u64,
    target: usize,
    cursor: usize,
    truncated: bool,
}

impl RenderScheduler {
    /// Create an idle scheduler
    pub fn new() -> Self {
        Self {
            generation: 0,
            target: 0,
            cursor: 0,
            truncated: false,
        }
    }

    /// Start a new run over `total_lines` lines, superseding any run in
    /// progress. Returns the token the driver must present on each turn.
    pub fn restart(&mut self, total_lines: usize) -> RenderGeneration {
        self.generation += 1;
        self.cursor = 0;
        self.truncated = total_lines > MAX_RENDERED_LINES;
        self.target = total_lines.min(MAX_RENDERED_LINES);
        debug!(
            generation = self.generation,
            total_lines,
            target = self.target,
            truncated = self.truncated,
            "render run restarted"
        );
        RenderGeneration(self.generation)
    }

    /// Token of the current run
    pub fn current_generation(&self) -> RenderGeneration {
        RenderGeneration(self.generation)
    }

    /// Check whether a token still refers to the current run
    pub fn is_current(&self, generation: RenderGeneration) -> bool {
        generation.0 == self.generation
    }

    /// Whether the current run renders only a prefix of the program
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    /// Whether every line of the current run has been handed out
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.target
    }

    /// Lines handed out so far in the current run
    pub fn lines_rendered(&self) -> usize {
        self.cursor
    }

    /// Plan the next driver turn for the run identified by `generation`
    pub fn next_batch(&mut self, generation: RenderGeneration) -> BatchPlan {
        if !self.is_current(generation) {
            return BatchPlan::Stale;
        }
        if self.is_complete() {
            return BatchPlan::Done;
        }
        let start = self.cursor;
        let end = (start + LINES_PER_BATCH).min(self.target);
        self.cursor = end;
        BatchPlan::Lines(start..end)
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new()
    }
}
