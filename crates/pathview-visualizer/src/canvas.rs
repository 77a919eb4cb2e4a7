//! The G-code canvas session
//!
//! [`GcodeCanvas`] owns one complete interpretation/rendering session:
//! program storage, interpreter, geometry builder, render scheduler,
//! scene, and viewport, plus the queues it shares with the hosting
//! application. All session state is rebuilt by [`GcodeCanvas::reload`];
//! nothing lives in process-wide globals.

use anyhow::Context;
use glam::DVec2;
use pathview_core::{
    CommandQueue, MessageLevel, MessageQueue, RenderError, Units,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::gcode::interpreter::MotionInterpreter;
use crate::gcode::preprocessor::{GcodePreprocessor, PreprocessorSettings};
use crate::gcode::program::GcodeProgram;
use crate::render::path_builder::PathGeometryBuilder;
use crate::render::primitives::{Color, Group, LineStyle, RenderPrimitive, Scene};
use crate::render::scheduler::{
    BatchPlan, BatchStatus, RenderGeneration, RenderScheduler, MAX_RENDERED_LINES,
};
use crate::render::viewport::ViewportController;

/// Radius of user-placed marks
const MARK_RADIUS: f64 = 2.0;

/// Session configuration provided by the hosting application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Path of the active G-code program; empty means no file loaded
    pub gcode_file: String,
    /// Persistent 2D offset applied to all X/Y fields
    pub shift: DVec2,
    /// Unit system active at the start of a program
    pub units: Units,
    /// Depth-change tolerance in millimeters
    pub depth_tolerance: f64,
    /// Truncate long float literals while normalizing
    pub truncate_floats: bool,
    /// Fractional digits kept when truncating
    pub float_digits: u8,
    /// Workspace width in millimeters
    pub bed_width: f64,
    /// Workspace height in millimeters
    pub bed_height: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            gcode_file: String::new(),
            shift: DVec2::ZERO,
            units: Units::Mm,
            depth_tolerance: 0.05,
            truncate_floats: false,
            float_digits: 4,
            bed_width: 2438.4,
            bed_height: 1219.2,
        }
    }
}

impl CanvasSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing settings from {}", path.display()))
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("writing settings to {}", path.display()))
    }
}

/// One interpretation/rendering session over a G-code program
#[derive(Debug)]
pub struct GcodeCanvas {
    settings: CanvasSettings,
    program: GcodeProgram,
    interpreter: MotionInterpreter,
    builder: PathGeometryBuilder,
    scheduler: RenderScheduler,
    scene: Scene,
    viewport: ViewportController,
    messages: MessageQueue,
    commands: CommandQueue,
}

impl GcodeCanvas {
    /// Create a session with the given settings. The workspace boundary
    /// and axis lines are drawn immediately.
    pub fn new(settings: CanvasSettings) -> Self {
        let mut canvas = Self {
            interpreter: MotionInterpreter::new(settings.shift, settings.units),
            builder: PathGeometryBuilder::new(settings.depth_tolerance),
            settings,
            program: GcodeProgram::empty(),
            scheduler: RenderScheduler::new(),
            scene: Scene::new(),
            viewport: ViewportController::new(),
            messages: MessageQueue::new(),
            commands: CommandQueue::new(),
        };
        canvas.draw_workspace();
        canvas
    }

    /// Current settings
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    /// Handle to the user-facing message queue
    pub fn messages(&self) -> MessageQueue {
        self.messages.clone()
    }

    /// Handle to the outbound command queue
    pub fn commands(&self) -> CommandQueue {
        self.commands.clone()
    }

    /// The drawing surface
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The loaded program
    pub fn program(&self) -> &GcodeProgram {
        &self.program
    }

    /// Line indices where the depth changes, for depth navigation
    pub fn z_moves(&self) -> &[usize] {
        self.program.z_moves()
    }

    /// Lines rendered in the current run
    pub fn lines_rendered(&self) -> usize {
        self.scheduler.lines_rendered()
    }

    /// The viewport transform
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Mutable access for zoom/pan gestures
    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    /// Re-center the viewport on the given viewport bounds
    pub fn center_view(&mut self, viewport_width: f64, viewport_height: f64) {
        self.viewport.center_view(viewport_width, viewport_height);
    }

    /// Switch the active file and reload
    pub fn set_gcode_file(&mut self, path: impl Into<String>) -> RenderGeneration {
        self.settings.gcode_file = path.into();
        self.reload()
    }

    /// Change the persistent coordinate shift and reload
    pub fn set_shift(&mut self, shift: DVec2) -> RenderGeneration {
        self.settings.shift = shift;
        self.reload()
    }

    /// Reload the program from the active file.
    ///
    /// An unreadable file is a recoverable condition: the user is
    /// notified, the active file reference is cleared, and the session
    /// continues with an empty program.
    pub fn reload(&mut self) -> RenderGeneration {
        let path = self.settings.gcode_file.clone();
        let raw = if path.is_empty() {
            String::new()
        } else {
            match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(io_err) => {
                    let err = RenderError::FileAccess {
                        path: path.clone(),
                        reason: io_err.to_string(),
                    };
                    warn!(error = %err, "G-code reload failed");
                    self.messages.push(
                        MessageLevel::Error,
                        "Cannot reopen G-code file. It may have been moved or deleted. \
                         To locate it or open a different file use Actions > Open G-code",
                    );
                    self.settings.gcode_file.clear();
                    String::new()
                }
            }
        };
        self.load_program_text(&raw)
    }

    /// Load a program directly from text, bypassing the filesystem.
    /// Useful for editors and test drivers; follows the same pipeline as
    /// [`GcodeCanvas::reload`].
    pub fn reload_from_str(&mut self, raw: &str) -> RenderGeneration {
        self.load_program_text(raw)
    }

    fn load_program_text(&mut self, raw: &str) -> RenderGeneration {
        let preprocessor = GcodePreprocessor::new(PreprocessorSettings {
            truncate: self.settings.truncate_floats,
            digits: self.settings.float_digits,
        });
        let lines = preprocessor.normalize(raw);
        debug!(lines = lines.len(), "program normalized");
        self.program = GcodeProgram::from_lines(lines, self.settings.depth_tolerance);

        self.scene.clear_group(Group::Program);
        self.scene.clear_group(Group::Highlight);
        self.interpreter.reset(self.settings.shift, self.settings.units);
        self.builder.reset(self.settings.depth_tolerance);

        let generation = self.scheduler.restart(self.program.len());
        if self.scheduler.was_truncated() {
            let total = self.program.len();
            let err = RenderError::OversizeProgram {
                total_lines: total,
                limit: MAX_RENDERED_LINES,
            };
            warn!(error = %err, "rendering a prefix of the program");
            self.messages.push(
                MessageLevel::Warning,
                format!(
                    "The current file contains {total} lines of G-code. Rendering all \
                     {total} lines at once may stall the display, so only the first \
                     {MAX_RENDERED_LINES} lines are shown. The complete program will \
                     still run if you choose to do so."
                ),
            );
        }
        generation
    }

    /// Process one batch of the render run identified by `generation`.
    ///
    /// Returns `Stale` for superseded runs so a driver holding an old
    /// token stops instead of interleaving output with the new run.
    pub fn advance(&mut self, generation: RenderGeneration) -> BatchStatus {
        match self.scheduler.next_batch(generation) {
            BatchPlan::Stale => BatchStatus::Stale,
            BatchPlan::Done => BatchStatus::Complete,
            BatchPlan::Lines(range) => {
                for _ in range {
                    let Some(commands) = self.interpreter.interpret_next(&mut self.program) else {
                        break;
                    };
                    for command in &commands {
                        self.builder.apply(&mut self.scene, command);
                    }
                    self.builder.record_endpoint(self.interpreter.state().position);
                }
                if self.scheduler.is_complete() {
                    self.builder.finish(&mut self.scene);
                    BatchStatus::Complete
                } else {
                    BatchStatus::InProgress {
                        lines_rendered: self.scheduler.lines_rendered(),
                    }
                }
            }
        }
    }

    /// Drive the run identified by `generation` to completion. Intended
    /// for synchronous drivers and tests; interactive hosts should call
    /// [`GcodeCanvas::advance`] once per event-loop turn instead.
    pub fn render_all(&mut self, generation: RenderGeneration) -> BatchStatus {
        loop {
            match self.advance(generation) {
                BatchStatus::InProgress { .. } => continue,
                status => return status,
            }
        }
    }

    /// Highlight the motion of the line after `index`, clearing any
    /// previous highlight.
    pub fn highlight_line(&mut self, index: usize) {
        self.scene.clear_group(Group::Highlight);
        let endpoints = self.builder.line_endpoints();
        let (Some(from), Some(to)) = (endpoints.get(index), endpoints.get(index + 1)) else {
            return;
        };
        self.scene.push(
            Group::Highlight,
            RenderPrimitive::Segment {
                start: from.xy(),
                end: to.xy(),
                style: LineStyle::Solid,
                color: Color::GREEN,
            },
        );
    }

    /// Queue a move of the machine to a point clicked on screen
    pub fn move_to_point(&mut self, screen: DVec2) {
        let units = self.interpreter.state().units;
        let workspace = self.viewport.screen_to_workspace(screen, units);
        self.commands
            .push(format!("G0 X{:.3} Y{:.3} ", workspace.x, workspace.y));
    }

    /// Place a mark at a point clicked on screen; returns the workspace
    /// coordinates of the mark.
    pub fn mark_point(&mut self, screen: DVec2) -> DVec2 {
        let units = self.interpreter.state().units;
        let workspace = self.viewport.screen_to_workspace(screen, units);
        self.scene.push(
            Group::Marker,
            RenderPrimitive::MarkerCircle {
                center: workspace,
                radius: MARK_RADIUS,
                color: Color::GREEN,
            },
        );
        workspace
    }

    /// Queue the command sequence that returns the machine to the
    /// workspace center: absolute mode, a safe retract, then the origin.
    pub fn return_to_center(&mut self) {
        self.commands.push("G90  ");
        match self.interpreter.state().units {
            Units::Inches => self.commands.push("G00 Z.25 "),
            Units::Mm => self.commands.push("G00 Z5.0 "),
        }
        self.commands.push("G00 X0.0 Y0.0 ");
    }

    /// Interpreter state (position, units, addressing mode)
    pub fn interpreter_state(&self) -> &crate::gcode::interpreter::InterpreterState {
        self.interpreter.state()
    }

    fn draw_workspace(&mut self) {
        self.scene.clear_group(Group::Workspace);
        let half_width = self.settings.bed_width / 2.0;
        let half_height = self.settings.bed_height / 2.0;

        let corners = [
            (
                DVec2::new(-half_width, -half_height),
                DVec2::new(half_width, -half_height),
            ),
            (
                DVec2::new(-half_width, half_height),
                DVec2::new(half_width, half_height),
            ),
            (
                DVec2::new(-half_width, -half_height),
                DVec2::new(-half_width, half_height),
            ),
            (
                DVec2::new(half_width, -half_height),
                DVec2::new(half_width, half_height),
            ),
        ];
        for (start, end) in corners {
            self.scene.push(
                Group::Workspace,
                RenderPrimitive::Segment {
                    start,
                    end,
                    style: LineStyle::Solid,
                    color: Color::DRAW,
                },
            );
        }

        // Center axis lines
        for (start, end) in [
            (DVec2::new(-half_width, 0.0), DVec2::new(half_width, 0.0)),
            (DVec2::new(0.0, -half_height), DVec2::new(0.0, half_height)),
        ] {
            self.scene.push(
                Group::Workspace,
                RenderPrimitive::Segment {
                    start,
                    end,
                    style: LineStyle::Dashed,
                    color: Color::DRAW,
                },
            );
        }
    }
}

impl Default for GcodeCanvas {
    fn default() -> Self {
        Self::new(CanvasSettings::default())
    }
}
