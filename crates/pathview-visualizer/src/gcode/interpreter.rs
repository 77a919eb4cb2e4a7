//! Modal motion interpreter
//!
//! Walks the normalized program one line per call, tracking the modal
//! state G-code requires: the sticky motion mode, the unit system, and
//! absolute/incremental positioning. Lines that omit a motion word reuse
//! the last one; lines that pack several `G` words are split and
//! interpreted in order.

use glam::DVec2;
use pathview_core::{Point3, RenderError, Units};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::program::GcodeProgram;
use super::scanner::scan_field;

/// Sticky motion mode (modal group 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionMode {
    /// Rapid positioning (G00)
    Rapid,
    /// Linear interpolation (G01)
    Linear,
    /// Clockwise arc (G02)
    ArcCw,
    /// Counter-clockwise arc (G03)
    ArcCcw,
}

impl MotionMode {
    /// The canonical command word for this mode
    pub fn word(self) -> &'static str {
        match self {
            MotionMode::Rapid => "G00",
            MotionMode::Linear => "G01",
            MotionMode::ArcCw => "G02",
            MotionMode::ArcCcw => "G03",
        }
    }

    fn from_candidate(candidate: &str) -> Option<Self> {
        match candidate {
            "G00" | "G0 " => Some(MotionMode::Rapid),
            "G01" | "G1 " => Some(MotionMode::Linear),
            "G02" | "G2 " => Some(MotionMode::ArcCw),
            "G03" | "G3 " => Some(MotionMode::ArcCcw),
            _ => None,
        }
    }
}

impl Default for MotionMode {
    fn default() -> Self {
        MotionMode::Rapid
    }
}

/// Absolute vs. incremental addressing (modal group 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Positioning {
    /// Coordinates are absolute workspace positions (G90)
    Absolute,
    /// Coordinates are offsets from the current position (G91)
    Incremental,
}

impl Default for Positioning {
    fn default() -> Self {
        Positioning::Absolute
    }
}

/// Interpreter state, rebuilt from scratch on every program load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpreterState {
    /// Endpoint of the last successfully interpreted motion command
    pub position: Point3,
    /// Active unit system
    pub units: Units,
    /// Active addressing mode
    pub positioning: Positioning,
    /// Sticky motion mode reused by lines without a motion word
    pub motion_mode: MotionMode,
    /// Index of the next line to interpret
    pub cursor: usize,
    /// Fragments dropped by the skip-and-log policy
    pub skipped_fragments: usize,
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self {
            position: Point3::default(),
            units: Units::default(),
            positioning: Positioning::default(),
            motion_mode: MotionMode::default(),
            cursor: 0,
            skipped_fragments: 0,
        }
    }
}

/// One interpreted command, built and consumed immediately
#[derive(Debug, Clone, PartialEq)]
pub enum MotionCommand {
    /// Non-cutting positioning move (G00)
    Rapid {
        /// Position before the move
        from: Point3,
        /// Target position
        target: Point3,
    },
    /// Cutting move (G01)
    Linear {
        /// Position before the move
        from: Point3,
        /// Target position
        target: Point3,
    },
    /// Clockwise circular move (G02)
    ArcCw {
        /// Position before the move
        from: Point3,
        /// Target position
        target: Point3,
        /// Arc center relative to `from`
        center_offset: DVec2,
    },
    /// Counter-clockwise circular move (G03)
    ArcCcw {
        /// Position before the move
        from: Point3,
        /// Target position
        target: Point3,
        /// Arc center relative to `from`
        center_offset: DVec2,
    },
    /// Unit system switch (G20/G21)
    UnitChange(Units),
    /// Addressing mode switch (G90/G91)
    ModeChange(Positioning),
    /// Recognized command with no effect (G17)
    NoOp,
    /// Anything else; ignored
    Unrecognized,
}

/// Stateful scanner over the program line sequence
#[derive(Debug, Clone, Default)]
pub struct MotionInterpreter {
    state: InterpreterState,
    shift: DVec2,
}

impl MotionInterpreter {
    /// Create an interpreter with the given persistent coordinate shift
    /// and starting unit system.
    pub fn new(shift: DVec2, units: Units) -> Self {
        let mut interpreter = Self {
            state: InterpreterState::default(),
            shift,
        };
        interpreter.reset(shift, units);
        interpreter
    }

    /// Reset to initial state, with the start position offset by the
    /// active coordinate shift (scaled into the configured unit system).
    pub fn reset(&mut self, shift: DVec2, units: Units) {
        self.shift = shift;
        let scale = units.scale_factor();
        self.state = InterpreterState {
            position: Point3::new(shift.x * scale, shift.y * scale, 0.0),
            units,
            ..InterpreterState::default()
        };
    }

    /// Current interpreter state
    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    /// Interpret the next program line. Returns `None` at end of program.
    ///
    /// A line that packs several `G` words yields one command per word,
    /// in order. Fragments whose fields cannot be parsed are skipped and
    /// logged; the position state is left unchanged for them.
    pub fn interpret_next(&mut self, program: &mut GcodeProgram) -> Option<Vec<MotionCommand>> {
        let index = self.state.cursor;
        let text = program.visit(index, self.shift)?.to_string();
        self.state.cursor += 1;

        let mut commands = Vec::new();
        if text.contains('G') {
            for piece in text.split('G').filter(|piece| !piece.is_empty()) {
                self.interpret_fragment(&format!("G{}", piece), index, &mut commands);
            }
        } else {
            self.interpret_fragment(&text, index, &mut commands);
        }
        Some(commands)
    }

    fn interpret_fragment(
        &mut self,
        fragment: &str,
        line_index: usize,
        commands: &mut Vec<MotionCommand>,
    ) {
        match self.classify(fragment, line_index) {
            Ok(command) => commands.push(command),
            Err(err) => {
                self.state.skipped_fragments += 1;
                warn!(line = line_index + 1, fragment, error = %err, "skipping fragment");
            }
        }
    }

    fn classify(
        &mut self,
        fragment: &str,
        line_index: usize,
    ) -> Result<MotionCommand, RenderError> {
        // Trailing space so a 3-character candidate always exists for
        // short words like "G0"
        let mut line = format!("{} ", fragment);

        let candidate = match line.find('G') {
            Some(position) => line
                .get(position..position + 3)
                .unwrap_or_default()
                .to_string(),
            None => {
                // Modal reuse: a line with only coordinates gets the
                // sticky motion word prepended
                let word = self.state.motion_mode.word();
                line = format!("{} {}", word, line);
                word.to_string()
            }
        };

        if let Some(mode) = MotionMode::from_candidate(&candidate) {
            self.state.motion_mode = mode;
        }

        match candidate.as_str() {
            "G00" | "G0 " => {
                let from = self.state.position;
                let target = self.extract_target(&line, line_index)?;
                self.state.position = target;
                Ok(MotionCommand::Rapid { from, target })
            }
            "G01" | "G1 " => {
                let from = self.state.position;
                let target = self.extract_target(&line, line_index)?;
                self.state.position = target;
                Ok(MotionCommand::Linear { from, target })
            }
            "G02" | "G2 " | "G03" | "G3 " => {
                let from = self.state.position;
                let target = self.extract_target(&line, line_index)?;
                let center_offset = self.extract_center_offset(&line, line_index)?;
                self.state.position = target;
                if matches!(candidate.as_str(), "G02" | "G2 ") {
                    Ok(MotionCommand::ArcCw {
                        from,
                        target,
                        center_offset,
                    })
                } else {
                    Ok(MotionCommand::ArcCcw {
                        from,
                        target,
                        center_offset,
                    })
                }
            }
            // XY plane selection is the default
            "G17" => Ok(MotionCommand::NoOp),
            "G18" | "G19" => {
                let err = RenderError::UnsupportedCode {
                    line_number: line_index + 1,
                    code: candidate.trim().to_string(),
                };
                warn!(error = %err, "plane selection not supported");
                Ok(MotionCommand::NoOp)
            }
            "G20" => {
                self.state.units = Units::Inches;
                Ok(MotionCommand::UnitChange(Units::Inches))
            }
            "G21" => {
                self.state.units = Units::Mm;
                Ok(MotionCommand::UnitChange(Units::Mm))
            }
            "G90" => {
                self.state.positioning = Positioning::Absolute;
                Ok(MotionCommand::ModeChange(Positioning::Absolute))
            }
            "G91" => {
                self.state.positioning = Positioning::Incremental;
                Ok(MotionCommand::ModeChange(Positioning::Incremental))
            }
            _ => Ok(MotionCommand::Unrecognized),
        }
    }

    /// Extract the target position from the line's X/Y/Z fields.
    /// Missing fields leave the corresponding component unchanged.
    fn extract_target(&self, line: &str, line_index: usize) -> Result<Point3, RenderError> {
        let scale = self.state.units.scale_factor();
        let position = self.state.position;
        let mut target = position;

        if let Some(field) = self.field(line, 'X', line_index)? {
            let value = field.value * scale;
            target.x = match self.state.positioning {
                Positioning::Absolute => value,
                Positioning::Incremental => position.x + value,
            };
        }
        if let Some(field) = self.field(line, 'Y', line_index)? {
            let value = field.value * scale;
            target.y = match self.state.positioning {
                Positioning::Absolute => value,
                Positioning::Incremental => position.y + value,
            };
        }
        if let Some(field) = self.field(line, 'Z', line_index)? {
            target.z = field.value * scale;
        }
        Ok(target)
    }

    /// Extract the I/J arc center offset; missing components default to 0
    fn extract_center_offset(&self, line: &str, line_index: usize) -> Result<DVec2, RenderError> {
        let scale = self.state.units.scale_factor();
        let i = self
            .field(line, 'I', line_index)?
            .map_or(0.0, |field| field.value * scale);
        let j = self
            .field(line, 'J', line_index)?
            .map_or(0.0, |field| field.value * scale);
        Ok(DVec2::new(i, j))
    }

    fn field(
        &self,
        line: &str,
        letter: char,
        line_index: usize,
    ) -> Result<Option<super::scanner::Field>, RenderError> {
        scan_field(line, letter).map_err(|err| RenderError::LineParse {
            line_number: line_index + 1,
            reason: err.to_string(),
        })
    }
}
