//! Program storage and derived indices
//!
//! Holds the normalized line sequence produced by the preprocessor.
//! Lines are immutable except for the one-time coordinate-shift rewrite,
//! applied lazily the first time the interpreter visits a line.

use glam::DVec2;
use tracing::warn;

use super::scanner::scan_field;

/// A single normalized command line
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLine {
    /// Normalized command text
    pub text: String,
    shifted: bool,
}

impl ProgramLine {
    fn new(text: String) -> Self {
        Self {
            text,
            shifted: false,
        }
    }
}

/// An ordered, index-addressable G-code program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcodeProgram {
    lines: Vec<ProgramLine>,
    z_moves: Vec<usize>,
}

impl GcodeProgram {
    /// Build a program from normalized lines, deriving the depth-change
    /// index with the given tolerance.
    pub fn from_lines(lines: Vec<String>, depth_tolerance: f64) -> Self {
        let z_moves = scan_z_moves(&lines, depth_tolerance);
        Self {
            lines: lines.into_iter().map(ProgramLine::new).collect(),
            z_moves,
        }
    }

    /// An empty program (no file loaded)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether the program has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of the line at `index`
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|line| line.text.as_str())
    }

    /// Line indices where the depth changes by more than the tolerance
    pub fn z_moves(&self) -> &[usize] {
        &self.z_moves
    }

    /// Visit a line for interpretation, applying the coordinate shift on
    /// the first visit. A malformed X or Y field leaves the line unchanged
    /// and the shift is skipped for that line only.
    pub(crate) fn visit(&mut self, index: usize, shift: DVec2) -> Option<&str> {
        let line = self.lines.get_mut(index)?;
        if !line.shifted {
            line.shifted = true;
            if shift != DVec2::ZERO {
                match shift_line(&line.text, shift) {
                    Some(moved) => line.text = moved,
                    None => {
                        warn!(line = index + 1, text = %line.text, "line could not be shifted");
                    }
                }
            }
        }
        Some(line.text.as_str())
    }
}

/// Rewrite the X and Y fields of a line by adding the shift offset.
/// Returns `None` when either field is present but malformed.
fn shift_line(line: &str, shift: DVec2) -> Option<String> {
    let mut out = line.to_string();
    for (letter, delta) in [('X', shift.x), ('Y', shift.y)] {
        match scan_field(&out, letter) {
            Ok(Some(field)) => {
                let moved = field.value + delta;
                out = format!(
                    "{}{}{}",
                    &out[..field.letter_index + 1],
                    moved,
                    &out[field.end..]
                );
            }
            Ok(None) => {}
            Err(_) => return None,
        }
    }
    Some(out)
}

/// Scan the normalized lines for depth changes.
///
/// The index always begins with 0. The first Z-bearing line contributes
/// its own index; every later Z-bearing line whose value differs from the
/// previous one by more than the tolerance contributes the index of the
/// line before it.
fn scan_z_moves(lines: &[String], tolerance: f64) -> Vec<usize> {
    let mut z_moves = vec![0];
    let mut previous_z: Option<f64> = None;
    for (index, line) in lines.iter().enumerate() {
        let Ok(Some(field)) = scan_field(line, 'Z') else {
            continue;
        };
        match previous_z {
            Some(previous) => {
                if (field.value - previous).abs() > tolerance {
                    z_moves.push(index - 1);
                }
            }
            None => z_moves.push(index),
        }
        previous_z = Some(field.value);
    }
    z_moves
}
