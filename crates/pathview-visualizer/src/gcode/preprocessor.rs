//! G-code text normalization
//!
//! Turns raw file text into the flat, ordered line sequence the
//! interpreter consumes. The pass order matters: comments first, then
//! spacing repairs, then the optional float truncation, and finally the
//! per-line fixups (trailing-space sentinel, value reattachment).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Field letters that values are reattached to after spacing repairs
const VALUE_LETTERS: [&str; 6] = ["X ", "Y ", "Z ", "I ", "J ", "F "];

/// Normalization options controlled by the hosting application
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreprocessorSettings {
    /// Truncate long float literals to `digits` fractional digits
    pub truncate: bool,
    /// Number of fractional digits kept when truncating
    pub digits: u8,
}

impl Default for PreprocessorSettings {
    fn default() -> Self {
        Self {
            truncate: false,
            digits: 4,
        }
    }
}

/// Normalizes raw G-code text into interpreter-ready lines
#[derive(Debug, Clone)]
pub struct GcodePreprocessor {
    settings: PreprocessorSettings,
    truncation: Option<Regex>,
}

impl GcodePreprocessor {
    /// Create a preprocessor with the given settings
    pub fn new(settings: PreprocessorSettings) -> Self {
        let truncation = if settings.truncate && settings.digits > 0 {
            // Keeps up to `digits` fractional digits, drops the rest.
            // Shorter literals never match the dropped group, so nothing
            // is padded.
            Regex::new(&format!(
                r"([+-]?\d*\.\d{{1,{}}})\d*",
                settings.digits
            ))
            .ok()
        } else {
            None
        };
        Self {
            settings,
            truncation,
        }
    }

    /// Current settings
    pub fn settings(&self) -> &PreprocessorSettings {
        &self.settings
    }

    /// Normalize raw file text into the ordered line sequence.
    ///
    /// Each produced line is upper-case, single-spaced, has field values
    /// attached to their letters, and carries one trailing space as the
    /// field-end sentinel. Empty input yields an empty sequence.
    pub fn normalize(&self, raw: &str) -> Vec<String> {
        if raw.trim().is_empty() {
            return Vec::new();
        }

        static PAREN_COMMENTS: OnceLock<Regex> = OnceLock::new();
        static EOL_COMMENTS: OnceLock<Regex> = OnceLock::new();
        static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
        static DIGIT_LETTER: OnceLock<Regex> = OnceLock::new();
        static SPACE_RUNS: OnceLock<Regex> = OnceLock::new();

        let paren_comments = PAREN_COMMENTS
            .get_or_init(|| Regex::new(r"\(([^)]*)\)").expect("invalid regex pattern"));
        let eol_comments =
            EOL_COMMENTS.get_or_init(|| Regex::new(r";([^\n]*)\n").expect("invalid regex pattern"));
        let blank_lines =
            BLANK_LINES.get_or_init(|| Regex::new(r"\n\n").expect("invalid regex pattern"));
        let digit_letter = DIGIT_LETTER
            .get_or_init(|| Regex::new(r"([0-9])([GXYZIJFTM]) *").expect("invalid regex pattern"));
        let space_runs =
            SPACE_RUNS.get_or_init(|| Regex::new(r"  +").expect("invalid regex pattern"));

        let mut text = raw.to_uppercase();
        if !text.ends_with('\n') {
            text.push('\n');
        }

        // Parenthesized comments become a line break so multi-line
        // comments cannot splice two commands together
        let text = paren_comments.replace_all(&text, "\n");
        let text = eol_comments.replace_all(&text, "\n");
        let text = blank_lines.replace_all(&text, "\n");
        // Separate commands that were written without whitespace,
        // e.g. G90G1X5
        let text = digit_letter.replace_all(&text, "$1 $2");
        let text = space_runs.replace_all(&text, " ");

        let text = match &self.truncation {
            Some(truncation) => truncation.replace_all(&text, "$1").into_owned(),
            None => text.into_owned(),
        };

        text.split('\n')
            .map(|line| {
                let mut line = format!("{} ", line.trim());
                for letter in VALUE_LETTERS {
                    // Reattach values to their field letters
                    line = line.replace(letter, &letter[..1]);
                }
                line
            })
            .collect()
    }
}

impl Default for GcodePreprocessor {
    fn default() -> Self {
        Self::new(PreprocessorSettings::default())
    }
}
