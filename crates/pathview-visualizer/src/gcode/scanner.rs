//! Field scanning over G-code letter/number pairs
//!
//! A field such as `X-12.5` is an uppercase letter immediately followed by
//! a signed decimal. The scanner walks bytes instead of using a regex so
//! that presence semantics stay explicit: a letter counts as a field only
//! when at least one character follows it on the line. A letter that is
//! followed by text which does not form a number is a malformed field, not
//! an absent one — callers decide whether that skips the line.

use thiserror::Error;

/// A field located within a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    /// Byte index of the field letter
    pub letter_index: usize,
    /// Byte index one past the end of the numeric text
    pub end: usize,
    /// Parsed numeric value
    pub value: f64,
}

/// A field letter was present but not followed by a parseable number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("field '{letter}' is not followed by a parseable number")]
pub struct ScanError {
    /// The offending field letter
    pub letter: char,
}

/// Locate the first occurrence of `letter` that starts a field.
///
/// Returns `Ok(None)` when the letter is absent or nothing follows it
/// (a bare trailing letter is not a field). Returns `Err` when the letter
/// is followed by characters that do not form a signed decimal.
///
/// Spaces between the letter and the number are tolerated, matching the
/// normalizer's output before values are reattached to their letters.
pub fn scan_field(line: &str, letter: char) -> Result<Option<Field>, ScanError> {
    let bytes = line.as_bytes();
    let letter_byte = letter as u8;

    let Some(letter_index) = bytes.iter().position(|&b| b == letter_byte) else {
        return Ok(None);
    };
    if letter_index + 1 >= bytes.len() {
        // Bare trailing letter
        return Ok(None);
    }

    let mut cursor = letter_index + 1;
    while cursor < bytes.len() && bytes[cursor] == b' ' {
        cursor += 1;
    }
    let number_start = cursor;
    if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
        cursor += 1;
    }
    let integer_start = cursor;
    while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
        cursor += 1;
    }
    let mut has_digits = cursor > integer_start;
    if cursor < bytes.len() && bytes[cursor] == b'.' {
        let fraction_start = cursor + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        // A trailing '.' with no digits is not part of the number
        if fraction_end > fraction_start {
            cursor = fraction_end;
            has_digits = true;
        }
    }

    if !has_digits {
        return Err(ScanError { letter });
    }

    let value = line[number_start..cursor]
        .parse::<f64>()
        .map_err(|_| ScanError { letter })?;

    Ok(Some(Field {
        letter_index,
        end: cursor,
        value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_field() {
        let field = scan_field("G01 X12.5 Y3 ", 'X').unwrap().unwrap();
        assert_eq!(field.value, 12.5);
        assert_eq!(field.letter_index, 4);
        assert_eq!(&"G01 X12.5 Y3 "[field.letter_index + 1..field.end], "12.5");
    }

    #[test]
    fn test_signed_and_fraction_only_values() {
        assert_eq!(scan_field("X-5 ", 'X').unwrap().unwrap().value, -5.0);
        assert_eq!(scan_field("X.5 ", 'X').unwrap().unwrap().value, 0.5);
        assert_eq!(scan_field("X+.25 ", 'X').unwrap().unwrap().value, 0.25);
    }

    #[test]
    fn test_absent_letter() {
        assert_eq!(scan_field("G01 Y3 ", 'X').unwrap(), None);
    }

    #[test]
    fn test_bare_trailing_letter_is_absent() {
        assert_eq!(scan_field("G01 X", 'X').unwrap(), None);
    }

    #[test]
    fn test_letter_with_no_number_is_malformed() {
        assert_eq!(scan_field("G01 X ", 'X'), Err(ScanError { letter: 'X' }));
        assert_eq!(scan_field("G01 X- Y2 ", 'X'), Err(ScanError { letter: 'X' }));
    }

    #[test]
    fn test_spaces_before_value_tolerated() {
        assert_eq!(scan_field("X 7.25 ", 'X').unwrap().unwrap().value, 7.25);
    }

    #[test]
    fn test_trailing_dot_excluded() {
        let field = scan_field("X5. Y2 ", 'X').unwrap().unwrap();
        assert_eq!(field.value, 5.0);
        assert_eq!(field.end, 2);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let field = scan_field("X1 X2 ", 'X').unwrap().unwrap();
        assert_eq!(field.value, 1.0);
    }
}
