//! Character reader: wide-character stream with newline normalization and
//! line/column tracking (§4.1).
use std::iter::Peekable;
use std::str::Chars;

use crate::error::{PipelineError, PipelineErrorKind, Position};

/// Sentinel character returned once the source is exhausted (code point 3,
/// the ASCII "end of text" control character).
pub const EOT: char = '\u{3}';

pub struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    current: char,
    position: Position,
    file: String,
    at_end: bool,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a str, file: impl Into<String>) -> Result<Self, PipelineError> {
        let mut reader = Reader {
            chars: source.chars().peekable(),
            current: EOT,
            position: Position::start(),
            file: file.into(),
            at_end: false,
        };
        reader.current = reader.read_normalized()?;
        Ok(reader)
    }

    /// The character currently under the cursor.
    pub fn current(&self) -> char {
        self.current
    }

    /// The position of the character currently under the cursor.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Moves the cursor to the next (normalized) character, updating the
    /// line/column bookkeeping based on the character that is being left.
    pub fn advance(&mut self) -> Result<(), PipelineError> {
        if self.at_end {
            return Ok(());
        }
        if self.current == '\n' {
            self.position.line += 1;
            self.position.col = 1;
        } else {
            self.position.col += 1;
        }
        self.current = self.read_normalized()?;
        Ok(())
    }

    fn read_normalized(&mut self) -> Result<char, PipelineError> {
        let Some(next) = self.chars.next() else {
            self.at_end = true;
            return Ok(EOT);
        };

        let normalized = if next == '\r' {
            if self.chars.peek() == Some(&'\n') {
                self.chars.next();
            }
            '\n'
        } else {
            next
        };

        if normalized != '\n' && normalized.is_control() {
            return Err(PipelineError::new(
                PipelineErrorKind::ReaderControlChar,
                "Control character encountered in input",
                self.file.clone(),
                self.position,
            ));
        }

        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &str) -> (Vec<char>, Vec<Position>) {
        let mut reader = Reader::new(source, "test").unwrap();
        let mut chars = vec![];
        let mut positions = vec![];
        loop {
            chars.push(reader.current());
            positions.push(reader.position());
            if reader.current() == EOT {
                break;
            }
            reader.advance().unwrap();
        }
        (chars, positions)
    }

    #[test]
    fn normalizes_crlf_and_cr_like_lf() {
        let (a, pos_a) = collect("ab\r\ncd");
        let (b, pos_b) = collect("ab\ncd");
        let (c, pos_c) = collect("ab\rcd");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(pos_a, pos_b);
        assert_eq!(pos_a, pos_c);
    }

    #[test]
    fn tracks_line_and_column() {
        let mut reader = Reader::new("ab\ncd", "f").unwrap();
        assert_eq!(reader.position(), Position::new(1, 1));
        reader.advance().unwrap();
        assert_eq!(reader.position(), Position::new(1, 2));
        reader.advance().unwrap(); // now at '\n'
        assert_eq!(reader.position(), Position::new(1, 3));
        reader.advance().unwrap(); // now at 'c'
        assert_eq!(reader.position(), Position::new(2, 1));
    }

    #[test]
    fn rejects_control_characters() {
        let err = Reader::new("a\u{1}b", "f").unwrap_err();
        assert_eq!(err.kind, PipelineErrorKind::ReaderControlChar);
    }

    #[test]
    fn stays_at_eot_once_reached() {
        let mut reader = Reader::new("x", "f").unwrap();
        reader.advance().unwrap();
        assert_eq!(reader.current(), EOT);
        let before = reader.position();
        reader.advance().unwrap();
        assert_eq!(reader.current(), EOT);
        assert_eq!(reader.position(), before);
    }
}
