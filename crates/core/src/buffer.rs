//! Line-addressed editable buffers.
//!
//! [`Buffer`] is the seam to whatever owns the text (an editor, a file on
//! disk, a test fixture). [`TextBuffer`] is the in-memory implementation used
//! by the file host and the tests.

use std::ops::Range;
use thiserror::Error;

/// Errors applying a [`TextEdit`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("line {line} is out of range (buffer has {line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },
    #[error("inverted line range {start}..{end}")]
    InvertedRange { start: usize, end: usize },
}

/// A single atomic edit, addressed by zero-based line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    /// Insert `text` at column 0 of `line`.
    Insert { line: usize, text: String },
    /// Replace whole lines `lines.start..lines.end`, terminators included.
    /// An end past the last line clamps to the end of the buffer.
    Replace { lines: Range<usize>, text: String },
}

pub trait Buffer {
    fn line_count(&self) -> usize;

    /// Raw text of a line, without its terminator.
    fn line(&self, index: usize) -> Option<&str>;

    /// Apply one edit atomically.
    fn apply(&mut self, edit: TextEdit) -> Result<(), BufferError>;

    /// Trimmed text of a line; empty for out-of-range indices.
    fn trimmed(&self, index: usize) -> &str {
        self.line(index).map(str::trim).unwrap_or("")
    }
}

/// In-memory buffer. A trailing newline yields a final empty line, so
/// `to_text(from_text(s)) == s` for input with consistent line endings.
/// Text containing any `\r\n` is written back with `\r\n` throughout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    crlf: bool,
}

impl TextBuffer {
    pub fn from_text(text: &str) -> Self {
        Self { lines: split_lines(text), crlf: text.contains("\r\n") }
    }

    pub fn to_text(&self) -> String {
        self.lines.join(if self.crlf { "\r\n" } else { "\n" })
    }

    /// Whether lines are terminated with `\r\n`.
    pub fn is_crlf(&self) -> bool {
        self.crlf
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Byte offset of the start of `line` in the `\n`-joined text, clamped to
    /// the end of the text.
    fn offset_of(&self, line: usize) -> usize {
        if line >= self.lines.len() {
            return self.lines.iter().map(|l| l.len() + 1).sum::<usize>().saturating_sub(1);
        }
        self.lines[..line].iter().map(|l| l.len() + 1).sum()
    }

    fn splice(&mut self, range: Range<usize>, text: &str) {
        let mut joined = self.lines.join("\n");
        joined.replace_range(range, text);
        self.lines = split_lines(&joined);
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l).to_string()).collect()
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl Buffer for TextBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    fn apply(&mut self, edit: TextEdit) -> Result<(), BufferError> {
        match edit {
            TextEdit::Insert { line, text } => {
                if line >= self.lines.len() {
                    return Err(BufferError::LineOutOfRange {
                        line,
                        line_count: self.lines.len(),
                    });
                }
                let at = self.offset_of(line);
                self.splice(at..at, &text);
            }
            TextEdit::Replace { lines, text } => {
                if lines.start > lines.end {
                    return Err(BufferError::InvertedRange { start: lines.start, end: lines.end });
                }
                if lines.start >= self.lines.len() {
                    return Err(BufferError::LineOutOfRange {
                        line: lines.start,
                        line_count: self.lines.len(),
                    });
                }
                let start = self.offset_of(lines.start);
                let end = self.offset_of(lines.end);
                self.splice(start..end, &text);
            }
        }
        Ok(())
    }
}

/// First line index at which `new` differs from `old`, or `None` when the
/// two are identical. Stands in for an editor's "first content change" when
/// the only signal is a new snapshot of the whole text.
pub fn first_changed_line(old: &[String], new: &[String]) -> Option<usize> {
    let common = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    if common == old.len() && common == new.len() {
        return None;
    }
    // A pure deletion at the end: report the last surviving line.
    Some(common.min(new.len().saturating_sub(1)))
}
