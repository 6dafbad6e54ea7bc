//! Test harness for pipeline integration tests.
//!
//! Loads a fixture into a [`TextBuffer`], simulates typing by rewriting a
//! line, and feeds the edit to a [`CallProcessor`] the way a host would.

use stubsmith_core::{Buffer, CallProcessor, StubAction, TextBuffer, TextEdit};

pub struct TestHarness {
    pub buffer: TextBuffer,
    pub processor: CallProcessor,
    pub edits: usize,
}

impl TestHarness {
    /// Create a harness from a named fixture under `tests/fixtures`.
    pub fn from_fixture(name: &str) -> Self {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name);
        assert!(path.exists(), "Fixture '{name}' not found at {}", path.display());
        let text = std::fs::read_to_string(&path).expect("Failed to read fixture");
        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Self {
        TestHarness { buffer: TextBuffer::from_text(text), processor: CallProcessor::new(), edits: 0 }
    }

    /// Replace line `line` with `text` and process the change.
    pub fn type_line(&mut self, line: usize, text: &str) -> Vec<StubAction> {
        self.buffer
            .apply(TextEdit::Replace { lines: line..line + 1, text: format!("{text}\n") })
            .expect("Failed to edit fixture line");
        self.notify(line)
    }

    /// Deliver a change notification for `line` without editing.
    pub fn notify(&mut self, line: usize) -> Vec<StubAction> {
        let actions = self.processor.process_change(&mut self.buffer, line);
        self.edits += actions.len();
        actions
    }

    /// Zero-based index of the first line whose trimmed text equals `needle`.
    pub fn line_of(&self, needle: &str) -> usize {
        (0..self.buffer.line_count())
            .find(|&i| self.buffer.trimmed(i) == needle)
            .unwrap_or_else(|| panic!("line {needle:?} not found in:\n{}", self.text()))
    }

    pub fn text(&self) -> String {
        self.buffer.to_text()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.text().matches(needle).count()
    }
}
