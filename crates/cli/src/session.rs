//! A source file on disk treated as an editor buffer.
//!
//! The session keeps the last contents it saw. Each change is reduced to the
//! first line that differs from that snapshot, which is what an editor would
//! report as the start of its first content change.

use std::path::{Path, PathBuf};

use stubsmith_core::buffer::first_changed_line;
use stubsmith_core::{CallProcessor, StubAction, StubStyle, StubsmithConfig, TextBuffer};
use tracing::debug;

use crate::error::HostError;

pub struct FileSession {
    path: PathBuf,
    snapshot: Vec<String>,
    processor: CallProcessor,
}

impl FileSession {
    /// Activate a session on `path`, taking its current contents as the baseline.
    pub fn open(path: &Path, config: &StubsmithConfig) -> Result<Self, HostError> {
        let buffer = read_buffer(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            snapshot: buffer.lines().to_vec(),
            processor: CallProcessor::with_style(StubStyle::with_indent_width(config.indent_width)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and process the first changed line, writing back any
    /// stubs. Our own write becomes the new snapshot, so it does not retrigger.
    pub fn on_change(&mut self) -> Result<Vec<StubAction>, HostError> {
        let mut buffer = read_buffer(&self.path)?;
        let Some(line) = first_changed_line(&self.snapshot, buffer.lines()) else {
            debug!(path = %self.path.display(), "No content change");
            return Ok(Vec::new());
        };

        let actions = self.processor.process_change(&mut buffer, line);
        if !actions.is_empty() {
            write_buffer(&self.path, &buffer)?;
        }
        self.snapshot = buffer.lines().to_vec();
        Ok(actions)
    }

    /// Detach: forget session state.
    pub fn deactivate(mut self) {
        self.processor.cleanup();
        debug!(path = %self.path.display(), "Session closed");
    }
}

pub fn read_buffer(path: &Path) -> Result<TextBuffer, HostError> {
    std::fs::read_to_string(path)
        .map(|text| TextBuffer::from_text(&text))
        .map_err(|source| HostError::Read { path: path.to_path_buf(), source })
}

pub fn write_buffer(path: &Path, buffer: &TextBuffer) -> Result<(), HostError> {
    std::fs::write(path, buffer.to_text())
        .map_err(|source| HostError::Write { path: path.to_path_buf(), source })
}
