//! Core types shared across stubsmith: runtime configuration, call descriptors,
//! the variable-type context, and the record of buffer mutations.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::ops::Range;

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// Default indentation of a stub body, in spaces.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Widest stub indentation accepted; larger values are clamped.
pub const MAX_INDENT_WIDTH: usize = 16;

/// Default quiet period before the watcher processes a change.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Runtime configuration. Loaded from `.stubsmith.toml` or defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct StubsmithConfig {
    /// Spaces used to indent the stub body.
    pub indent_width: usize,
    /// Watcher debounce window in milliseconds.
    pub debounce_ms: u64,
    /// File extensions the watcher accepts (without the dot).
    pub extensions: HashSet<String>,
}

impl StubsmithConfig {
    pub fn new() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            extensions: ["cpp", "cc", "cxx", "c", "hpp", "h"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Whether a file extension is one the watcher should handle.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }
}

impl Default for StubsmithConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Pipeline values
// ---------------------------------------------------------------------------

/// One call occurrence detected on a line: callee name, raw argument text,
/// and the return type the stub should declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<String>,
    pub return_type: String,
}

/// Variable identifier → canonical type spelling, as declared above the
/// current line. Later declarations overwrite earlier ones.
pub type VariableTypes = HashMap<String, String>;

/// A mutation the processor applied to the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StubAction {
    /// A new stub was inserted before `line`.
    Inserted { function: String, line: usize },
    /// An existing stub occupying `lines` was rewritten in place.
    Replaced { function: String, lines: Range<usize> },
}

impl StubAction {
    pub fn function(&self) -> &str {
        match self {
            StubAction::Inserted { function, .. } | StubAction::Replaced { function, .. } => {
                function
            }
        }
    }
}
