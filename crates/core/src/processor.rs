//! Per-edit orchestration: parse the edited line, gate repeats, infer a
//! signature, and insert or rewrite the stub.

use std::cell::OnceCell;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::buffer::{Buffer, TextEdit};
use crate::infer::{infer_argument_types, scan_variable_types};
use crate::locate::{find_existing_stub, find_insertion_point};
use crate::parser::extract_calls_with;
use crate::stubs::{line_span, StubStyle};
use crate::types::{FunctionCall, StubAction, VariableTypes};

/// Session memory used to suppress repeated processing. Never consulted as
/// a source of truth about the buffer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessorState {
    pub last_line: Option<usize>,
    pub last_function: Option<String>,
    pub processed: HashSet<String>,
}

impl ProcessorState {
    /// Whether `name` on `line` should be skipped: the same pair as last
    /// time, or an already-seen name within one line of the last edit.
    pub fn should_skip(&self, name: &str, line: usize) -> bool {
        let Some(last_line) = self.last_line else {
            return false;
        };
        if self.last_function.as_deref() == Some(name) && last_line == line {
            return true;
        }
        last_line.abs_diff(line) <= 1 && self.processed.contains(name)
    }

    fn record(&mut self, name: &str, line: usize) {
        self.last_line = Some(line);
        self.last_function = Some(name.to_string());
        self.processed.insert(name.to_string());
    }
}

/// Drives the call → stub pipeline for one buffer session.
#[derive(Debug, Default)]
pub struct CallProcessor {
    state: ProcessorState,
    style: StubStyle,
}

impl CallProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: StubStyle) -> Self {
        Self { state: ProcessorState::default(), style }
    }

    pub fn state(&self) -> &ProcessorState {
        &self.state
    }

    /// Handle an edit whose first change starts on `line`. Returns the
    /// mutations applied, in order; empty when the line holds no new call.
    pub fn process_change<B: Buffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        line: usize,
    ) -> Vec<StubAction> {
        let Some(text) = buffer.line(line) else {
            return Vec::new();
        };
        let text = text.trim().to_string();
        debug!(line = line, text = text.as_str(), "Typed line");

        let context: OnceCell<VariableTypes> = OnceCell::new();
        let calls = extract_calls_with(&text, |var| {
            context.get_or_init(|| variable_types_above(buffer, line)).get(var).cloned()
        });
        if calls.is_empty() {
            return Vec::new();
        }

        let mut actions = Vec::new();
        // The edited line moves down as stubs land above it; dedup keys stay on `line`.
        let mut current = line;
        for call in &calls {
            if self.state.should_skip(&call.name, line) {
                debug!(function = call.name.as_str(), line = line, "Skipping recent call");
                continue;
            }
            let ctx = context.get_or_init(|| variable_types_above(buffer, line));
            if let Some((action, stub_lines)) = self.apply_stub(buffer, call, current, ctx) {
                current = shifted_line(current, &action, stub_lines);
                self.state.record(&call.name, line);
                actions.push(action);
            }
        }
        actions
    }

    /// Render, place, and write one stub. Returns the action and the number
    /// of lines the stub occupies, or `None` when the edit was rejected.
    fn apply_stub<B: Buffer + ?Sized>(
        &self,
        buffer: &mut B,
        call: &FunctionCall,
        current: usize,
        ctx: &VariableTypes,
    ) -> Option<(StubAction, usize)> {
        let args = infer_argument_types(&call.args, ctx);
        let stub = self.style.render(&call.name, &args, &call.return_type);
        let stub_lines = line_span(&stub);

        let insert_at = find_insertion_point(buffer, current);
        let action = match find_existing_stub(buffer, insert_at, &call.name) {
            Some(mut lines) => {
                // Take the blank separator too, or every rewrite adds one.
                if lines.end < buffer.line_count() && buffer.trimmed(lines.end).is_empty() {
                    lines.end += 1;
                }
                StubAction::Replaced { function: call.name.clone(), lines }
            }
            None => StubAction::Inserted { function: call.name.clone(), line: insert_at },
        };

        let edit = match &action {
            StubAction::Inserted { line, .. } => TextEdit::Insert { line: *line, text: stub },
            StubAction::Replaced { lines, .. } => {
                TextEdit::Replace { lines: lines.clone(), text: stub }
            }
        };

        if let Err(e) = buffer.apply(edit) {
            warn!(function = call.name.as_str(), error = %e, "Failed to apply stub edit");
            return None;
        }

        match &action {
            StubAction::Inserted { line, .. } => {
                info!(function = call.name.as_str(), line = *line, "Inserted new stub");
            }
            StubAction::Replaced { lines, .. } => {
                info!(
                    function = call.name.as_str(),
                    start = lines.start,
                    end = lines.end,
                    "Updated existing stub"
                );
            }
        }
        Some((action, stub_lines))
    }

    /// Forget which functions were processed this session.
    pub fn cleanup(&mut self) {
        self.state.processed.clear();
    }
}

fn variable_types_above<B: Buffer + ?Sized>(buffer: &B, line: usize) -> VariableTypes {
    scan_variable_types((0..line).filter_map(|i| buffer.line(i)))
}

/// Where the edited line sits after `action`. Stubs land at or above it.
fn shifted_line(current: usize, action: &StubAction, stub_lines: usize) -> usize {
    match action {
        StubAction::Inserted { line, .. } if *line <= current => current + stub_lines,
        StubAction::Replaced { lines, .. } if lines.end <= current => {
            current - lines.len() + stub_lines
        }
        _ => current,
    }
}
