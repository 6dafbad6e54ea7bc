//! stubsmith: keep call stubs in sync with the code being typed.
//!
//! When a line of C-family source gains a call to a function that has no
//! definition yet, stubsmith infers a signature from the call site and the
//! declarations above it, then writes a placeholder definition into the same
//! buffer. Retyping the call rewrites that stub in place.
//!
//! # Modules
//!
//! - [`parser`]: Call detection on a single line (assignment and standalone shapes)
//! - [`infer`]: Argument-type inference and the backward declaration scan
//! - [`typedef`]: Abbreviation table and the generic-type predicate
//! - [`locate`]: Insertion point and existing-stub lookup
//! - [`stubs`]: Stub rendering and default return values
//! - [`processor`]: Per-edit orchestration and session dedup state
//! - [`buffer`]: Line-addressed buffer trait, in-memory buffer, change detection
//! - [`types`]: Core types shared across the crate

pub mod buffer;
pub mod infer;
pub mod locate;
pub mod parser;
pub mod processor;
pub mod stubs;
pub mod typedef;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use buffer::{Buffer, BufferError, TextBuffer, TextEdit};
pub use processor::{CallProcessor, ProcessorState};
pub use stubs::StubStyle;
pub use types::*;

// ---------------------------------------------------------------------------
// .stubsmith.toml config loading
// ---------------------------------------------------------------------------

/// Name of the per-directory config file.
pub const CONFIG_FILE_NAME: &str = ".stubsmith.toml";

/// Known keys in `.stubsmith.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &["indent_width", "debounce_ms", "extensions"];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Path of the config file that applies to `source`: `.stubsmith.toml` next to it.
pub fn config_path_for(source: &Path) -> PathBuf {
    source.parent().unwrap_or_else(|| Path::new(".")).join(CONFIG_FILE_NAME)
}

/// Load configuration from a `.stubsmith.toml` file.
///
/// Returns defaults merged with any overrides from the file. A missing file
/// is silent; an unreadable or unparsable one logs a warning and yields defaults.
/// Unknown keys trigger a warning with a typo suggestion.
pub fn load_config(config_path: &Path) -> StubsmithConfig {
    let mut config = StubsmithConfig::new();

    if !config_path.exists() {
        return config;
    }

    debug!(path = %config_path.display(), "Loading config");
    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Could not read config file");
            return config;
        }
    };
    let table = match content.parse::<toml::Table>() {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Failed to parse config file");
            return config;
        }
    };

    // Validate keys, warn on unknown
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        let suggestion = KNOWN_CONFIG_KEYS
            .iter()
            .min_by_key(|k| edit_distance(key, k))
            .copied()
            .unwrap_or_default();
        if edit_distance(key, suggestion) <= 3 {
            warn!(
                key = key.as_str(),
                suggestion = suggestion,
                "Unknown key in {CONFIG_FILE_NAME}, did you mean '{suggestion}'?"
            );
        } else {
            warn!(
                key = key.as_str(),
                "Unknown key in {CONFIG_FILE_NAME} (known keys: {})",
                KNOWN_CONFIG_KEYS.join(", ")
            );
        }
    }

    // indent_width
    if let Some(value) = table.get("indent_width") {
        match value.as_integer().and_then(|n| usize::try_from(n).ok()) {
            Some(width) if width > MAX_INDENT_WIDTH => {
                warn!(value = width, max = MAX_INDENT_WIDTH, "indent_width too large, clamping");
                config.indent_width = MAX_INDENT_WIDTH;
            }
            Some(width) => config.indent_width = width,
            None => warn!(value = %value, "indent_width must be a non-negative integer"),
        }
    }

    // debounce_ms
    if let Some(value) = table.get("debounce_ms") {
        match value.as_integer().and_then(|n| u64::try_from(n).ok()) {
            Some(ms) => config.debounce_ms = ms,
            None => warn!(value = %value, "debounce_ms must be a non-negative integer"),
        }
    }

    // extensions replace the defaults
    if let Some(exts) = table.get("extensions").and_then(|v| v.as_array()) {
        config.extensions = exts
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.trim_start_matches('.').to_string()))
            .collect();
    }

    config
}
