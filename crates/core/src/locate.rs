//! Stub placement: where a new stub goes, and where an old one already is.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::buffer::Buffer;

static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:word:]]+\s+[[:word:]]+\s*\([^)]*\)\s*\{?\s*$").unwrap()
});

// An ASCII word boundary before the entry point name.
static ENTRY_POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^[:word:]])(?:signed\s+)?(?:int\s+)?main\s*\([^)]*\)\s*\{?\s*$")
        .unwrap()
});

static SIGNATURE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:word:]]+\s+[[:word:]]+\s*\([^)]*$").unwrap());

/// Line before which a new stub should be inserted: the nearest function
/// signature at or above `current_line`, or 0 when there is none.
pub fn find_insertion_point<B: Buffer + ?Sized>(buffer: &B, current_line: usize) -> usize {
    let last = buffer.line_count().saturating_sub(1);
    for i in (0..=current_line.min(last)).rev() {
        if is_function_signature(buffer.trimmed(i)) || is_multiline_signature_start(buffer, i) {
            return i;
        }
    }
    0
}

/// Range of an earlier stub for `name` among lines `0..before_line`: from its
/// signature through the first following line that is exactly `}`.
pub fn find_existing_stub<B: Buffer + ?Sized>(
    buffer: &B,
    before_line: usize,
    name: &str,
) -> Option<Range<usize>> {
    let pattern = format!(r"^\s*[[:word:]]+\s+{}\s*\(.*\)\s*\{{", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;

    let end = before_line.min(buffer.line_count());
    for i in 0..end {
        let Some(text) = buffer.line(i) else { continue };
        if !re.is_match(text) {
            continue;
        }
        if let Some(close) = (i + 1..buffer.line_count()).find(|&j| buffer.trimmed(j) == "}") {
            return Some(i..close + 1);
        }
    }
    None
}

/// Single-line signature, `type name(args) {` or the program entry point.
pub fn is_function_signature(text: &str) -> bool {
    SIGNATURE_RE.is_match(text) || ENTRY_POINT_RE.is_match(text)
}

/// `type name(` with the parameter list continuing on later lines. Confirmed
/// by looking ahead for the opening brace: on any line up to the one that
/// closes the parameter list, or on the line right after it.
fn is_multiline_signature_start<B: Buffer + ?Sized>(buffer: &B, index: usize) -> bool {
    if !SIGNATURE_OPEN_RE.is_match(buffer.trimmed(index)) {
        return false;
    }

    let count = buffer.line_count();
    let mut j = index + 1;
    while j < count {
        let next = buffer.trimmed(j);
        if next.contains('{') {
            return true;
        }
        j += 1;
        if next.contains(')') {
            break;
        }
    }

    j < count && buffer.trimmed(j).contains('{')
}
