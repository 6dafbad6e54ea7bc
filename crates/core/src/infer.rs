//! Heuristic argument-type inference.
//!
//! Argument types come from two places: declarations scanned from the lines
//! above the call, and the literal shape of the argument text itself.

use regex::Regex;
use std::sync::LazyLock;

use crate::typedef::{self, GENERIC_KEYWORDS};
use crate::types::VariableTypes;

static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[[:word:]]+$").unwrap());
static STRING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^".*"$"#).unwrap());
static INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").unwrap());
static CHAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^'.'$").unwrap());

/// `vector<...> name`, `map<..., ...> name`, ... at the start of a line.
/// Longest keywords first so `unordered_map` is never read as `map`.
static GENERIC_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut keywords: Vec<&str> = GENERIC_KEYWORDS.to_vec();
    keywords.sort_by_key(|kw| std::cmp::Reverse(kw.len()));
    let pattern = format!(r"^((?:{})\s*<[^=;(]*>)\s+([[:word:]]+)", keywords.join("|"));
    Regex::new(&pattern).unwrap()
});

/// `long long name` or `<word> name`; the word is checked separately.
static SCALAR_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(long\s+long|[[:word:]]+)\s+([[:word:]]+)").unwrap()
});

/// Turn raw argument strings into parameter declarations, in order.
pub fn infer_argument_types(args: &[String], variable_types: &VariableTypes) -> Vec<String> {
    args.iter().enumerate().map(|(i, arg)| infer_one(i, arg, variable_types)).collect()
}

fn infer_one(index: usize, arg: &str, variable_types: &VariableTypes) -> String {
    if IDENT_RE.is_match(arg) {
        if let Some(ty) = variable_types.get(arg) {
            return format!("{ty} {arg}");
        }
    }

    // Nested call: its return type is unknown.
    if arg.contains('(') && arg.contains(')') {
        return format!("int arg{index}");
    }

    let literal = if STRING_RE.is_match(arg) {
        Some("string")
    } else if INT_RE.is_match(arg) {
        Some("int")
    } else if FLOAT_RE.is_match(arg) {
        Some("double")
    } else if CHAR_RE.is_match(arg) {
        Some("char")
    } else if arg == "true" || arg == "false" {
        Some("bool")
    } else {
        None
    };

    match literal {
        Some(ty) => format!("{ty} arg{index}"),
        None => format!("int {arg}"),
    }
}

/// Scan `lines` top-to-bottom for variable declarations.
///
/// Each line is trimmed, then tried against the generic declaration shape and
/// then the scalar/abbreviation shape. The first match on a line wins; a later
/// line redeclaring a name overwrites it.
pub fn scan_variable_types<'a, I>(lines: I) -> VariableTypes
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ctx = VariableTypes::new();
    for line in lines {
        if let Some((name, ty)) = declaration(line.trim()) {
            ctx.insert(name, ty);
        }
    }
    ctx
}

/// The `(identifier, canonical type)` a single trimmed line declares, if any.
pub fn declaration(line: &str) -> Option<(String, String)> {
    if let Some(caps) = GENERIC_DECL_RE.captures(line) {
        return Some((caps[2].to_string(), typedef::expand(&caps[1])));
    }

    let caps = SCALAR_DECL_RE.captures(line)?;
    let token = &caps[1];
    if typedef::is_scalar_type_token(token) {
        return Some((caps[2].to_string(), typedef::expand(token)));
    }
    None
}
