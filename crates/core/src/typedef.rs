//! Typedef expansion: abbreviated type tokens to canonical spellings.
//!
//! The table follows the usual competitive-programming shorthand: a family
//! prefix (`v`, `vp`, `s`, `us`, `sp`, `m`, `um`, `p`) followed by one or two
//! element codes. It is built once and never mutated.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Element codes used by vector abbreviations (`vf` exists, `mf*` does not).
const VECTOR_CODES: &[(&str, &str)] = &[
    ("i", "int"),
    ("d", "double"),
    ("f", "float"),
    ("c", "char"),
    ("s", "string"),
    ("b", "bool"),
    ("ll", "long long"),
];

/// Element codes used by every other family. `l` and `ll` both mean `long long`.
const ELEMENT_CODES: &[(&str, &str)] = &[
    ("i", "int"),
    ("d", "double"),
    ("l", "long long"),
    ("c", "char"),
    ("s", "string"),
    ("b", "bool"),
    ("ll", "long long"),
];

/// Generic/container keywords. Shared by the stub generator's default-value
/// classification and the declaration scan in type inference.
pub const GENERIC_KEYWORDS: &[&str] = &[
    "vector",
    "set",
    "unordered_set",
    "map",
    "unordered_map",
    "deque",
    "list",
    "pair",
    "priority_queue",
    "queue",
    "stack",
    "array",
];

/// Built-in scalar type tokens recognized at the start of a declaration.
pub const BASIC_TYPES: &[&str] =
    &["string", "int", "double", "char", "bool", "float", "auto", "long", "short", "size_t"];

static TYPEDEFS: LazyLock<HashMap<String, String>> = LazyLock::new(build_table);

fn build_table() -> HashMap<String, String> {
    let mut table = HashMap::new();
    table.insert("ll".to_string(), "long long".to_string());

    for (code, ty) in VECTOR_CODES {
        table.insert(format!("v{code}"), format!("vector<{ty}>"));
    }

    for (code, ty) in ELEMENT_CODES {
        table.insert(format!("vp{code}"), format!("vector<pair<{ty}, {ty}>>"));
        table.insert(format!("s{code}"), format!("set<{ty}>"));
        table.insert(format!("us{code}"), format!("unordered_set<{ty}>"));
        table.insert(format!("sp{code}"), format!("set<pair<{ty}, {ty}>>"));
    }

    for (kc, kt) in ELEMENT_CODES {
        for (vc, vt) in ELEMENT_CODES {
            table.insert(format!("m{kc}{vc}"), format!("map<{kt}, {vt}>"));
            table.insert(format!("um{kc}{vc}"), format!("unordered_map<{kt}, {vt}>"));
            table.insert(format!("p{kc}{vc}"), format!("pair<{kt}, {vt}>"));
        }
    }

    table
}

/// Expand an abbreviated type token. Unknown tokens come back unchanged.
pub fn expand(token: &str) -> String {
    TYPEDEFS.get(token).cloned().unwrap_or_else(|| token.to_string())
}

/// Whether `token` is a known abbreviation.
pub fn is_abbreviation(token: &str) -> bool {
    TYPEDEFS.contains_key(token)
}

/// Whether `token` can open a scalar declaration: a basic type, `long long`
/// (any inner whitespace), or a typedef abbreviation.
pub fn is_scalar_type_token(token: &str) -> bool {
    if BASIC_TYPES.contains(&token) || is_abbreviation(token) {
        return true;
    }
    let mut words = token.split_whitespace();
    matches!((words.next(), words.next(), words.next()), (Some("long"), Some("long"), None))
}

/// Canonical generic/container predicate: the spelling mentions one of the
/// [`GENERIC_KEYWORDS`].
pub fn is_generic_type(spelling: &str) -> bool {
    GENERIC_KEYWORDS.iter().any(|kw| spelling.contains(kw))
}
