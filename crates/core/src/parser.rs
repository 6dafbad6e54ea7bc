//! Call detection on a single line.
//!
//! Two shapes are recognized, each tried independently:
//!
//! - assignment: `[type] name = <expr>;`: every `ident(` inside `<expr>` is a call
//! - standalone: `ident(<args>);`: returns `void`
//!
//! Anything else yields no calls.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::FunctionCall;

// Identifiers are ASCII `[[:word:]]`, never Unicode `\w`.
static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([[:word:]]+)\s+)?([[:word:]]+)\s*=\s*(.+);$").unwrap()
});

static STANDALONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([[:word:]]+)\((.*)\);$").unwrap());

static CALL_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([[:word:]]+)\s*\(").unwrap());

/// Return type used for assignment-shape calls when nothing better is known.
pub const DEFAULT_RETURN_TYPE: &str = "int";

/// Extract calls from a trimmed line with no variable context.
/// Assignments without a declared type return `int`.
pub fn extract_calls(text: &str) -> Vec<FunctionCall> {
    extract_calls_with(text, |_| None)
}

/// Extract calls from a trimmed line. `assigned_type` is consulted for
/// assignments without a declared type, with the assigned identifier.
pub fn extract_calls_with<F>(text: &str, assigned_type: F) -> Vec<FunctionCall>
where
    F: FnOnce(&str) -> Option<String>,
{
    let mut calls = Vec::new();

    if let Some(caps) = ASSIGNMENT_RE.captures(text) {
        let expression = &caps[3];
        let found = calls_in_expression(expression);
        if !found.is_empty() {
            let return_type = match caps.get(1) {
                Some(declared) => declared.as_str().to_string(),
                None => assigned_type(&caps[2])
                    .unwrap_or_else(|| DEFAULT_RETURN_TYPE.to_string()),
            };
            for (name, args) in found {
                calls.push(FunctionCall { name, args, return_type: return_type.clone() });
            }
        }
    }

    if let Some(caps) = STANDALONE_RE.captures(text) {
        calls.push(FunctionCall {
            name: caps[1].to_string(),
            args: split_arguments(&caps[2]),
            return_type: "void".to_string(),
        });
    }

    calls
}

/// Every `ident(` in an expression with a balanced close paren.
/// Paren matching is not quote-aware.
fn calls_in_expression(expression: &str) -> Vec<(String, Vec<String>)> {
    let mut out = Vec::new();
    for caps in CALL_OPEN_RE.captures_iter(expression) {
        let whole = caps.get(0).unwrap();
        let open = whole.end() - 1;
        if let Some(close) = find_matching_paren(expression, open) {
            out.push((caps[1].to_string(), split_arguments(&expression[open + 1..close])));
        }
    }
    out
}

/// Byte index of the `)` closing the `(` at `open`, by depth counting.
fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, b) in text.bytes().enumerate().skip(open + 1) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split an argument list on top-level commas, outside quotes.
///
/// Quotes open on `"` or `'` and close on the same character (no escapes).
/// Pieces are trimmed; an empty final piece is dropped.
pub fn split_arguments(args: &str) -> Vec<String> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;

    for ch in args.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' => {
                    depth -= 1;
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    out.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        out.push(last.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[&str], ret: &str) -> FunctionCall {
        FunctionCall {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            return_type: ret.to_string(),
        }
    }

    #[test]
    fn test_split_respects_parens_and_quotes() {
        assert_eq!(split_arguments(r#"a, f(b,c), "x,y""#), vec!["a", "f(b,c)", r#""x,y""#]);
    }

    #[test]
    fn test_split_single_quotes_and_blank() {
        assert_eq!(split_arguments("','  , 'a'"), vec!["','", "'a'"]);
        assert!(split_arguments("").is_empty());
        assert!(split_arguments("   ").is_empty());
    }

    #[test]
    fn test_split_keeps_inner_empty_pieces() {
        assert_eq!(split_arguments("a,,b,"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_declared_assignment() {
        let calls = extract_calls("int x = add(1, 2);");
        assert_eq!(calls, vec![call("add", &["1", "2"], "int")]);
    }

    #[test]
    fn test_auto_and_custom_declared_types() {
        assert_eq!(extract_calls("auto r = solve(n);"), vec![call("solve", &["n"], "auto")]);
        assert_eq!(extract_calls("vi v = read(n);"), vec![call("read", &["n"], "vi")]);
    }

    #[test]
    fn test_undeclared_assignment_uses_resolver_then_default() {
        assert_eq!(extract_calls("x = twice(y);"), vec![call("twice", &["y"], "int")]);

        let calls = extract_calls_with("total = sum(xs);", |var| {
            assert_eq!(var, "total");
            Some("double".to_string())
        });
        assert_eq!(calls, vec![call("sum", &["xs"], "double")]);
    }

    #[test]
    fn test_nested_calls_in_expression() {
        let calls = extract_calls("int y = outer(inner(1), 2) + other();");
        let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner", "other"]);
        assert_eq!(calls[0].args, vec!["inner(1)", "2"]);
        assert!(calls[2].args.is_empty());
    }

    #[test]
    fn test_unbalanced_call_is_skipped() {
        assert!(extract_calls("int y = broken(1, 2;").is_empty());
    }

    #[test]
    fn test_standalone_call_is_void() {
        assert_eq!(extract_calls("print(scores);"), vec![call("print", &["scores"], "void")]);
        assert_eq!(extract_calls("reset();"), vec![call("reset", &[], "void")]);
    }

    #[test]
    fn test_rejected_shapes() {
        for line in [
            "",
            "int x;",
            "x = 5;",
            "return foo(1);",
            "print (x);",
            "foo(1)",
            "obj.method(1);",
            "long long x = f(1);",
            "// add(1, 2);",
        ] {
            assert!(extract_calls(line).is_empty(), "expected no calls for {line:?}");
        }
    }

    #[test]
    fn test_call_inside_string_is_detected() {
        let calls = extract_calls(r#"string s = "fake(1)";"#);
        assert_eq!(calls, vec![call("fake", &["1"], "string")]);
    }

    #[test]
    fn test_identifiers_are_ascii_only() {
        assert!(extract_calls("int é = f(1);").is_empty());
        assert!(extract_calls("größe = f(1);").is_empty());
        assert!(extract_calls("drücken(1);").is_empty());
        assert_eq!(extract_calls("int e = f(1);"), vec![call("f", &["1"], "int")]);
    }
}
