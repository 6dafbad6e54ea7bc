// ---------------------------------------------------------------------------
// Stub rendering
// ---------------------------------------------------------------------------

use crate::typedef::is_generic_type;
use crate::types::{DEFAULT_INDENT_WIDTH, MAX_INDENT_WIDTH};

/// Formatting knobs for generated stubs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubStyle {
    pub indent: String,
}

impl StubStyle {
    /// Indent the body by `width` spaces, at most [`MAX_INDENT_WIDTH`].
    pub fn with_indent_width(width: usize) -> Self {
        Self { indent: " ".repeat(width.min(MAX_INDENT_WIDTH)) }
    }

    /// Render a complete stub block, ending with a blank line.
    pub fn render(&self, name: &str, args: &[String], return_type: &str) -> String {
        let mut out = format!("{return_type} {name}({}) {{\n", args.join(", "));
        out.push_str(&format!("{}// TODO: implement {name}()\n", self.indent));
        if return_type != "void" {
            let (value, note) = default_return(return_type);
            out.push_str(&format!("{}return {value};", self.indent));
            if let Some(note) = note {
                out.push_str(&format!("  // {note}"));
            }
            out.push('\n');
        }
        out.push_str("}\n\n");
        out
    }
}

impl Default for StubStyle {
    fn default() -> Self {
        Self::with_indent_width(DEFAULT_INDENT_WIDTH)
    }
}

/// Render a stub with the default style.
pub fn generate_stub(name: &str, args: &[String], return_type: &str) -> String {
    StubStyle::default().render(name, args, return_type)
}

/// Placeholder value returned by a stub of the given type, plus a trailing
/// comment for types the value is only a guess for.
pub fn default_return(return_type: &str) -> (&'static str, Option<&'static str>) {
    match return_type.to_lowercase().as_str() {
        "int" | "long" | "long long" | "ll" | "short" | "size_t" => ("0", None),
        "double" | "float" => ("0.0", None),
        "bool" => ("false", None),
        "char" => (r"'\0'", None),
        "string" => (r#""""#, None),
        "auto" => ("0", Some("Change this based on actual return type needed")),
        _ if is_generic_type(return_type) => ("{}", None),
        _ => ("{}", Some("Default initialization")),
    }
}

/// Number of lines a rendered stub occupies once inserted.
pub fn line_span(stub: &str) -> usize {
    stub.matches('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_int_stub() {
        let stub = generate_stub("add", &args(&["int arg0", "int arg1"]), "int");
        assert_eq!(
            stub,
            "int add(int arg0, int arg1) {\n    // TODO: implement add()\n    return 0;\n}\n\n"
        );
        assert_eq!(line_span(&stub), 5);
    }

    #[test]
    fn test_void_stub_has_no_return() {
        let stub = generate_stub("print", &args(&["vector<int> scores"]), "void");
        assert_eq!(stub, "void print(vector<int> scores) {\n    // TODO: implement print()\n}\n\n");
        assert!(!stub.contains("return"), "void stub should not return, got:\n{stub}");
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_return("Long Long"), ("0", None));
        assert_eq!(default_return("size_t"), ("0", None));
        assert_eq!(default_return("float"), ("0.0", None));
        assert_eq!(default_return("BOOL"), ("false", None));
        assert_eq!(default_return("char"), ("'\\0'", None));
        assert_eq!(default_return("string"), ("\"\"", None));
        assert_eq!(default_return("auto").0, "0");
        assert!(default_return("auto").1.is_some());
        assert_eq!(default_return("vector<int>"), ("{}", None));
        assert_eq!(default_return("map<int, string>"), ("{}", None));
        assert_eq!(default_return("Widget"), ("{}", Some("Default initialization")));
        // Abbreviations are not expanded before classification.
        assert_eq!(default_return("vi"), ("{}", Some("Default initialization")));
    }

    #[test]
    fn test_note_follows_semicolon() {
        let stub = generate_stub("make", &[], "Widget");
        assert!(
            stub.contains("    return {};  // Default initialization\n"),
            "comment must not swallow the semicolon, got:\n{stub}"
        );
    }

    #[test]
    fn test_indent_width_is_capped() {
        let style = StubStyle::with_indent_width(usize::MAX / 2);
        assert_eq!(style.indent.len(), MAX_INDENT_WIDTH);
    }

    #[test]
    fn test_custom_indent() {
        let stub = StubStyle::with_indent_width(2).render("f", &[], "bool");
        assert_eq!(stub, "bool f() {\n  // TODO: implement f()\n  return false;\n}\n\n");
    }
}
