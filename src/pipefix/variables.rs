//! Variable reference rewriting
//!
//!     Template authors write variables as `$name` or `$name.path.to.field`. The host engine
//!     reads them from a `Vars` map on the root context, so every read has to become a
//!     root-qualified path such as `$.Vars.name.path.to.field`.
//!
//!     This happens in two textual passes around the conversion:
//!
//!         1. Before lexing, `$name.path` becomes `Vars.name.path`, which lexes as a single
//!            identifier.
//!         2. After conversion, every `Vars.` that starts a path gets the root selector,
//!            giving `$.Vars.name.path`.
//!
//! Declarations
//!
//!     A reference immediately followed by `:=`, `=` or `:` is a declaration site and is
//!     left alone. Whitespace may separate the name from `:=` or `=` (`$a := 1`). A `:` only
//!     counts when adjacent, so `c ? $a : $b` still rewrites `$a`. `==` is a comparison,
//!     never a declaration.

use once_cell::sync::Lazy;
use regex::Regex;

static VARIABLE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\w+(?:\.\w+)*)").unwrap());

/// True when the text right after a `$name` match marks a declaration
fn is_declaration_suffix(after: &str) -> bool {
    if after.starts_with(':') {
        return true;
    }
    let trimmed = after.trim_start();
    trimmed.starts_with(":=") || (trimmed.starts_with('=') && !trimmed.starts_with("=="))
}

/// Pass 1: rewrite every `$name.path` read into `<namespace>.name.path`
pub fn rewrite_references(expr: &str, namespace: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut last = 0;

    for caps in VARIABLE_REF.captures_iter(expr) {
        let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&expr[last..whole.start()]);
        if is_declaration_suffix(&expr[whole.end()..]) {
            out.push_str(whole.as_str());
        } else {
            out.push_str(namespace);
            out.push('.');
            out.push_str(path.as_str());
        }
        last = whole.end();
    }

    if last == 0 {
        return expr.to_string();
    }
    out.push_str(&expr[last..]);
    out
}

/// Pass 2: qualifies the intermediate namespace marker with the root selector
#[derive(Debug, Clone)]
pub struct RootQualifier {
    marker: Regex,
    replacement: String,
}

impl RootQualifier {
    pub fn new(namespace: &str, root_selector: &str) -> Result<Self, regex::Error> {
        // the marker only counts where it starts a path
        let marker = Regex::new(&format!(r"(^|[^\w.$]){}\.", regex::escape(namespace)))?;
        let replacement = format!("${{1}}{}{}.", root_selector.replace('$', "$$"), namespace);
        Ok(RootQualifier {
            marker,
            replacement,
        })
    }

    pub fn qualify(&self, text: &str) -> String {
        self.marker
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("$a.b + 1", "Vars.a.b + 1")]
    #[case("$price * $qty", "Vars.price * Vars.qty")]
    #[case("$a == 1", "Vars.a == 1")]
    #[case("$a==1", "Vars.a==1")]
    #[case("c ? $a : $b", "c ? Vars.a : Vars.b")]
    #[case("$user.address.city_2", "Vars.user.address.city_2")]
    fn test_reads_are_rewritten(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(rewrite_references(input, "Vars"), expected);
    }

    #[rstest]
    #[case("$a := 1")]
    #[case("$a:=1")]
    #[case("$a = 2")]
    #[case("$a=2")]
    #[case("$a: x")]
    fn test_declarations_are_untouched(#[case] input: &str) {
        assert_eq!(rewrite_references(input, "Vars"), input);
    }

    #[test]
    fn test_declaration_with_read_on_the_right() {
        assert_eq!(
            rewrite_references("$total := $a + $b", "Vars"),
            "$total := Vars.a + Vars.b"
        );
    }

    #[test]
    fn test_no_match_is_identity() {
        assert_eq!(rewrite_references("a + 1", "Vars"), "a + 1");
        assert_eq!(rewrite_references("", "Vars"), "");
        assert_eq!(rewrite_references("$ + 1", "Vars"), "$ + 1");
    }

    #[test]
    fn test_custom_namespace() {
        assert_eq!(rewrite_references("$x", "Data"), "Data.x");
    }

    #[test]
    fn test_root_qualifier() {
        let q = RootQualifier::new("Vars", "$.").unwrap();
        assert_eq!(q.qualify("Vars.a | add Vars.b"), "$.Vars.a | add $.Vars.b");
        assert_eq!(q.qualify("(tern Vars.ok 1 2)"), "(tern $.Vars.ok 1 2)");
    }

    #[test]
    fn test_root_qualifier_only_at_path_start() {
        let q = RootQualifier::new("Vars", "$.").unwrap();
        assert_eq!(q.qualify("MyVars.a"), "MyVars.a");
        assert_eq!(q.qualify(".Vars.a"), ".Vars.a");
        assert_eq!(q.qualify("$.Vars.a"), "$.Vars.a");
        assert_eq!(q.qualify("Vars"), "Vars");
    }

    #[test]
    fn test_root_qualifier_custom_root() {
        let q = RootQualifier::new("Data", ".").unwrap();
        assert_eq!(q.qualify("Data.x | mul 2"), ".Data.x | mul 2");
    }
}
