//! The matcher rule language.
//!
//! ```text
//! Or      := And ('||' And)*
//! And     := Unary ('&&' Unary)*
//! Unary   := '!' Unary | Primary
//! Primary := Ident '(' BacktickString ')' | '(' Or ')'
//! ```
//!
//! Leaf predicates (identifier compared case-insensitively):
//!
//! | predicate | meaning |
//! |-----------|---------|
//! | `Name` / `NameRegexp` | full resource name |
//! | `Provider` / `ProviderRegexp` | token after the last `@` |
//! | `Entrypoint` / `EntrypointRegexp` | any of the entrypoints |
//! | `Service` / `ServiceRegexp` | referenced service name |
//!
//! Unknown identifiers are valid syntax and evaluate to `false`.

mod ast;
mod lexer;
mod parser;
mod program;
mod token;

pub use ast::{BinaryOp, Expr};
pub use lexer::tokenize;
pub use parser::parse;
pub use program::{matches, Program};
pub use token::{Token, TokenKind};

/// AND-combine a provider-level rule with a section-level rule.
///
/// Each non-blank side is wrapped in parentheses; a blank side is dropped.
///
/// ```
/// use weave::combine;
///
/// assert_eq!(combine("", ""), "");
/// assert_eq!(combine("P", ""), "P");
/// assert_eq!(combine("", "S"), "S");
/// assert_eq!(combine("A", "B"), "(A) && (B)");
/// ```
#[must_use]
pub fn combine(provider_rule: &str, section_rule: &str) -> String {
    match (is_blank(provider_rule), is_blank(section_rule)) {
        (true, true) => String::new(),
        (false, true) => provider_rule.to_string(),
        (true, false) => section_rule.to_string(),
        (false, false) => format!("({provider_rule}) && ({section_rule})"),
    }
}

/// A rule made only of whitespace compiles to the identity program.
///
/// ```
/// use weave::rule::is_blank;
///
/// assert!(is_blank(" \t"));
/// assert!(!is_blank("Name(`a`)"));
/// ```
#[must_use]
pub fn is_blank(rule: &str) -> bool {
    rule.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_table() {
        assert_eq!(combine("", ""), "");
        assert_eq!(combine("P", ""), "P");
        assert_eq!(combine("", "S"), "S");
        assert_eq!(combine("A", "B"), "(A) && (B)");
    }

    #[test]
    fn combine_treats_whitespace_as_empty() {
        assert_eq!(combine("  ", "S"), "S");
        assert_eq!(combine("P", "\t"), "P");
    }

    #[test]
    fn combine_keeps_precedence_of_each_side() {
        let rule = combine("Name(`a`) || Name(`b`)", "Provider(`file`)");
        let program = Program::compile(&rule).unwrap();

        let ctx = crate::MatcherContext::new("b@docker");
        assert!(!program.matches(&ctx));

        let ctx = crate::MatcherContext::new("b@file");
        assert!(!program.matches(&ctx)); // name is "b@file", not "b"

        let program = Program::compile(&combine(
            "NameRegexp(`^a`) || NameRegexp(`^b`)",
            "Provider(`file`)",
        ))
        .unwrap();
        assert!(program.matches(&crate::MatcherContext::new("b@file")));
        assert!(!program.matches(&crate::MatcherContext::new("b@docker")));
    }
}
