//! Rule compilation errors.
//!
//! Every variant belongs to the same class: the rule text is not valid
//! matcher syntax. Callers that filter with a rule treat any of them as
//! "match nothing".

use thiserror::Error;

/// A rule failed to compile.
///
/// Only syntax is checked at compile time. Unknown predicate names and
/// invalid regular expressions compile fine and evaluate to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A character that starts no token.
    #[error("invalid rule syntax at offset {position}: unexpected character {found:?}")]
    UnexpectedChar {
        /// Byte offset in the rule text.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// A single `&` or `|` where `&&` or `||` was expected.
    #[error("invalid rule syntax at offset {position}: expected `{found}{found}`, found a single `{found}`")]
    LoneOperator {
        /// Byte offset in the rule text.
        position: usize,
        /// `&` or `|`.
        found: char,
    },

    /// A backtick string without its closing backtick.
    #[error("invalid rule syntax at offset {position}: unterminated string literal")]
    UnterminatedString {
        /// Byte offset of the opening backtick.
        position: usize,
    },

    /// The token stream does not fit the grammar.
    #[error("invalid rule syntax at offset {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        /// Byte offset of the offending token.
        position: usize,
        /// What the parser was looking for.
        expected: &'static str,
        /// Description of the token found instead.
        found: String,
    },

    /// Parentheses and negations nest deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("invalid rule syntax: nesting depth exceeds {max}")]
    DepthExceeded {
        /// Maximum allowed depth.
        max: usize,
    },

    /// A single `&&`/`||` chain has more than
    /// [`MAX_PREDICATES_PER_COMPOUND`](crate::MAX_PREDICATES_PER_COMPOUND) operands.
    #[error("invalid rule syntax: more than {max} operands in one `{operator}` chain")]
    TooManyOperands {
        /// `&&` or `||`.
        operator: &'static str,
        /// Maximum allowed operands.
        max: usize,
    },
}

impl RuleError {
    /// Byte offset of the error in the rule text, when it has one.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UnexpectedChar { position, .. }
            | Self::LoneOperator { position, .. }
            | Self::UnterminatedString { position }
            | Self::UnexpectedToken { position, .. } => Some(*position),
            Self::DepthExceeded { .. } | Self::TooManyOperands { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_variants_read_as_syntax_errors() {
        let errors = [
            RuleError::UnexpectedChar {
                position: 0,
                found: '#',
            },
            RuleError::LoneOperator {
                position: 3,
                found: '&',
            },
            RuleError::UnterminatedString { position: 5 },
            RuleError::UnexpectedToken {
                position: 1,
                expected: "`(`",
                found: "end of input".into(),
            },
            RuleError::DepthExceeded { max: 32 },
            RuleError::TooManyOperands {
                operator: "&&",
                max: 256,
            },
        ];
        for err in errors {
            assert!(err.to_string().starts_with("invalid rule syntax"), "{err}");
        }
    }

    #[test]
    fn lone_operator_message() {
        let err = RuleError::LoneOperator {
            position: 7,
            found: '|',
        };
        assert_eq!(
            err.to_string(),
            "invalid rule syntax at offset 7: expected `||`, found a single `|`"
        );
        assert_eq!(err.position(), Some(7));
    }

    #[test]
    fn limits_have_no_position() {
        assert_eq!(RuleError::DepthExceeded { max: 32 }.position(), None);
    }
}
