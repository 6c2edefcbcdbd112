//! Tokens of the rule language.

use std::fmt;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier: ASCII letter, then letters, digits or `_`.
    Ident(String),
    /// Backtick-delimited string literal (content only, no escapes).
    Str(String),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,
    /// `,` — reserved, no grammar rule accepts it.
    Comma,
    /// End of input.
    Eof,
}

/// A token with its byte offset in the rule text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub position: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "identifier `{name}`"),
            Self::Str(value) => write!(f, "string `{value}`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::And => f.write_str("`&&`"),
            Self::Or => f.write_str("`||`"),
            Self::Not => f.write_str("`!`"),
            Self::Comma => f.write_str("`,`"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}
