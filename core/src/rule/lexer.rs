//! Lexer: rule text → tokens.

use super::token::{Token, TokenKind};
use crate::RuleError;

/// Split a rule into tokens, always terminated by [`TokenKind::Eof`].
///
/// # Errors
///
/// Returns [`RuleError`] on a lone `&` or `|`, an unterminated backtick
/// string, or a character that starts no token.
///
/// ```
/// use weave::rule::{tokenize, TokenKind};
///
/// let tokens = tokenize("!Name(`a`)").unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Not,
///         TokenKind::Ident("Name".into()),
///         TokenKind::LParen,
///         TokenKind::Str("a".into()),
///         TokenKind::RParen,
///         TokenKind::Eof,
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, RuleError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '!' => TokenKind::Not,
            ',' => TokenKind::Comma,
            '&' | '|' => {
                if chars.next_if(|&(_, next)| next == c).is_none() {
                    return Err(RuleError::LoneOperator {
                        position: pos,
                        found: c,
                    });
                }
                if c == '&' {
                    TokenKind::And
                } else {
                    TokenKind::Or
                }
            }
            '`' => {
                let start = pos + c.len_utf8();
                let end = loop {
                    match chars.next() {
                        Some((end, '`')) => break end,
                        Some(_) => {}
                        None => return Err(RuleError::UnterminatedString { position: pos }),
                    }
                };
                TokenKind::Str(input[start..end].to_string())
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = pos + c.len_utf8();
                while let Some((next_pos, next)) =
                    chars.next_if(|&(_, n)| n.is_ascii_alphanumeric() || n == '_')
                {
                    end = next_pos + next.len_utf8();
                }
                TokenKind::Ident(input[pos..end].to_string())
            }
            other => {
                return Err(RuleError::UnexpectedChar {
                    position: pos,
                    found: other,
                })
            }
        };
        tokens.push(Token::new(kind, pos));
    }

    tokens.push(Token::new(TokenKind::Eof, input.len()));
    Ok(tokens)
}
