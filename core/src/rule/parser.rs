//! Recursive-descent parser: tokens → [`Expr`].

use super::ast::{BinaryOp, Expr};
use super::lexer::tokenize;
use super::token::{Token, TokenKind};
use crate::{RuleError, MAX_DEPTH, MAX_PREDICATES_PER_COMPOUND};

/// Parse a rule into its AST.
///
/// Returns `Ok(None)` for an empty (or whitespace-only) rule.
///
/// # Errors
///
/// Returns [`RuleError`] if the rule does not lex or does not fit the
/// grammar. There is no partial result.
///
/// ```
/// use weave::rule::parse;
/// use weave::{BinaryOp, Expr};
///
/// let expr = parse("Name(`a`) || !Provider(`b`)").unwrap().unwrap();
/// assert_eq!(
///     expr,
///     Expr::binary(BinaryOp::Or, Expr::call("Name", "a"), Expr::not(Expr::call("Provider", "b")))
/// );
/// assert_eq!(parse("   ").unwrap(), None);
/// ```
pub fn parse(input: &str) -> Result<Option<Expr>, RuleError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens);

    if parser.peek() == &TokenKind::Eof {
        return Ok(None);
    }

    let expr = parser.parse_or()?;
    parser.expect(&TokenKind::Eof, "`&&`, `||` or end of input")?;
    Ok(Some(expr))
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    /// The lexer always terminates the stream with `Eof`, and the cursor
    /// never moves past it.
    fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.cursor.min(last)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.cursor += 1;
        }
        token
    }

    fn unexpected(&self, expected: &'static str) -> RuleError {
        let token = self.current();
        RuleError::UnexpectedToken {
            position: token.position,
            expected,
            found: token.kind.to_string(),
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<Token, RuleError> {
        if self.peek() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn enter(&mut self) -> Result<(), RuleError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(RuleError::DepthExceeded { max: MAX_DEPTH });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_or(&mut self) -> Result<Expr, RuleError> {
        self.parse_chain(BinaryOp::Or, TokenKind::Or, Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Expr, RuleError> {
        self.parse_chain(BinaryOp::And, TokenKind::And, Self::parse_unary)
    }

    /// `operand (op operand)*`, folded to the left.
    fn parse_chain(
        &mut self,
        op: BinaryOp,
        separator: TokenKind,
        operand: fn(&mut Self) -> Result<Expr, RuleError>,
    ) -> Result<Expr, RuleError> {
        let mut lhs = operand(self)?;
        let mut count = 1;

        while self.peek() == &separator {
            self.advance();
            count += 1;
            if count > MAX_PREDICATES_PER_COMPOUND {
                return Err(RuleError::TooManyOperands {
                    operator: op.as_str(),
                    max: MAX_PREDICATES_PER_COMPOUND,
                });
            }
            let rhs = operand(self)?;
            lhs = Expr::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, RuleError> {
        if self.peek() == &TokenKind::Not {
            self.advance();
            self.enter()?;
            let inner = self.parse_unary()?;
            self.leave();
            return Ok(Expr::not(inner));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, RuleError> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                self.expect(&TokenKind::LParen, "`(` after predicate name")?;
                let arg = match self.peek().clone() {
                    TokenKind::Str(value) => {
                        self.advance();
                        value
                    }
                    _ => return Err(self.unexpected("backtick string argument")),
                };
                self.expect(&TokenKind::RParen, "`)` after predicate argument")?;
                Ok(Expr::Call { name, arg })
            }
            TokenKind::LParen => {
                self.advance();
                self.enter()?;
                let inner = self.parse_or()?;
                self.leave();
                self.expect(&TokenKind::RParen, "`)` closing group")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("predicate call, `!` or `(`")),
        }
    }
}
