//! `Program` — a compiled, reusable rule.

use super::ast::{BinaryOp, Expr};
use super::parser::parse;
use crate::context::{EntrypointsInput, NameInput, ProviderInput, ServiceInput};
use crate::{
    ConstMatcher, DataInput, ExactMatcher, InputMatcher, MatcherContext, Predicate, RegexMatcher,
    RuleError, SinglePredicate,
};
use std::fmt;

/// A compiled rule.
///
/// Holds the parsed AST and the predicate it lowers to. A program compiled
/// from an empty rule has no expression and matches every context.
///
/// Programs are immutable and `Send + Sync`; compiling is cheap, so callers
/// recompile per pipeline pass instead of caching.
///
/// # Example
///
/// ```
/// use weave::{MatcherContext, Program};
///
/// let program = Program::compile("!Provider(`internal`)").unwrap();
/// assert!(program.matches(&MatcherContext::new("web@docker")));
/// assert!(!program.matches(&MatcherContext::new("api@internal")));
///
/// let identity = Program::compile("").unwrap();
/// assert!(identity.is_identity());
/// assert!(identity.matches(&MatcherContext::new("anything")));
/// ```
pub struct Program {
    source: String,
    expr: Option<Expr>,
    predicate: Option<Predicate<MatcherContext>>,
}

impl Program {
    /// Compile rule text.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when the rule is not valid syntax. Unknown
    /// predicate names and invalid regular expressions are not errors.
    pub fn compile(rule: &str) -> Result<Self, RuleError> {
        let expr = parse(rule)?;
        let predicate = expr.as_ref().map(lower);
        Ok(Self {
            source: rule.to_string(),
            expr,
            predicate,
        })
    }

    /// Evaluate against one resource context.
    #[must_use]
    pub fn matches(&self, ctx: &MatcherContext) -> bool {
        self.predicate.as_ref().map_or(true, |p| p.evaluate(ctx))
    }

    /// The rule text this program was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed expression, `None` for the identity program.
    #[must_use]
    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    /// `true` when compiled from an empty rule.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.expr.is_none()
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("source", &self.source)
            .field("predicate", &self.predicate)
            .finish()
    }
}

/// Evaluate an optional program; an absent program matches everything.
///
/// ```
/// use weave::{matches, MatcherContext};
///
/// assert!(matches(None, &MatcherContext::new("x")));
/// ```
#[must_use]
pub fn matches(program: Option<&Program>, ctx: &MatcherContext) -> bool {
    program.map_or(true, |p| p.matches(ctx))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Lowering: Expr → Predicate<MatcherContext>
// ═══════════════════════════════════════════════════════════════════════════════

fn lower(expr: &Expr) -> Predicate<MatcherContext> {
    match expr {
        Expr::Binary { op, .. } => {
            let operands = expr.chain(*op).into_iter().map(lower).collect();
            match op {
                BinaryOp::And => Predicate::And(operands),
                BinaryOp::Or => Predicate::Or(operands),
            }
        }
        Expr::Not(inner) => Predicate::Not(Box::new(lower(inner))),
        Expr::Call { name, arg } => lower_call(name, arg),
    }
}

/// Dispatch is total: every identifier lowers to some predicate.
fn lower_call(name: &str, arg: &str) -> Predicate<MatcherContext> {
    let (input, matcher): (Box<dyn DataInput<MatcherContext>>, Box<dyn InputMatcher>) =
        match name.to_ascii_lowercase().as_str() {
            "name" => (Box::new(NameInput), exact(arg)),
            "nameregexp" => (Box::new(NameInput), regex(name, arg)),
            "provider" => (Box::new(ProviderInput), exact(arg)),
            "providerregexp" => (Box::new(ProviderInput), regex(name, arg)),
            "entrypoint" => (Box::new(EntrypointsInput), exact(arg)),
            "entrypointregexp" => (Box::new(EntrypointsInput), regex(name, arg)),
            "service" => (Box::new(ServiceInput), exact(arg)),
            "serviceregexp" => (Box::new(ServiceInput), regex(name, arg)),
            _ => {
                tracing::debug!(predicate = %name, "unknown predicate evaluates to false");
                (Box::new(NameInput), Box::new(ConstMatcher::new(false)))
            }
        };
    Predicate::Single(SinglePredicate::new(input, matcher))
}

fn exact(arg: &str) -> Box<dyn InputMatcher> {
    Box::new(ExactMatcher::new(arg))
}

fn regex(predicate: &str, pattern: &str) -> Box<dyn InputMatcher> {
    if pattern.is_empty() {
        return Box::new(ConstMatcher::new(true));
    }
    match RegexMatcher::new(pattern) {
        Ok(matcher) => Box::new(matcher),
        Err(err) => {
            tracing::debug!(
                predicate = %predicate,
                pattern = %pattern,
                error = %err,
                "invalid pattern evaluates to false"
            );
            Box::new(ConstMatcher::new(false))
        }
    }
}
