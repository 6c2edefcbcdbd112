//! Boolean trees over data inputs.
//!
//! A leaf pairs a [`DataInput`] with an [`InputMatcher`]; inner nodes are
//! n-ary `And`/`Or` and unary `Not`. Compiled rules lower their AST into this
//! form and evaluate it once per resource.

use crate::{DataInput, InputMatcher, MatchingData};
use std::fmt;

/// A leaf: extract one field, test it with one matcher.
///
/// A field that yields [`MatchingData::None`] never matches, whatever the
/// matcher would say. Negation happens above the leaf, so `!Service(..)`
/// is still `true` for a resource without a service.
pub struct SinglePredicate<Ctx> {
    input: Box<dyn DataInput<Ctx>>,
    matcher: Box<dyn InputMatcher>,
}

impl<Ctx> SinglePredicate<Ctx> {
    #[must_use]
    pub fn new(input: Box<dyn DataInput<Ctx>>, matcher: Box<dyn InputMatcher>) -> Self {
        Self { input, matcher }
    }

    pub fn evaluate(&self, ctx: &Ctx) -> bool {
        match self.input.get(ctx) {
            MatchingData::None => false,
            data => self.matcher.matches(&data),
        }
    }
}

impl<Ctx> fmt::Debug for SinglePredicate<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinglePredicate")
            .field("input", &self.input)
            .field("matcher", &self.matcher)
            .finish()
    }
}

/// A predicate tree.
///
/// `And` and `Or` short-circuit left to right. An empty `And` is `true`, an
/// empty `Or` is `false`; the parser never produces either.
pub enum Predicate<Ctx> {
    Single(SinglePredicate<Ctx>),
    And(Vec<Predicate<Ctx>>),
    Or(Vec<Predicate<Ctx>>),
    Not(Box<Predicate<Ctx>>),
}

impl<Ctx> Predicate<Ctx> {
    /// Recursion is bounded by [`MAX_DEPTH`](crate::MAX_DEPTH): the parser
    /// rejects deeper rules before a tree is built, and chains are flat.
    pub fn evaluate(&self, ctx: &Ctx) -> bool {
        match self {
            Self::Single(leaf) => leaf.evaluate(ctx),
            Self::And(operands) => operands.iter().all(|p| p.evaluate(ctx)),
            Self::Or(operands) => operands.iter().any(|p| p.evaluate(ctx)),
            Self::Not(inner) => !inner.evaluate(ctx),
        }
    }
}

impl<Ctx> fmt::Debug for Predicate<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(leaf) => f.debug_tuple("Single").field(leaf).finish(),
            Self::And(operands) => f.debug_tuple("And").field(operands).finish(),
            Self::Or(operands) => f.debug_tuple("Or").field(operands).finish(),
            Self::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstMatcher, ExactMatcher, RegexMatcher};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// A resource with one optional label.
    struct Labelled(Option<&'static str>);

    #[derive(Debug)]
    struct Label;

    impl DataInput<Labelled> for Label {
        fn get(&self, ctx: &Labelled) -> MatchingData {
            ctx.0.map_or(MatchingData::None, MatchingData::from)
        }
    }

    fn label_is(value: &str) -> Predicate<Labelled> {
        Predicate::Single(SinglePredicate::new(
            Box::new(Label),
            Box::new(ExactMatcher::new(value)),
        ))
    }

    fn label_matches(pattern: &str) -> Predicate<Labelled> {
        Predicate::Single(SinglePredicate::new(
            Box::new(Label),
            Box::new(RegexMatcher::new(pattern).unwrap()),
        ))
    }

    #[test]
    fn leaf_reads_and_matches() {
        let leaf = label_is("web");
        assert!(leaf.evaluate(&Labelled(Some("web"))));
        assert!(!leaf.evaluate(&Labelled(Some("api"))));
    }

    #[test]
    fn missing_field_never_matches() {
        let always = SinglePredicate::new(Box::new(Label), Box::new(ConstMatcher::new(true)));
        assert!(!always.evaluate(&Labelled(None)));

        // ...but negation of a missing field holds.
        let negated = Predicate::Not(Box::new(label_is("web")));
        assert!(negated.evaluate(&Labelled(None)));
    }

    #[test]
    fn and_or_not() {
        let both = Predicate::And(vec![label_matches("^web"), label_matches("secure$")]);
        assert!(both.evaluate(&Labelled(Some("websecure"))));
        assert!(!both.evaluate(&Labelled(Some("web"))));

        let either = Predicate::Or(vec![label_is("a"), label_is("b")]);
        assert!(either.evaluate(&Labelled(Some("b"))));
        assert!(!either.evaluate(&Labelled(Some("c"))));

        assert!(Predicate::Not(Box::new(either)).evaluate(&Labelled(Some("c"))));
    }

    #[test]
    fn empty_operand_lists() {
        let ctx = Labelled(Some("x"));
        assert!(Predicate::<Labelled>::And(vec![]).evaluate(&ctx));
        assert!(!Predicate::<Labelled>::Or(vec![]).evaluate(&ctx));
    }

    #[test]
    fn evaluation_short_circuits() {
        #[derive(Debug)]
        struct Counting(Arc<AtomicUsize>);

        impl DataInput<Labelled> for Counting {
            fn get(&self, ctx: &Labelled) -> MatchingData {
                self.0.fetch_add(1, Ordering::Relaxed);
                ctx.0.map_or(MatchingData::None, MatchingData::from)
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = || {
            Predicate::Single(SinglePredicate::new(
                Box::new(Counting(Arc::clone(&calls))),
                Box::new(ConstMatcher::new(true)),
            ))
        };

        let any = Predicate::Or(vec![label_is("x"), counted()]);
        assert!(any.evaluate(&Labelled(Some("x"))));

        let all = Predicate::And(vec![label_is("y"), counted()]);
        assert!(!all.evaluate(&Labelled(Some("x"))));

        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn debug_shows_structure() {
        let tree = Predicate::Not(Box::new(label_is("x")));
        let debug = format!("{tree:?}");
        assert!(debug.starts_with("Not(Single("));
        assert!(debug.contains("ExactMatcher"));
    }
}
