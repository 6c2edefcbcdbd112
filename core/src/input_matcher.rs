//! `InputMatcher` — Domain-agnostic value matching
//!
//! The `InputMatcher` trait matches against type-erased `MatchingData`.
//! It is intentionally **non-generic** — matchers can be shared across
//! different context types.
//!
//! # Available Matchers
//!
//! - [`ExactMatcher`] — Exact string equality
//! - [`RegexMatcher`] — Regular-expression search (unanchored)
//! - [`ConstMatcher`] — Constant result, independent of the data
//!
//! List data matches when any element matches.

use crate::{MatchingData, MAX_REGEX_PATTERN_LENGTH};
use std::fmt::{self, Debug};

/// Matches against type-erased [`MatchingData`].
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to support concurrent evaluation.
///
/// # Example
///
/// ```
/// use weave::{InputMatcher, MatchingData, ExactMatcher};
///
/// let matcher = ExactMatcher::new("hello");
/// assert!(matcher.matches(&MatchingData::String("hello".to_string())));
/// assert!(!matcher.matches(&MatchingData::String("world".to_string())));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `InputMatcher`",
    label = "this type cannot match against MatchingData",
    note = "InputMatcher is domain-agnostic — use built-in matchers (ExactMatcher, RegexMatcher, ConstMatcher) or implement the `matches(&self, &MatchingData) -> bool` method"
)]
pub trait InputMatcher: Send + Sync + Debug {
    /// Check if the given value matches.
    ///
    /// Returns `false` if the value type is incompatible with this matcher.
    fn matches(&self, value: &MatchingData) -> bool;
}

// Blanket implementation for boxed InputMatchers
#[diagnostic::do_not_recommend]
impl InputMatcher for Box<dyn InputMatcher> {
    fn matches(&self, value: &MatchingData) -> bool {
        (**self).matches(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// String Matchers
// ═══════════════════════════════════════════════════════════════════════════════

/// Exact string equality matcher.
///
/// Matches when the input string exactly equals the expected value, or for
/// list data, when the expected value is one of the elements.
///
/// # Example
///
/// ```
/// use weave::{InputMatcher, MatchingData, ExactMatcher};
///
/// let matcher = ExactMatcher::new("web");
/// assert!(matcher.matches(&"web".into()));
/// assert!(!matcher.matches(&"Web".into())); // case-sensitive
/// assert!(matcher.matches(&MatchingData::List(vec!["web".into(), "websecure".into()])));
/// ```
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    expected: String,
}

impl ExactMatcher {
    /// Create a new exact matcher with the given expected value.
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Returns the expected value.
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl InputMatcher for ExactMatcher {
    fn matches(&self, value: &MatchingData) -> bool {
        value.any_str(|s| s == self.expected)
    }
}

/// Regular-expression matcher.
///
/// Uses search semantics: the pattern may match anywhere in the input unless
/// it is anchored with `^`/`$`. Backed by the `regex` crate, which guarantees
/// linear-time matching (no `ReDoS`).
///
/// # Example
///
/// ```
/// use weave::{InputMatcher, MatchingData, RegexMatcher};
///
/// let matcher = RegexMatcher::new(r"^api-\d+$").unwrap();
/// assert!(matcher.matches(&"api-12".into()));
/// assert!(!matcher.matches(&"api-x".into()));
///
/// let matcher = RegexMatcher::new("secure").unwrap();
/// assert!(matcher.matches(&"websecure".into())); // unanchored search
/// ```
#[derive(Clone)]
pub struct RegexMatcher {
    regex: regex::Regex,
}

impl RegexMatcher {
    /// Compile a regex matcher.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the pattern is invalid or longer than
    /// [`MAX_REGEX_PATTERN_LENGTH`](crate::MAX_REGEX_PATTERN_LENGTH).
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        if pattern.len() > MAX_REGEX_PATTERN_LENGTH {
            return Err(regex::Error::Syntax(format!(
                "pattern length is {}, but maximum allowed is {MAX_REGEX_PATTERN_LENGTH}",
                pattern.len()
            )));
        }
        regex::Regex::new(pattern).map(|regex| Self { regex })
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Debug for RegexMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RegexMatcher").field(&self.pattern()).finish()
    }
}

impl InputMatcher for RegexMatcher {
    fn matches(&self, value: &MatchingData) -> bool {
        value.any_str(|s| self.regex.is_match(s))
    }
}

/// Matcher with a fixed outcome.
///
/// Keeps predicate dispatch total: empty `*Regexp` patterns lower to
/// `ConstMatcher::new(true)`, while unknown predicate names and invalid
/// patterns lower to `ConstMatcher::new(false)`.
///
/// # Example
///
/// ```
/// use weave::{InputMatcher, MatchingData, ConstMatcher};
///
/// assert!(ConstMatcher::new(true).matches(&MatchingData::List(vec![])));
/// assert!(!ConstMatcher::new(false).matches(&"anything".into()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConstMatcher {
    outcome: bool,
}

impl ConstMatcher {
    /// Create a matcher that always returns `outcome`.
    #[must_use]
    pub fn new(outcome: bool) -> Self {
        Self { outcome }
    }

    /// Returns the fixed outcome.
    #[must_use]
    pub fn outcome(&self) -> bool {
        self.outcome
    }
}

impl InputMatcher for ConstMatcher {
    fn matches(&self, _value: &MatchingData) -> bool {
        self.outcome
    }
}
