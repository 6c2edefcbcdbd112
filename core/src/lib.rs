//! weave - matcher DSL and predicate engine for dynamic proxy configuration
//!
//! Rule strings such as ``Provider(`docker`) && !NameRegexp(`^internal-`)``
//! compile into a reusable [`Program`] that decides whether a resource
//! (router, service, middleware, transport) is selected.
//!
//! # Architecture
//!
//! ```text
//! rule text ──lexer──▶ tokens ──parser──▶ Expr (AST) ──lower──▶ Predicate<MatcherContext>
//!                                                                     │
//!                                         MatcherContext ──evaluate───┘
//! ```
//!
//! The evaluation substrate is type-erased at the data level:
//!
//! - [`MatchingData`] — Erased data (string or list of strings)
//! - [`DataInput<Ctx>`] — Domain-specific extraction, returns `MatchingData`
//! - [`InputMatcher`] — Domain-agnostic matching (non-generic, shareable)
//! - [`SinglePredicate<Ctx>`] — Combines `DataInput` + `InputMatcher`
//! - [`Predicate<Ctx>`] — Boolean composition (And, Or, Not)
//!
//! # Key Invariants
//!
//! 1. **Syntax and semantics are independent**: a rule either fails to compile
//!    ([`RuleError`]) or compiles to a total predicate. Unknown predicate names
//!    and invalid regular expressions evaluate to `false`, they never error.
//!
//! 2. **Empty rule matches everything**: `Program::compile("")` produces the
//!    identity program, distinct from a compile failure.
//!
//! # Example
//!
//! ```
//! use weave::prelude::*;
//!
//! let program = Program::compile("Provider(`docker`) && EntrypointRegexp(`^web`)").unwrap();
//!
//! let ctx = MatcherContext::new("whoami@docker").with_entrypoints(["websecure"]);
//! assert!(program.matches(&ctx));
//!
//! let ctx = MatcherContext::new("whoami@file").with_entrypoints(["websecure"]);
//! assert!(!program.matches(&ctx));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod context;
mod data_input;
mod error;
mod input_matcher;
mod matching_data;
mod predicate;
pub mod rule;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use data_input::DataInput;
pub use input_matcher::InputMatcher;
pub use matching_data::MatchingData;
pub use predicate::{Predicate, SinglePredicate};

// Concrete matchers
pub use input_matcher::{ConstMatcher, ExactMatcher, RegexMatcher};

// Resource context
pub use context::{
    extract_provider, strip_provider, EntrypointsInput, MatcherContext, NameInput, ProviderInput,
    ServiceInput,
};

// Rule language
pub use error::RuleError;
pub use rule::{combine, matches, BinaryOp, Expr, Program};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use weave::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Rule language
        combine,
        // Context
        extract_provider,
        strip_provider,
        // Concrete matchers
        ConstMatcher,
        // Traits
        DataInput,
        ExactMatcher,
        Expr,
        InputMatcher,
        MatcherContext,
        MatchingData,
        // Core types
        Predicate,
        Program,
        RegexMatcher,
        // Errors
        RuleError,
        SinglePredicate,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum nesting depth of a rule (parenthesized groups and negations).
///
/// Deeper rules fail to compile with [`RuleError::DepthExceeded`], which keeps
/// parsing, lowering and evaluation recursion bounded for hostile input.
pub const MAX_DEPTH: usize = 32;

/// Maximum number of operands in a single `&&` or `||` chain.
///
/// Width-based counterpart of [`MAX_DEPTH`].
pub const MAX_PREDICATES_PER_COMPOUND: usize = 256;

/// Maximum length for regex patterns in `*Regexp` predicates.
///
/// Longer patterns are treated like invalid ones: the predicate evaluates to
/// `false`.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;
