//! weave-test: conformance fixtures for the rule language
//!
//! Fixtures are YAML documents pairing one rule with resource contexts and
//! the expected outcome. The same files can drive any implementation of the
//! language; this crate runs them against [`weave::Program`].
//!
//! # Example
//!
//! ```
//! use weave_test::prelude::*;
//!
//! let fixture = Fixture::from_yaml(r#"
//! name: provider exclusion
//! rule: "!Provider(`internal`)"
//! cases:
//!   - name: docker router kept
//!     context: { name: whoami@docker }
//!     expect: true
//!   - name: internal router dropped
//!     context: { name: api@internal }
//!     expect: false
//! "#).unwrap();
//!
//! fixture.run_and_assert();
//! ```

pub mod fixture;

pub use fixture::{CaseResult, CaseContext, Fixture, TestCase};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{CaseResult, CaseContext, Fixture, TestCase};
    pub use weave::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave::MatcherContext;

    #[test]
    fn context_spec_builds_matcher_context() {
        let case = CaseContext {
            name: "web@docker".into(),
            entrypoints: vec!["web".into(), "websecure".into()],
            service: "whoami@docker".into(),
        };
        let ctx = case.build();

        assert_eq!(ctx.name(), "web@docker");
        assert_eq!(ctx.provider(), "docker");
        assert_eq!(ctx.entrypoints(), ["web", "websecure"]);
        assert_eq!(ctx.service(), "whoami@docker");
    }

    #[test]
    fn context_spec_defaults_are_empty() {
        let case: CaseContext = serde_yaml::from_str("name: bare").unwrap();
        let ctx = case.build();
        assert_eq!(ctx.provider(), "");
        assert!(ctx.entrypoints().is_empty());
        assert_eq!(ctx.service(), "");
        assert_eq!(MatcherContext::new("bare").name(), ctx.name());
    }
}
