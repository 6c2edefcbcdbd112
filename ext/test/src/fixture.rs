//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the rule compiler.
//!
//! A fixture either expects its rule to compile, in which case every case
//! states whether its context matches, or sets `compile_error: true` and has
//! no cases.

use serde::Deserialize;
use weave::{MatcherContext, Program};

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rule: String,
    /// The rule must be rejected at compile time.
    #[serde(default)]
    pub compile_error: bool,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub context: CaseContext,
    pub expect: bool,
}

/// The resource a case evaluates against.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CaseContext {
    pub name: String,
    pub entrypoints: Vec<String>,
    pub service: String,
}

impl CaseContext {
    /// Build the matcher context for this resource.
    #[must_use]
    pub fn build(&self) -> MatcherContext {
        MatcherContext::new(self.name.as_str())
            .with_entrypoints(self.entrypoints.iter().cloned())
            .with_service(self.service.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    ///
    /// A compile outcome that contradicts `compile_error` is reported as a
    /// single failed case named `compile`.
    pub fn run(&self) -> Vec<CaseResult> {
        let program = match (Program::compile(&self.rule), self.compile_error) {
            (Ok(program), false) => program,
            (Err(_), true) => return Vec::new(),
            (Ok(_), true) => return vec![compile_result("compile error", "compiled")],
            (Err(err), false) => return vec![compile_result("compiled", &err.to_string())],
        };

        self.cases
            .iter()
            .map(|case| {
                let actual = program.matches(&case.context.build());
                CaseResult {
                    case_name: case.name.clone(),
                    passed: actual == case.expect,
                    expected: case.expect.to_string(),
                    actual: actual.to_string(),
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self.run();
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

fn compile_result(expected: &str, actual: &str) -> CaseResult {
    CaseResult {
        case_name: "compile".into(),
        passed: false,
        expected: expected.into(),
        actual: actual.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_document_parse() {
        let yaml = r#"
name: one
rule: "Name(`a`)"
cases:
  - name: hit
    context: { name: a }
    expect: true
---
name: two
rule: "Name(`a`"
compile_error: true
"#;
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert!(fixtures[1].compile_error);
        for fixture in &fixtures {
            fixture.run_and_assert();
        }
    }

    #[test]
    fn failures_are_reported() {
        let fixture = Fixture::from_yaml(
            r#"
name: wrong expectation
rule: "Name(`a`)"
cases:
  - name: miss
    context: { name: b }
    expect: true
"#,
        )
        .unwrap();
        let results = fixture.run();
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, "false");
    }

    #[test]
    fn unexpected_compile_outcome_fails() {
        let fixture = Fixture::from_yaml("name: x\nrule: \"Name(`a`)\"\ncompile_error: true").unwrap();
        let results = fixture.run();
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);

        let fixture = Fixture::from_yaml("name: y\nrule: \"Name(`a`\"").unwrap();
        let results = fixture.run();
        assert!(!results[0].passed);
        assert!(results[0].actual.starts_with("invalid rule syntax"));
    }
}
