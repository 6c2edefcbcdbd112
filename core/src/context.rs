//! `MatcherContext` — what a rule can see about one resource.
//!
//! The evaluator never touches resources directly. Each resource is
//! projected into a [`MatcherContext`] carrying its full name, the provider
//! token derived from the name, its entrypoints and the service it references.

use crate::{DataInput, MatchingData};

/// Returns the provider token of a resource name.
///
/// The provider is the substring after the *last* `@`. Names without `@`
/// have an empty provider.
///
/// ```
/// use weave::extract_provider;
///
/// assert_eq!(extract_provider("svc@file"), "file");
/// assert_eq!(extract_provider("ns/name@kubernetes@file"), "file");
/// assert_eq!(extract_provider("noat"), "");
/// assert_eq!(extract_provider("trailing@"), "");
/// ```
#[must_use]
pub fn extract_provider(name: &str) -> &str {
    name.rsplit_once('@').map_or("", |(_, provider)| provider)
}

/// Returns the resource name without its `@<provider>` suffix.
///
/// Only the last suffix is removed, mirroring [`extract_provider`].
///
/// ```
/// use weave::strip_provider;
///
/// assert_eq!(strip_provider("svc@file"), "svc");
/// assert_eq!(strip_provider("ns/name@kubernetes@file"), "ns/name@kubernetes");
/// assert_eq!(strip_provider("noat"), "noat");
/// ```
#[must_use]
pub fn strip_provider(name: &str) -> &str {
    name.rsplit_once('@').map_or(name, |(base, _)| base)
}

/// Per-resource evaluation context.
///
/// Kinds without entrypoints (services, middlewares, transports) leave the
/// list empty; kinds without a service reference leave `service` empty.
///
/// # Example
///
/// ```
/// use weave::MatcherContext;
///
/// let ctx = MatcherContext::new("api@docker")
///     .with_entrypoints(["web", "websecure"])
///     .with_service("api-svc@docker");
///
/// assert_eq!(ctx.provider(), "docker");
/// assert_eq!(ctx.entrypoints(), ["web", "websecure"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatcherContext {
    name: String,
    provider: String,
    entrypoints: Vec<String>,
    service: String,
}

impl MatcherContext {
    /// Create a context for the named resource, deriving its provider.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let provider = extract_provider(&name).to_string();
        Self {
            name,
            provider,
            entrypoints: Vec::new(),
            service: String::new(),
        }
    }

    /// Set the entrypoints (builder pattern).
    #[must_use]
    pub fn with_entrypoints<I, S>(mut self, entrypoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrypoints = entrypoints.into_iter().map(Into::into).collect();
        self
    }

    /// Set the referenced service (builder pattern).
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Full resource name, provider suffix included.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider token derived from the name.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Entrypoints, in declaration order.
    #[must_use]
    pub fn entrypoints(&self) -> &[String] {
        &self.entrypoints
    }

    /// Referenced service name, or empty.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DataInputs
// ═══════════════════════════════════════════════════════════════════════════════

/// Extracts the full resource name. Backs `Name` and `NameRegexp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameInput;

impl DataInput<MatcherContext> for NameInput {
    fn get(&self, ctx: &MatcherContext) -> MatchingData {
        MatchingData::String(ctx.name.clone())
    }
}

/// Extracts the provider token. Backs `Provider` and `ProviderRegexp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderInput;

impl DataInput<MatcherContext> for ProviderInput {
    fn get(&self, ctx: &MatcherContext) -> MatchingData {
        MatchingData::String(ctx.provider.clone())
    }
}

/// Extracts the entrypoint list. Backs `Entrypoint` and `EntrypointRegexp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntrypointsInput;

impl DataInput<MatcherContext> for EntrypointsInput {
    fn get(&self, ctx: &MatcherContext) -> MatchingData {
        MatchingData::List(ctx.entrypoints.clone())
    }

    fn data_type(&self) -> &'static str {
        "list"
    }
}

/// Extracts the referenced service. Backs `Service` and `ServiceRegexp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceInput;

impl DataInput<MatcherContext> for ServiceInput {
    fn get(&self, ctx: &MatcherContext) -> MatchingData {
        MatchingData::String(ctx.service.clone())
    }
}
