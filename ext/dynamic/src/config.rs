//! Source descriptors: which resources to select and how to rewrite them.
//!
//! These are plain serde types; loading them from a file (and validating
//! anything beyond shape) is the caller's job. Every field has a default, so
//! an empty document selects everything from the source unchanged.
//!
//! ```
//! use weave_dynamic::config::{OverrideValue, SourceConfig};
//!
//! let config: SourceConfig = serde_json::from_value(serde_json::json!({
//!     "name": "edge",
//!     "rule": "!Provider(`internal`)",
//!     "http": {
//!         "routers": {
//!             "rule": "Entrypoint(`websecure`)",
//!             "overrides": {
//!                 "middlewares": [{"rule": "", "value": "auth@file"}]
//!             }
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! assert!(config.http.routers.discover);
//! assert_eq!(
//!     config.http.routers.overrides.middlewares[0].value,
//!     OverrideValue::Append("auth@file".into())
//! );
//! assert!(config.tcp.services.discover);
//! ```

use crate::tls;
use serde::{Deserialize, Serialize};

/// Everything configured for one remote source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceConfig {
    /// Source name, used for logging.
    pub name: String,
    /// Provider-level rule, AND-combined with every section rule.
    pub rule: String,
    pub http: HttpSections,
    pub tcp: TcpSections,
    pub udp: UdpSections,
    pub tls: TlsSections,
    /// Address pools server overrides and tunnel resolution route through.
    pub tunnels: Vec<TunnelConfig>,
    /// Resources added to the source's own before filtering.
    pub extra: ExtraResources,
}

impl SourceConfig {
    /// Look up a tunnel by name.
    #[must_use]
    pub fn tunnel(&self, name: &str) -> Option<&TunnelConfig> {
        self.tunnels.iter().find(|t| t.name == name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-section selection and overrides for `http`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpSections {
    pub routers: RouterSection<RouterOverrides>,
    pub services: ServiceSection<ServiceOverrides>,
    /// Middlewares are selected only, never rewritten.
    pub middlewares: SectionConfig,
    pub servers_transports: SectionConfig,
}

/// Same shape as [`HttpSections`], for `tcp`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpSections {
    pub routers: RouterSection<RouterOverrides>,
    pub services: ServiceSection<ServiceOverrides>,
    pub middlewares: SectionConfig,
    pub servers_transports: SectionConfig,
}

/// UDP has routers and services only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UdpSections {
    pub routers: RouterSection<UdpRouterOverrides>,
    pub services: ServiceSection<UdpServiceOverrides>,
}

/// Selection for the `tls` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSections {
    /// Keep the source's certificates. They have no names, so no rule.
    pub certificates: bool,
    /// Named TLS options, selected by rule.
    pub options: SectionConfig,
    /// Named TLS stores, selected by rule.
    pub stores: SectionConfig,
}

impl Default for TlsSections {
    fn default() -> Self {
        Self {
            certificates: true,
            options: SectionConfig::default(),
            stores: SectionConfig::default(),
        }
    }
}

/// Selection for a section without overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// `false` drops the whole section.
    pub discover: bool,
    pub rule: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            discover: true,
            rule: String::new(),
        }
    }
}

/// Selection and overrides for a router section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[serde(bound(deserialize = "O: Deserialize<'de> + Default"))]
pub struct RouterSection<O> {
    /// `false` drops every router.
    pub discover: bool,
    /// Section rule, AND-combined with the provider rule.
    pub rule: String,
    /// Keep the priorities the source assigned. Off by default: routers are
    /// re-prioritized by the consuming proxy.
    pub discover_priority: bool,
    pub overrides: O,
}

impl<O: Default> Default for RouterSection<O> {
    fn default() -> Self {
        Self {
            discover: true,
            rule: String::new(),
            discover_priority: false,
            overrides: O::default(),
        }
    }
}

/// Selection and overrides for a service section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[serde(bound(deserialize = "O: Deserialize<'de> + Default"))]
pub struct ServiceSection<O> {
    /// `false` drops every service.
    pub discover: bool,
    /// Section rule, AND-combined with the provider rule.
    pub rule: String,
    pub overrides: O,
}

impl<O: Default> Default for ServiceSection<O> {
    fn default() -> Self {
        Self {
            discover: true,
            rule: String::new(),
            overrides: O::default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Overrides
// ═══════════════════════════════════════════════════════════════════════════════

/// HTTP and TCP router overrides, applied in this field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterOverrides {
    pub rules: Vec<RuleOverride>,
    pub entrypoints: Vec<ListOverride>,
    pub services: Vec<RuleOverride>,
    pub middlewares: Vec<ListOverride>,
}

/// UDP routers have neither rule nor middlewares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UdpRouterOverrides {
    pub entrypoints: Vec<ListOverride>,
    pub services: Vec<RuleOverride>,
}

/// HTTP and TCP service overrides: servers first, then health checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceOverrides {
    pub servers: Vec<ServerOverride>,
    pub health_checks: Vec<HealthCheckOverride>,
}

/// UDP services have no health checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UdpServiceOverrides {
    pub servers: Vec<ServerOverride>,
}

/// Rewrite a string field. `$1` in `value` stands for the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOverride {
    /// Selects the resources to rewrite; empty selects all.
    pub rule: String,
    pub value: String,
}

/// Rewrite a list field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOverride {
    pub rule: String,
    pub value: OverrideValue,
}

/// A list override value: a list replaces, a single string appends.
///
/// Any other shape (a number, a map, a list holding non-strings, or no value
/// at all) lands in `Unusable`, so one bad entry is skipped on its own
/// instead of failing the whole source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Replace(Vec<String>),
    Append(String),
    Unusable(serde_json::Value),
}

impl Default for OverrideValue {
    fn default() -> Self {
        Self::Unusable(serde_json::Value::Null)
    }
}

impl OverrideValue {
    /// `false` for values that are neither a string nor a list of strings.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !matches!(self, Self::Unusable(_))
    }

    /// Apply to a list in place. Unusable values change nothing.
    pub fn apply_to(&self, list: &mut Vec<String>) {
        match self {
            Self::Replace(values) => list.clone_from(values),
            Self::Append(value) => list.push(value.clone()),
            Self::Unusable(_) => {}
        }
    }
}

/// Rewrite a service's servers, from a literal value or a tunnel's pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerOverride {
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<OverrideValue>,
    /// Name of a tunnel whose addresses replace the servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnel: Option<String>,
}

/// Overwrite health-check fields; absent or empty fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckOverride {
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tunnels
// ═══════════════════════════════════════════════════════════════════════════════

/// A named pool of addresses that replaces the servers of matched services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    pub name: String,
    /// Selects services. The provider rule does not apply here.
    pub rule: String,
    pub addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtls: Option<MtlsConfig>,
}

/// Client certificate material for reaching a tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MtlsConfig {
    pub ca_file: String,
    pub cert_file: String,
    pub key_file: String,
    /// Clear TLS options on routers of tunneled services.
    pub strip_router_tls_options: bool,
}

impl Default for MtlsConfig {
    fn default() -> Self {
        Self {
            ca_file: String::new(),
            cert_file: String::new(),
            key_file: String::new(),
            strip_router_tls_options: true,
        }
    }
}

impl MtlsConfig {
    pub(crate) fn root_cas(&self) -> Vec<String> {
        if self.ca_file.is_empty() {
            Vec::new()
        } else {
            vec![self.ca_file.clone()]
        }
    }

    pub(crate) fn certificates(&self) -> Vec<tls::Certificate> {
        if self.cert_file.is_empty() {
            return Vec::new();
        }
        vec![tls::Certificate {
            cert_file: self.cert_file.clone(),
            key_file: self.key_file.clone(),
            ..tls::Certificate::default()
        }]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Extra resources
// ═══════════════════════════════════════════════════════════════════════════════

/// Resources defined in configuration rather than fetched.
///
/// Each entry is a JSON object with a `name` field plus the resource body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtraResources {
    pub routers: Vec<serde_json::Value>,
    pub services: Vec<serde_json::Value>,
    pub middlewares: Vec<serde_json::Value>,
    pub tcp_routers: Vec<serde_json::Value>,
    pub tcp_services: Vec<serde_json::Value>,
    pub udp_routers: Vec<serde_json::Value>,
    pub udp_services: Vec<serde_json::Value>,
}
