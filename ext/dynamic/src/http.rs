//! HTTP routers, services, middlewares and servers transports.

use crate::config::{HealthCheckOverride, MtlsConfig};
use crate::configuration::{is_false, is_zero, Object, Section};
use crate::resource::{overwrite, Resource, RouterResource, ServiceResource, TunnelTransport};
use crate::tls;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weave::MatcherContext;

/// The `http` section of a configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub routers: Section<Router>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub services: Section<Service>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub middlewares: Section<Middleware>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub servers_transports: Section<ServersTransport>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Routers
// ═══════════════════════════════════════════════════════════════════════════════

/// An HTTP router. `rule` is the proxy's routing rule, opaque to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Router {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub middlewares: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule_syntax: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub priority: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouterTls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<Object>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

/// TLS settings of an HTTP router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterTls {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub options: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cert_resolver: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<Domain>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

/// A TLS domain: main name plus subject alternative names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub main: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sans: Vec<String>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

impl Resource for Router {
    fn matcher_context(&self, name: &str) -> MatcherContext {
        MatcherContext::new(name)
            .with_entrypoints(self.entry_points.iter().cloned())
            .with_service(self.service.as_str())
    }
}

impl RouterResource for Router {
    fn service(&self) -> &str {
        &self.service
    }

    fn service_mut(&mut self) -> &mut String {
        &mut self.service
    }

    fn entry_points_mut(&mut self) -> &mut Vec<String> {
        &mut self.entry_points
    }

    fn rule_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.rule)
    }

    fn middlewares(&self) -> &[String] {
        &self.middlewares
    }

    fn middlewares_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.middlewares)
    }

    fn priority(&self) -> i64 {
        self.priority
    }

    fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }

    fn has_tls_options(&self) -> bool {
        self.tls.as_ref().is_some_and(|tls| !tls.options.is_empty())
    }

    fn clear_tls_options(&mut self) {
        let Some(tls) = self.tls.as_mut() else {
            return;
        };
        if tls.cert_resolver.is_empty() && tls.domains.is_empty() && tls.extra.is_empty() {
            self.tls = None;
        } else {
            tls.options.clear();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Services
// ═══════════════════════════════════════════════════════════════════════════════

/// An HTTP service. Only the load-balancer shape is inspected; the other
/// shapes pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted: Option<Object>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirroring: Option<Object>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failover: Option<Object>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadBalancer {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub servers_transport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_host_header: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky: Option<Object>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_forwarding: Option<Object>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

/// One backend, addressed by URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Server {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(skip_serializing_if = "is_false")]
    pub preserve_path: bool,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

impl Server {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthCheck {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scheme: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub interval: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timeout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

impl Resource for Service {}

impl ServiceResource for Service {
    fn server_addresses(&self) -> Vec<&str> {
        self.load_balancer
            .iter()
            .flat_map(|lb| lb.servers.iter().map(|s| s.url.as_str()))
            .collect()
    }

    fn replace_servers(&mut self, addresses: &[String]) {
        let lb = self.load_balancer.get_or_insert_with(LoadBalancer::default);
        lb.servers = addresses.iter().map(Server::new).collect();
    }

    fn append_server(&mut self, address: &str) {
        let lb = self.load_balancer.get_or_insert_with(LoadBalancer::default);
        lb.servers.push(Server::new(address));
    }

    fn set_servers_transport(&mut self, name: &str) {
        let lb = self.load_balancer.get_or_insert_with(LoadBalancer::default);
        lb.servers_transport = name.to_string();
    }

    fn override_health_check(&mut self, health_check: &HealthCheckOverride) {
        let Some(existing) = self
            .load_balancer
            .as_mut()
            .and_then(|lb| lb.health_check.as_mut())
        else {
            return;
        };
        overwrite(&mut existing.path, health_check.path.as_ref());
        overwrite(&mut existing.interval, health_check.interval.as_ref());
        overwrite(&mut existing.timeout, health_check.timeout.as_ref());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Middlewares and transports
// ═══════════════════════════════════════════════════════════════════════════════

/// An HTTP middleware, carried opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Middleware(pub Object);

impl Resource for Middleware {}

/// How the proxy connects to HTTP backends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServersTransport {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server_name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub insecure_skip_verify: bool,
    #[serde(rename = "rootCAs", skip_serializing_if = "Vec::is_empty")]
    pub root_cas: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<tls::Certificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_idle_conns_per_host: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarding_timeouts: Option<Object>,
    #[serde(skip_serializing_if = "is_false")]
    pub disable_http2: bool,
    #[serde(rename = "peerCertURI", skip_serializing_if = "String::is_empty")]
    pub peer_cert_uri: String,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

impl Resource for ServersTransport {}

impl TunnelTransport for ServersTransport {
    fn from_mtls(mtls: &MtlsConfig) -> Self {
        Self {
            root_cas: mtls.root_cas(),
            certificates: mtls.certificates(),
            ..Self::default()
        }
    }
}
