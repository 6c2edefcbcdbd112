//! TCP routers, services, middlewares and servers transports.

use crate::config::{HealthCheckOverride, MtlsConfig};
use crate::configuration::{is_false, is_zero, Object, Section};
use crate::http::Domain;
use crate::resource::{overwrite, Resource, RouterResource, ServiceResource, TunnelTransport};
use crate::tls;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weave::MatcherContext;

/// The `tcp` section of a configuration.
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

/// A TCP router; `rule` is matched on SNI by the proxy.
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
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

/// TLS settings of a TCP router. `passthrough` forwards TLS untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterTls {
    #[serde(skip_serializing_if = "is_false")]
    pub passthrough: bool,
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
        if !tls.passthrough
            && tls.cert_resolver.is_empty()
            && tls.domains.is_empty()
            && tls.extra.is_empty()
        {
            self.tls = None;
        } else {
            tls.options.clear();
        }
    }
}

/// A TCP service: a load balancer or an opaque weighted shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted: Option<Object>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadBalancer {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub servers_transport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_protocol: Option<Object>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

/// One backend, addressed by `host:port`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Server {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(skip_serializing_if = "is_false")]
    pub tls: bool,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

impl Server {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub interval: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timeout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub send: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub expect: String,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

impl Resource for Service {}

impl ServiceResource for Service {
    fn server_addresses(&self) -> Vec<&str> {
        self.load_balancer
            .iter()
            .flat_map(|lb| lb.servers.iter().map(|s| s.address.as_str()))
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

    /// TCP checks have no path; only interval and timeout apply.
    fn override_health_check(&mut self, health_check: &HealthCheckOverride) {
        let Some(existing) = self
            .load_balancer
            .as_mut()
            .and_then(|lb| lb.health_check.as_mut())
        else {
            return;
        };
        overwrite(&mut existing.interval, health_check.interval.as_ref());
        overwrite(&mut existing.timeout, health_check.timeout.as_ref());
    }
}

/// A TCP middleware, carried opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Middleware(pub Object);

impl Resource for Middleware {}

/// How the proxy dials TCP backends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServersTransport {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dial_timeout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dial_keep_alive: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub termination_delay: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<ClientTls>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

/// Client-side TLS of a TCP servers transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientTls {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server_name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub insecure_skip_verify: bool,
    #[serde(rename = "rootCAs", skip_serializing_if = "Vec::is_empty")]
    pub root_cas: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<tls::Certificate>,
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
            tls: Some(ClientTls {
                root_cas: mtls.root_cas(),
                certificates: mtls.certificates(),
                ..ClientTls::default()
            }),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn passthrough_keeps_tls_block() {
        let mut r: Router =
            serde_json::from_value(json!({"tls": {"passthrough": true, "options": "o"}})).unwrap();
        assert!(r.has_tls_options());
        r.clear_tls_options();
        let tls = r.tls.unwrap();
        assert!(tls.passthrough);
        assert!(tls.options.is_empty());
    }

    #[test]
    fn transport_keeps_unknown_fields() {
        let input = json!({"dialTimeout": "5s", "tls": {"serverName": "db", "spiffe": {"ids": ["a"]}}});
        let t: ServersTransport = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(t.tls.as_ref().unwrap().server_name, "db");
        assert_eq!(serde_json::to_value(&t).unwrap(), input);
    }

    #[test]
    fn options_only_tls_is_removed() {
        let mut r: Router = serde_json::from_value(json!({"tls": {"options": "o"}})).unwrap();
        r.clear_tls_options();
        assert!(r.tls.is_none());
    }

    #[test]
    fn servers_carry_addresses() {
        let mut svc: Service = serde_json::from_value(json!({
            "loadBalancer": {"servers": [{"address": "10.0.0.1:5432"}]}
        }))
        .unwrap();
        assert_eq!(svc.server_addresses(), ["10.0.0.1:5432"]);
        svc.replace_servers(&["10.0.0.9:5432".into()]);
        assert_eq!(svc.server_addresses(), ["10.0.0.9:5432"]);
    }

    #[test]
    fn health_check_path_is_ignored() {
        let mut svc: Service = serde_json::from_value(json!({
            "loadBalancer": {"healthCheck": {"interval": "5s"}}
        }))
        .unwrap();
        svc.override_health_check(&HealthCheckOverride {
            path: Some("/x".into()),
            interval: Some("30s".into()),
            ..HealthCheckOverride::default()
        });
        let hc = svc.load_balancer.unwrap().health_check.unwrap();
        assert_eq!(hc.interval, "30s");
        assert!(hc.timeout.is_empty());
    }

    #[test]
    fn mtls_transport_nests_under_tls() {
        let mtls = MtlsConfig {
            ca_file: "/ca.pem".into(),
            cert_file: "/c.pem".into(),
            key_file: "/k.pem".into(),
            ..MtlsConfig::default()
        };
        let transport = ServersTransport::from_mtls(&mtls);
        let tls = transport.tls.unwrap();
        assert_eq!(tls.root_cas, vec!["/ca.pem"]);
        assert_eq!(tls.certificates[0].cert_file, "/c.pem");
    }
}
