//! UDP routers and services. No rules, middlewares, transports or TLS.

use crate::configuration::{Object, Section};
use crate::resource::{Resource, RouterResource, ServiceResource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weave::MatcherContext;

/// The `udp` section of a configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub routers: Section<Router>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub services: Section<Service>,
}

/// A UDP router: entrypoints and a service, nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Router {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
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
}

/// A UDP service: a load balancer or an opaque weighted shape.
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

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

/// One backend, addressed by `host:port`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
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
}
