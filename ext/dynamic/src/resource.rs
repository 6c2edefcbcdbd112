//! Traits the engine uses to treat the three protocol families uniformly.
//!
//! Each resource kind decides what its matcher context exposes and which
//! fields the override and tunnel passes may touch. Fields a kind does not
//! have (UDP routers have no rule, UDP services no health check) are
//! default no-ops, so a generic pass never needs to know the protocol.

use crate::config::{HealthCheckOverride, MtlsConfig};
use weave::MatcherContext;

/// A named resource that rules can select.
pub trait Resource: Clone + Send + Sync + 'static {
    /// The fields rules see for this resource, stored under `name`.
    ///
    /// The default exposes only the name (and the provider derived from it).
    fn matcher_context(&self, name: &str) -> MatcherContext {
        MatcherContext::new(name)
    }
}

/// A router: references a service and listens on entrypoints.
pub trait RouterResource: Resource {
    /// The referenced service name.
    fn service(&self) -> &str;

    /// Mutable access to the referenced service name.
    fn service_mut(&mut self) -> &mut String;

    /// Mutable access to the entrypoint list.
    fn entry_points_mut(&mut self) -> &mut Vec<String>;

    /// Mutable access to the routing rule, `None` for kinds without one.
    fn rule_mut(&mut self) -> Option<&mut String> {
        None
    }

    /// Referenced middlewares, empty for kinds without middlewares.
    fn middlewares(&self) -> &[String] {
        &[]
    }

    /// Mutable access to the middlewares, `None` for kinds without them.
    fn middlewares_mut(&mut self) -> Option<&mut Vec<String>> {
        None
    }

    /// Routing priority, 0 for kinds without one.
    fn priority(&self) -> i64 {
        0
    }

    /// Set the routing priority; ignored by kinds without one.
    fn set_priority(&mut self, _priority: i64) {}

    /// `true` when the router's TLS block names a TLS options entry.
    fn has_tls_options(&self) -> bool {
        false
    }

    /// Drop the TLS options reference.
    ///
    /// When the TLS block carried nothing else the whole block is removed.
    fn clear_tls_options(&mut self) {}
}

/// A service whose load balancer holds a list of backend servers.
pub trait ServiceResource: Resource {
    /// Server addresses in order: URLs for HTTP, `host:port` otherwise.
    fn server_addresses(&self) -> Vec<&str>;

    /// Replace the servers with one server per address, creating the load
    /// balancer if the service has none.
    fn replace_servers(&mut self, addresses: &[String]);

    /// Append one server, creating the load balancer if needed.
    fn append_server(&mut self, address: &str);

    /// Point the load balancer at a servers transport.
    fn set_servers_transport(&mut self, _name: &str) {}

    /// Overwrite the provided, non-empty health-check fields.
    ///
    /// No-op when the service has no load balancer or no health check.
    fn override_health_check(&mut self, _health_check: &HealthCheckOverride) {}
}

/// A servers transport that can carry a tunnel's client certificates.
pub trait TunnelTransport: Resource {
    /// A transport trusting the tunnel's CA and presenting its client
    /// certificate, everything else left at defaults.
    fn from_mtls(mtls: &MtlsConfig) -> Self;
}

/// Set `target` to `value` when `value` is present and non-empty.
pub(crate) fn overwrite(target: &mut String, value: Option<&String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        target.clone_from(value);
    }
}
