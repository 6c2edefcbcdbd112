//! Redirect services to tunnel address pools.
//!
//! A tunnel's rule selects services on its own; the source's provider rule
//! does not apply. Every selected service gets one server per tunnel address.
//! With mTLS material the service is also pointed at a shared
//! `tunnel-<hash>` servers transport, and routers in front of it can lose
//! their TLS options (the tunnel terminates TLS instead).

use crate::config::TunnelConfig;
use crate::configuration::Section;
use crate::overrides::for_each_match;
use crate::resource::{RouterResource, ServiceResource, TunnelTransport};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::sync::Arc;
use weave::strip_provider;

/// Prefix of generated servers transport names.
pub const TRANSPORT_PREFIX: &str = "tunnel-";

/// Hex digits of the rule digest kept in a transport name.
const HASH_LEN: usize = 16;

/// Stable transport name for a tunnel rule.
///
/// ```
/// use weave_dynamic::tunnel::transport_name;
///
/// let name = transport_name("Provider(`docker`)");
/// assert!(name.starts_with("tunnel-"));
/// assert_eq!(name.len(), "tunnel-".len() + 16);
/// assert_eq!(name, transport_name("Provider(`docker`)"));
/// ```
#[must_use]
pub fn transport_name(rule: &str) -> String {
    let digest = hex::encode(Sha256::digest(rule.as_bytes()));
    format!("{TRANSPORT_PREFIX}{}", &digest[..HASH_LEN])
}

/// Route HTTP or TCP services through their tunnels.
pub fn resolve<R, S, T>(
    routers: &mut Section<R>,
    services: &mut Section<S>,
    transports: &mut Section<T>,
    tunnels: &[TunnelConfig],
) where
    R: RouterResource,
    S: ServiceResource,
    T: TunnelTransport,
{
    for tunnel in tunnels {
        let tunneled = redirect(services, tunnel);
        let Some(mtls) = tunnel.mtls.as_ref() else {
            continue;
        };
        if tunneled.is_empty() {
            continue;
        }

        let name = transport_name(&tunnel.rule);
        transports
            .entry(name.clone())
            .or_insert_with(|| Arc::new(T::from_mtls(mtls)));
        for service in &tunneled {
            if let Some(service) = services.get_mut(service) {
                Arc::make_mut(service).set_servers_transport(&name);
            }
        }

        if mtls.strip_router_tls_options {
            strip_router_tls(routers, &tunneled);
        }
    }
}

/// Route services through their tunnels, servers only (UDP).
pub fn resolve_servers<S: ServiceResource>(services: &mut Section<S>, tunnels: &[TunnelConfig]) {
    for tunnel in tunnels {
        redirect(services, tunnel);
    }
}

/// Replace the servers of the services `tunnel` selects; returns their names.
fn redirect<S: ServiceResource>(services: &mut Section<S>, tunnel: &TunnelConfig) -> Vec<String> {
    if tunnel.addresses.is_empty() {
        return Vec::new();
    }
    let tunneled = for_each_match(services, &tunnel.rule, |service| {
        service.replace_servers(&tunnel.addresses);
    });
    tracing::debug!(tunnel = %tunnel.name, services = tunneled.len(), "services routed through tunnel");
    tunneled
}

/// Clear TLS options on routers whose service is one of `services`.
///
/// Provider suffixes are ignored on both sides of the comparison.
fn strip_router_tls<R: RouterResource>(routers: &mut Section<R>, services: &[String]) {
    let services: BTreeSet<&str> = services.iter().map(|s| strip_provider(s)).collect();
    for router in routers.values_mut() {
        if router.has_tls_options() && services.contains(strip_provider(router.service())) {
            Arc::make_mut(router).clear_tls_options();
        }
    }
}
