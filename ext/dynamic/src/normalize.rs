//! Strip provider suffixes from names and references.
//!
//! Names like `whoami@docker` become `whoami` so the consuming proxy can
//! attach its own provider suffix. When two names collapse onto the same
//! key, the one later in key order wins.

use crate::configuration::{Configuration, Section};
use crate::resource::{Resource, RouterResource};
use crate::{http, tcp, tls, udp};
use std::sync::Arc;
use weave::strip_provider;

/// Strip the suffix from every key; values are shared, not copied.
#[must_use]
pub fn strip_names<T: Resource>(resources: &Section<T>) -> Section<T> {
    resources
        .iter()
        .map(|(name, resource)| (strip_provider(name).to_string(), Arc::clone(resource)))
        .collect()
}

/// Strip keys and each router's service and middleware references.
///
/// A router is copied only when one of its references changes.
#[must_use]
pub fn strip_routers<R: RouterResource>(routers: &Section<R>) -> Section<R> {
    routers
        .iter()
        .map(|(name, router)| {
            (
                strip_provider(name).to_string(),
                strip_references(router),
            )
        })
        .collect()
}

fn strip_references<R: RouterResource>(router: &Arc<R>) -> Arc<R> {
    let service_changed = strip_provider(router.service()) != router.service();
    let middlewares_changed = router
        .middlewares()
        .iter()
        .any(|m| strip_provider(m) != m.as_str());
    if !service_changed && !middlewares_changed {
        return Arc::clone(router);
    }

    let mut copy = R::clone(router);
    let service = strip_provider(copy.service()).to_string();
    *copy.service_mut() = service;
    if let Some(middlewares) = copy.middlewares_mut() {
        for middleware in middlewares.iter_mut() {
            *middleware = strip_provider(middleware).to_string();
        }
    }
    Arc::new(copy)
}

/// Strip every section of a configuration.
#[must_use]
pub fn strip_configuration(configuration: &Configuration) -> Configuration {
    Configuration {
        http: configuration.http.as_ref().map(|c| http::Configuration {
            routers: strip_routers(&c.routers),
            services: strip_names(&c.services),
            middlewares: strip_names(&c.middlewares),
            servers_transports: strip_names(&c.servers_transports),
        }),
        tcp: configuration.tcp.as_ref().map(|c| tcp::Configuration {
            routers: strip_routers(&c.routers),
            services: strip_names(&c.services),
            middlewares: strip_names(&c.middlewares),
            servers_transports: strip_names(&c.servers_transports),
        }),
        udp: configuration.udp.as_ref().map(|c| udp::Configuration {
            routers: strip_routers(&c.routers),
            services: strip_names(&c.services),
        }),
        tls: configuration.tls.as_ref().map(|c| tls::Configuration {
            certificates: c.certificates.clone(),
            options: strip_names(&c.options),
            stores: strip_names(&c.stores),
        }),
    }
}
