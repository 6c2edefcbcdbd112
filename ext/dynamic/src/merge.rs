//! Combine the configurations of several sources into one.

use crate::configuration::{Configuration, Section};
use crate::{http, tcp, tls, udp};
use std::sync::Arc;

/// Merge configurations in order.
///
/// Named resources are last-write-wins per key; TLS certificates are
/// concatenated, duplicates included. Absent inputs and absent sections are
/// skipped. The result always has all four sections.
///
/// ```
/// use weave_dynamic::{merge, Configuration};
///
/// let merged = merge([None, Some(&Configuration::default())]);
/// assert!(merged.http.is_some() && merged.tls.is_some());
/// ```
#[must_use]
pub fn merge<'a, I>(configurations: I) -> Configuration
where
    I: IntoIterator<Item = Option<&'a Configuration>>,
{
    let mut http = http::Configuration::default();
    let mut tcp = tcp::Configuration::default();
    let mut udp = udp::Configuration::default();
    let mut tls = tls::Configuration::default();

    for configuration in configurations.into_iter().flatten() {
        if let Some(src) = &configuration.http {
            extend(&mut http.routers, &src.routers);
            extend(&mut http.services, &src.services);
            extend(&mut http.middlewares, &src.middlewares);
            extend(&mut http.servers_transports, &src.servers_transports);
        }
        if let Some(src) = &configuration.tcp {
            extend(&mut tcp.routers, &src.routers);
            extend(&mut tcp.services, &src.services);
            extend(&mut tcp.middlewares, &src.middlewares);
            extend(&mut tcp.servers_transports, &src.servers_transports);
        }
        if let Some(src) = &configuration.udp {
            extend(&mut udp.routers, &src.routers);
            extend(&mut udp.services, &src.services);
        }
        if let Some(src) = &configuration.tls {
            tls.certificates.extend(src.certificates.iter().cloned());
            extend(&mut tls.options, &src.options);
            extend(&mut tls.stores, &src.stores);
        }
    }

    Configuration {
        http: Some(http),
        tcp: Some(tcp),
        udp: Some(udp),
        tls: Some(tls),
    }
}

fn extend<T>(target: &mut Section<T>, source: &Section<T>) {
    target.extend(
        source
            .iter()
            .map(|(name, resource)| (name.clone(), Arc::clone(resource))),
    );
}
