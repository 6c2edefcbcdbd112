//! Untyped source data → typed sections.
//!
//! Sources deliver one flat JSON object whose keys name the sections
//! (`routers`, `tcpServices`, `tlsCertificates`, ...). Items that do not
//! deserialize are dropped one by one; the rest of the section survives.

use crate::configuration::{Configuration, Section};
use crate::{http, tcp, tls, udp};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// The untyped document a source delivers.
pub type RawConfiguration = serde_json::Map<String, Value>;

pub const ROUTERS: &str = "routers";
pub const SERVICES: &str = "services";
pub const MIDDLEWARES: &str = "middlewares";
pub const SERVERS_TRANSPORTS: &str = "serversTransports";
pub const TCP_ROUTERS: &str = "tcpRouters";
pub const TCP_SERVICES: &str = "tcpServices";
pub const TCP_MIDDLEWARES: &str = "tcpMiddlewares";
pub const TCP_SERVERS_TRANSPORTS: &str = "tcpServersTransports";
pub const UDP_ROUTERS: &str = "udpRouters";
pub const UDP_SERVICES: &str = "udpServices";
pub const TLS_CERTIFICATES: &str = "tlsCertificates";
pub const TLS_OPTIONS: &str = "tlsOptions";
pub const TLS_STORES: &str = "tlsStores";

/// Decode every known section of a raw document.
#[must_use]
pub fn decode_configuration(raw: &RawConfiguration) -> Configuration {
    Configuration {
        http: Some(http::Configuration {
            routers: decode_section(raw, ROUTERS),
            services: decode_section(raw, SERVICES),
            middlewares: decode_section(raw, MIDDLEWARES),
            servers_transports: decode_section(raw, SERVERS_TRANSPORTS),
        }),
        tcp: Some(tcp::Configuration {
            routers: decode_section(raw, TCP_ROUTERS),
            services: decode_section(raw, TCP_SERVICES),
            middlewares: decode_section(raw, TCP_MIDDLEWARES),
            servers_transports: decode_section(raw, TCP_SERVERS_TRANSPORTS),
        }),
        udp: Some(udp::Configuration {
            routers: decode_section(raw, UDP_ROUTERS),
            services: decode_section(raw, UDP_SERVICES),
        }),
        tls: Some(tls::Configuration {
            certificates: decode_certificates(raw),
            options: decode_section(raw, TLS_OPTIONS),
            stores: decode_section(raw, TLS_STORES),
        }),
    }
}

/// Decode the name → item object stored under `key`.
///
/// A missing or non-object section is empty.
#[must_use]
pub fn decode_section<T: DeserializeOwned>(raw: &RawConfiguration, key: &str) -> Section<T> {
    let Some(value) = raw.get(key) else {
        return Section::new();
    };
    let Some(items) = value.as_object() else {
        tracing::debug!(section = %key, "section is not an object, ignoring");
        return Section::new();
    };

    items
        .iter()
        .filter_map(|(name, item)| {
            decode_item(key, name, item.clone()).map(|resource| (name.clone(), resource))
        })
        .collect()
}

/// Decode `tlsCertificates`: an array, or an object whose values are used.
#[must_use]
pub fn decode_certificates(raw: &RawConfiguration) -> Vec<tls::CertAndStores> {
    let items: Vec<&Value> = match raw.get(TLS_CERTIFICATES) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(items)) => items.values().collect(),
        Some(_) => {
            tracing::debug!(section = TLS_CERTIFICATES, "section is not a list, ignoring");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(certificate) => Some(certificate),
            Err(err) => {
                tracing::debug!(section = TLS_CERTIFICATES, error = %err, "dropping invalid certificate");
                None
            }
        })
        .collect()
}

/// Decode resources defined in configuration.
///
/// Each entry is an object with a string `name`; the name is removed and the
/// rest is the resource body. Entries without a usable name are skipped.
#[must_use]
pub fn decode_extras<T: DeserializeOwned>(kind: &str, entries: &[Value]) -> Section<T> {
    let mut section = Section::new();
    for entry in entries {
        let Some(mut body) = entry.as_object().cloned() else {
            tracing::warn!(kind = %kind, "extra resource is not an object, skipping");
            continue;
        };
        let name = match body.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => {
                tracing::warn!(kind = %kind, "extra resource has no name, skipping");
                continue;
            }
        };
        if let Some(resource) = decode_item(kind, &name, Value::Object(body)) {
            section.insert(name, resource);
        }
    }
    section
}

fn decode_item<T: DeserializeOwned>(section: &str, name: &str, item: Value) -> Option<Arc<T>> {
    match serde_json::from_value(item) {
        Ok(resource) => Some(Arc::new(resource)),
        Err(err) => {
            tracing::debug!(section = %section, name = %name, error = %err, "dropping invalid item");
            None
        }
    }
}
