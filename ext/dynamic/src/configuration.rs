//! The typed dynamic configuration a source produces and the proxy consumes.

use crate::{http, tcp, tls, udp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A named collection of one resource kind.
///
/// Ordered by name so every pass iterates deterministically. Values are
/// shared: two sections holding the same `Arc` hold the same resource, which
/// is observable with [`Arc::ptr_eq`]. Mutation goes through
/// [`Arc::make_mut`], so a pass never changes a resource another section
/// still references.
pub type Section<T> = BTreeMap<String, Arc<T>>;

/// Dynamic configuration across the three protocol families plus TLS.
///
/// Absent sections are `None`. [`merge`](crate::merge) always yields all
/// four sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<http::Configuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<tcp::Configuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp: Option<udp::Configuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<tls::Configuration>,
}

impl Configuration {
    /// A configuration with all four sections present and empty.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            http: Some(http::Configuration::default()),
            tcp: Some(tcp::Configuration::default()),
            udp: Some(udp::Configuration::default()),
            tls: Some(tls::Configuration::default()),
        }
    }
}

/// Opaque JSON object (middlewares, TLS options and stores, service shapes
/// the engine never inspects).
pub type Object = serde_json::Map<String, serde_json::Value>;

pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

