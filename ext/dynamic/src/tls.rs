//! TLS material: certificates, named options and named stores.

use crate::configuration::{Object, Section};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Certificate/key pair, as referenced by servers transports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certificate {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cert_file: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key_file: String,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

/// A served certificate and the stores it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertAndStores {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cert_file: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key_file: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stores: Vec<String>,
    /// Fields not modelled here, passed through unchanged.
    #[serde(flatten)]
    pub extra: Object,
}

/// A named TLS options entry, carried opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(pub Object);

impl Resource for Options {}

/// A named TLS store, carried opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store(pub Object);

impl Resource for Store {}

/// The `tls` section of a configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<CertAndStores>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: Section<Options>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub stores: Section<Store>,
}
