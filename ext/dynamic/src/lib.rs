//! weave-dynamic - select, rewrite and merge dynamic proxy configuration
//!
//! Remote sources deliver untyped documents of routers, services,
//! middlewares, servers transports and TLS material. This crate turns one
//! such document into typed [`Section`]s, keeps what the source's rules
//! select, rewrites it, and merges the results of many sources.
//!
//! # Pipeline
//!
//! ```text
//! RawConfiguration ─▶ raw ─▶ filter ─▶ overrides ─▶ tunnel ─▶ normalize ─┐
//!                                                                         ├─▶ merge ─▶ Configuration
//! RawConfiguration ─▶ ...                                        ─────────┘
//! ```
//!
//! | step | module |
//! |------|--------|
//! | decode sections, drop invalid items | [`raw`] |
//! | provider rule AND section rule | [`filter`](mod@filter) |
//! | rule / entrypoint / service / middleware / server / health-check rewrites | [`overrides`] |
//! | tunnel address pools and mTLS transports | [`tunnel`] |
//! | strip `@provider` suffixes | [`normalize`] |
//! | last-write-wins union | [`merge`](mod@merge) |
//!
//! [`process_source`] runs the first five for one source.
//!
//! # Sharing
//!
//! Sections hold `Arc`s. Selection shares resources with its input;
//! anything that changes a resource works on a copy (`Arc::make_mut`), so
//! the input of a pass is never modified.
//!
//! # Example
//!
//! ```
//! use weave_dynamic::{merge, process_source, RawConfiguration, SourceConfig};
//!
//! let raw: RawConfiguration = serde_json::from_value(serde_json::json!({
//!     "routers": {
//!         "web@docker": {"rule": "Host(`example.com`)", "service": "whoami@docker"},
//!         "dashboard@internal": {"rule": "PathPrefix(`/api`)", "service": "api@internal"}
//!     },
//!     "services": {
//!         "whoami@docker": {"loadBalancer": {"servers": [{"url": "http://10.0.0.5"}]}}
//!     }
//! }))
//! .unwrap();
//!
//! let config: SourceConfig = serde_json::from_value(serde_json::json!({
//!     "name": "cluster-a",
//!     "rule": "!Provider(`internal`)"
//! }))
//! .unwrap();
//!
//! let processed = process_source(&raw, &config);
//! let merged = merge([Some(&processed)]);
//!
//! let routers = &merged.http.as_ref().unwrap().routers;
//! assert_eq!(routers.keys().collect::<Vec<_>>(), ["web"]);
//! assert_eq!(routers["web"].service, "whoami");
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

pub mod config;
mod configuration;
pub mod filter;
pub mod http;
pub mod merge;
pub mod normalize;
pub mod overrides;
pub mod pipeline;
pub mod raw;
mod resource;
pub mod tcp;
pub mod tls;
pub mod tunnel;
pub mod udp;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use configuration::{Configuration, Object, Section};
pub use resource::{Resource, RouterResource, ServiceResource, TunnelTransport};

pub use config::{OverrideValue, SourceConfig, TunnelConfig};
pub use filter::{filter, filter_routers, select};
pub use merge::merge;
pub use normalize::{strip_configuration, strip_names, strip_routers};
pub use pipeline::process_source;
pub use raw::RawConfiguration;
