//! One source, end to end.
//!
//! ```text
//! raw ──decode──▶ typed ──+extras──▶ filter ──▶ overrides ──▶ tunnels ──▶ strip names
//! ```

use crate::config::{
    RouterSection, SectionConfig, ServiceSection, SourceConfig, TlsSections, TunnelConfig,
};
use crate::configuration::{Configuration, Section};
use crate::filter::{filter, filter_routers};
use crate::normalize::strip_configuration;
use crate::raw::{decode_configuration, decode_extras, RawConfiguration};
use crate::resource::{Resource, RouterResource};
use crate::{http, tcp, tls, tunnel, udp};

/// Turn a source's raw document into its contribution to the final
/// configuration.
///
/// The result has all four sections. It never fails: unusable rules select
/// nothing and unusable items are dropped, each with a log line.
#[must_use]
#[tracing::instrument(level = "debug", skip_all, fields(source = %config.name))]
pub fn process_source(raw: &RawConfiguration, config: &SourceConfig) -> Configuration {
    let decoded = decode_configuration(raw);
    let provider_rule = config.rule.as_str();

    let mut http = select_http(
        decoded.http.unwrap_or_default(),
        config,
        provider_rule,
    );
    let mut tcp = select_tcp(decoded.tcp.unwrap_or_default(), config, provider_rule);
    let mut udp = select_udp(decoded.udp.unwrap_or_default(), config, provider_rule);
    let tls = select_tls(decoded.tls.unwrap_or_default(), &config.tls, provider_rule);

    apply_overrides(&mut http, &mut tcp, &mut udp, config);
    resolve_tunnels(&mut http, &mut tcp, &mut udp, &config.tunnels);

    tracing::debug!(
        routers = http.routers.len(),
        services = http.services.len(),
        tcp_routers = tcp.routers.len(),
        tcp_services = tcp.services.len(),
        udp_routers = udp.routers.len(),
        udp_services = udp.services.len(),
        "source processed"
    );

    strip_configuration(&Configuration {
        http: Some(http),
        tcp: Some(tcp),
        udp: Some(udp),
        tls: Some(tls),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Selection
// ═══════════════════════════════════════════════════════════════════════════════

fn select_http(
    mut decoded: http::Configuration,
    config: &SourceConfig,
    provider_rule: &str,
) -> http::Configuration {
    let extra = &config.extra;
    decoded.routers.extend(decode_extras("router", &extra.routers));
    decoded.services.extend(decode_extras("service", &extra.services));
    decoded
        .middlewares
        .extend(decode_extras("middleware", &extra.middlewares));

    let sections = &config.http;
    http::Configuration {
        routers: select_routers(&decoded.routers, &sections.routers, provider_rule),
        services: select_services(&decoded.services, &sections.services, provider_rule),
        middlewares: select(&decoded.middlewares, &sections.middlewares, provider_rule),
        servers_transports: select(
            &decoded.servers_transports,
            &sections.servers_transports,
            provider_rule,
        ),
    }
}

fn select_tcp(
    mut decoded: tcp::Configuration,
    config: &SourceConfig,
    provider_rule: &str,
) -> tcp::Configuration {
    let extra = &config.extra;
    decoded
        .routers
        .extend(decode_extras("tcp router", &extra.tcp_routers));
    decoded
        .services
        .extend(decode_extras("tcp service", &extra.tcp_services));

    let sections = &config.tcp;
    tcp::Configuration {
        routers: select_routers(&decoded.routers, &sections.routers, provider_rule),
        services: select_services(&decoded.services, &sections.services, provider_rule),
        middlewares: select(&decoded.middlewares, &sections.middlewares, provider_rule),
        servers_transports: select(
            &decoded.servers_transports,
            &sections.servers_transports,
            provider_rule,
        ),
    }
}

fn select_udp(
    mut decoded: udp::Configuration,
    config: &SourceConfig,
    provider_rule: &str,
) -> udp::Configuration {
    let extra = &config.extra;
    decoded
        .routers
        .extend(decode_extras("udp router", &extra.udp_routers));
    decoded
        .services
        .extend(decode_extras("udp service", &extra.udp_services));

    let sections = &config.udp;
    udp::Configuration {
        routers: select_routers(&decoded.routers, &sections.routers, provider_rule),
        services: select_services(&decoded.services, &sections.services, provider_rule),
    }
}

fn select_tls(
    decoded: tls::Configuration,
    sections: &TlsSections,
    provider_rule: &str,
) -> tls::Configuration {
    tls::Configuration {
        certificates: if sections.certificates {
            decoded.certificates
        } else {
            Vec::new()
        },
        options: select(&decoded.options, &sections.options, provider_rule),
        stores: select(&decoded.stores, &sections.stores, provider_rule),
    }
}

fn select<T: Resource>(
    resources: &Section<T>,
    section: &SectionConfig,
    provider_rule: &str,
) -> Section<T> {
    if !section.discover {
        return Section::new();
    }
    filter(resources, &section.rule, provider_rule)
}

fn select_routers<R: RouterResource, O>(
    routers: &Section<R>,
    section: &RouterSection<O>,
    provider_rule: &str,
) -> Section<R> {
    if !section.discover {
        return Section::new();
    }
    filter_routers(routers, &section.rule, provider_rule, section.discover_priority)
}

fn select_services<T: Resource, O>(
    services: &Section<T>,
    section: &ServiceSection<O>,
    provider_rule: &str,
) -> Section<T> {
    if !section.discover {
        return Section::new();
    }
    filter(services, &section.rule, provider_rule)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rewriting
// ═══════════════════════════════════════════════════════════════════════════════

fn apply_overrides(
    http: &mut http::Configuration,
    tcp: &mut tcp::Configuration,
    udp: &mut udp::Configuration,
    config: &SourceConfig,
) {
    let tunnels = config.tunnels.as_slice();

    config.http.routers.overrides.apply(&mut http.routers);
    config
        .http
        .services
        .overrides
        .apply(&mut http.services, tunnels);

    config.tcp.routers.overrides.apply(&mut tcp.routers);
    config.tcp.services.overrides.apply(&mut tcp.services, tunnels);

    config.udp.routers.overrides.apply(&mut udp.routers);
    config.udp.services.overrides.apply(&mut udp.services, tunnels);
}

fn resolve_tunnels(
    http: &mut http::Configuration,
    tcp: &mut tcp::Configuration,
    udp: &mut udp::Configuration,
    tunnels: &[TunnelConfig],
) {
    if tunnels.is_empty() {
        return;
    }
    tunnel::resolve(
        &mut http.routers,
        &mut http.services,
        &mut http.servers_transports,
        tunnels,
    );
    tunnel::resolve(
        &mut tcp.routers,
        &mut tcp.services,
        &mut tcp.servers_transports,
        tunnels,
    );
    tunnel::resolve_servers(&mut udp.services, tunnels);
}
