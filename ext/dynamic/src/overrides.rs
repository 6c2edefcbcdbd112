//! Rewrite fields of already-selected resources.
//!
//! Every override entry carries its own rule, evaluated against the section
//! as it stands when the entry runs: entries apply in order, and a later one
//! sees what earlier ones changed. The provider rule is not applied again and
//! priorities are left alone.

use crate::config::{
    ListOverride, OverrideValue, RouterOverrides, RuleOverride, ServerOverride, ServiceOverrides,
    TunnelConfig, UdpRouterOverrides, UdpServiceOverrides,
};
use crate::configuration::Section;
use crate::filter::filter;
use crate::resource::{Resource, RouterResource, ServiceResource};
use std::sync::Arc;

/// Placeholder for the current value of the overridden field.
pub const BACKREFERENCE: &str = "$1";

impl RouterOverrides {
    /// Apply rule, entrypoint, service and middleware overrides, in that order.
    pub fn apply<R: RouterResource>(&self, routers: &mut Section<R>) {
        for entry in &self.rules {
            for_each_match(routers, &entry.rule, |router| {
                if let Some(rule) = router.rule_mut() {
                    *rule = substitute(&entry.value, rule);
                }
            });
        }
        override_entrypoints(routers, &self.entrypoints);
        override_services(routers, &self.services);
        for entry in self.middlewares.iter().filter(|e| usable(e, "middlewares")) {
            for_each_match(routers, &entry.rule, |router| {
                if let Some(middlewares) = router.middlewares_mut() {
                    entry.value.apply_to(middlewares);
                }
            });
        }
    }
}

impl UdpRouterOverrides {
    /// Apply entrypoint overrides, then service overrides.
    pub fn apply<R: RouterResource>(&self, routers: &mut Section<R>) {
        override_entrypoints(routers, &self.entrypoints);
        override_services(routers, &self.services);
    }
}

impl ServiceOverrides {
    /// Apply server overrides, then health-check overrides.
    ///
    /// `tunnels` resolves server overrides that name a tunnel.
    pub fn apply<S: ServiceResource>(&self, services: &mut Section<S>, tunnels: &[TunnelConfig]) {
        override_servers(services, &self.servers, tunnels);
        for entry in &self.health_checks {
            for_each_match(services, &entry.rule, |service| {
                service.override_health_check(entry);
            });
        }
    }
}

impl UdpServiceOverrides {
    /// Apply server overrides; `tunnels` resolves the ones naming a tunnel.
    pub fn apply<S: ServiceResource>(&self, services: &mut Section<S>, tunnels: &[TunnelConfig]) {
        override_servers(services, &self.servers, tunnels);
    }
}

/// Replace `$1` in `value` with `current`; without `$1`, `value` wins.
///
/// ```
/// use weave_dynamic::overrides::substitute;
///
/// assert_eq!(
///     substitute("$1 && PathPrefix(`/v1`)", "Host(`a`)"),
///     "Host(`a`) && PathPrefix(`/v1`)"
/// );
/// assert_eq!(substitute("other", "Host(`a`)"), "other");
/// ```
#[must_use]
pub fn substitute(value: &str, current: &str) -> String {
    if value.contains(BACKREFERENCE) {
        value.replace(BACKREFERENCE, current)
    } else {
        value.to_string()
    }
}

/// Run `apply` on a private copy of every resource `rule` selects.
pub(crate) fn for_each_match<T: Resource>(
    resources: &mut Section<T>,
    rule: &str,
    mut apply: impl FnMut(&mut T),
) -> Vec<String> {
    let targets: Vec<String> = filter(resources, rule, "").into_keys().collect();
    for name in &targets {
        if let Some(resource) = resources.get_mut(name) {
            apply(Arc::make_mut(resource));
        }
    }
    targets
}

fn override_entrypoints<R: RouterResource>(routers: &mut Section<R>, entries: &[ListOverride]) {
    for entry in entries.iter().filter(|e| usable(e, "entrypoints")) {
        for_each_match(routers, &entry.rule, |router| {
            entry.value.apply_to(router.entry_points_mut());
        });
    }
}

fn usable(entry: &ListOverride, field: &str) -> bool {
    let usable = entry.value.is_usable();
    if !usable {
        tracing::warn!(
            field = %field,
            rule = %entry.rule,
            "override value is neither a string nor a list of strings, skipping"
        );
    }
    usable
}

fn override_services<R: RouterResource>(routers: &mut Section<R>, entries: &[RuleOverride]) {
    for entry in entries {
        for_each_match(routers, &entry.rule, |router| {
            let service = router.service_mut();
            *service = substitute(&entry.value, service);
        });
    }
}

fn override_servers<S: ServiceResource>(
    services: &mut Section<S>,
    entries: &[ServerOverride],
    tunnels: &[TunnelConfig],
) {
    for entry in entries {
        let pool = entry
            .tunnel
            .as_deref()
            .and_then(|name| tunnel_pool(tunnels, name));

        match (pool, &entry.value) {
            (Some(addresses), _) => {
                for_each_match(services, &entry.rule, |service| {
                    service.replace_servers(addresses);
                });
            }
            (None, Some(OverrideValue::Replace(addresses))) => {
                for_each_match(services, &entry.rule, |service| {
                    service.replace_servers(addresses);
                });
            }
            (None, Some(OverrideValue::Append(address))) => {
                for_each_match(services, &entry.rule, |service| {
                    service.append_server(address);
                });
            }
            (None, Some(OverrideValue::Unusable(_)) | None) => {
                tracing::warn!(rule = %entry.rule, "server override has no usable value, skipping");
            }
        }
    }
}

/// A tunnel's addresses, or `None` (with a warning) when unusable.
fn tunnel_pool<'a>(tunnels: &'a [TunnelConfig], name: &str) -> Option<&'a [String]> {
    match tunnels.iter().find(|t| t.name == name) {
        Some(tunnel) if !tunnel.addresses.is_empty() => Some(tunnel.addresses.as_slice()),
        Some(_) => {
            tracing::warn!(tunnel = %name, "tunnel has no addresses, using literal server value");
            None
        }
        None => {
            tracing::warn!(tunnel = %name, "unknown tunnel, using literal server value");
            None
        }
    }
}
