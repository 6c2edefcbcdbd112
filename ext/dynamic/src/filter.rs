//! Select resources of a section with a rule.

use crate::configuration::Section;
use crate::resource::{Resource, RouterResource};
use std::sync::Arc;
use weave::rule::is_blank;
use weave::{combine, Program};

/// Keep the resources matching `provider_rule AND section_rule`.
///
/// With both rules blank the input comes back as is, sharing every `Arc`.
/// A combined rule that fails to compile selects nothing.
///
/// ```
/// use std::sync::Arc;
/// use weave_dynamic::{filter, http, Section};
///
/// let mut routers: Section<http::Router> = Section::new();
/// routers.insert("web@docker".into(), Arc::new(http::Router::default()));
/// routers.insert("api@internal".into(), Arc::new(http::Router::default()));
///
/// let kept = filter(&routers, "", "!Provider(`internal`)");
/// assert_eq!(kept.keys().collect::<Vec<_>>(), ["web@docker"]);
/// assert!(Arc::ptr_eq(&kept["web@docker"], &routers["web@docker"]));
///
/// assert!(filter(&routers, "Name(`web", "").is_empty());
/// ```
#[must_use]
pub fn filter<T: Resource>(
    resources: &Section<T>,
    section_rule: &str,
    provider_rule: &str,
) -> Section<T> {
    let rule = combine(provider_rule, section_rule);
    if rule.is_empty() {
        return resources.clone();
    }

    match Program::compile(&rule) {
        Ok(program) => select(resources, &program),
        Err(err) => {
            tracing::debug!(rule = %rule, error = %err, "rule failed to compile, selecting nothing");
            Section::new()
        }
    }
}

/// [`filter`] for routers, resetting priorities unless `discover_priority`.
///
/// A kept router with a non-zero priority is replaced by a copy with
/// priority 0; the input section still holds the original.
#[must_use]
pub fn filter_routers<R: RouterResource>(
    routers: &Section<R>,
    section_rule: &str,
    provider_rule: &str,
    discover_priority: bool,
) -> Section<R> {
    if is_blank(section_rule) && is_blank(provider_rule) {
        return routers.clone();
    }

    let mut kept = filter(routers, section_rule, provider_rule);
    if !discover_priority {
        for router in kept.values_mut() {
            if router.priority() != 0 {
                Arc::make_mut(router).set_priority(0);
            }
        }
    }
    kept
}

/// Keep the resources a compiled program matches.
#[must_use]
pub fn select<T: Resource>(resources: &Section<T>, program: &Program) -> Section<T> {
    resources
        .iter()
        .filter(|(name, resource)| {
            let selected = program.matches(&resource.matcher_context(name));
            tracing::trace!(name = %name, rule = %program.source(), selected, "evaluated");
            selected
        })
        .map(|(name, resource)| (name.clone(), Arc::clone(resource)))
        .collect()
}
