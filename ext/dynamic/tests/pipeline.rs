//! End-to-end behaviour of a source pass and the merge of several sources.

use serde_json::{json, Value};
use std::sync::Arc;
use weave_dynamic::tunnel::transport_name;
use weave_dynamic::{
    filter, merge, process_source, Configuration, RawConfiguration, ServiceResource, SourceConfig,
};

fn raw(value: Value) -> RawConfiguration {
    serde_json::from_value(value).unwrap()
}

fn source(value: Value) -> SourceConfig {
    serde_json::from_value(value).unwrap()
}

fn cluster() -> RawConfiguration {
    raw(json!({
        "routers": {
            "web-router": {
                "rule": "Host(`example.com`)",
                "entryPoints": ["websecure"],
                "service": "web@docker",
                "middlewares": ["compress@docker"],
                "priority": 42,
                "tls": {"options": "modern@file"}
            },
            "api-router@docker": {
                "rule": "Host(`api.example.com`)",
                "entryPoints": ["websecure"],
                "service": "api@docker",
                "tls": {"options": "modern@file", "certResolver": "le"}
            },
            "admin@internal": {
                "rule": "PathPrefix(`/dashboard`)",
                "entryPoints": ["traefik"],
                "service": "dashboard@internal"
            }
        },
        "services": {
            "web@docker": {"loadBalancer": {
                "servers": [{"url": "http://10.0.0.5:80"}],
                "healthCheck": {"path": "/health", "interval": "10s", "timeout": "5s"}
            }},
            "api@docker": {"loadBalancer": {"servers": [{"url": "http://10.0.0.6:80"}]}},
            "dashboard@internal": {}
        },
        "middlewares": {
            "compress@docker": {"compress": {}}
        },
        "tcpRouters": {
            "db@docker": {"rule": "HostSNI(`db.example.com`)", "service": "db@docker",
                          "tls": {"passthrough": true}}
        },
        "tcpServices": {
            "db@docker": {"loadBalancer": {"servers": [{"address": "10.0.1.5:5432"}]}}
        },
        "udpRouters": {
            "dns@docker": {"entryPoints": ["dns"], "service": "dns@docker"}
        },
        "udpServices": {
            "dns@docker": {"loadBalancer": {"servers": [{"address": "10.0.2.5:53"}]}}
        },
        "tlsCertificates": [
            {"certFile": "/certs/example.pem", "keyFile": "/certs/example.key"}
        ]
    }))
}

#[test]
fn internal_resources_are_not_excluded_implicitly() {
    let config = source(json!({"http": {"routers": {"rule": "NameRegexp(`.*`)"}}}));
    let out = process_source(&cluster(), &config);
    let routers = &out.http.as_ref().unwrap().routers;

    assert!(routers.contains_key("web-router"));
    assert!(routers.contains_key("admin"));
}

#[test]
fn explicit_internal_exclusion() {
    let config = source(json!({"rule": "!Provider(`internal`)"}));
    let out = process_source(&cluster(), &config);
    let http = out.http.as_ref().unwrap();

    let routers: Vec<&str> = http.routers.keys().map(String::as_str).collect();
    assert_eq!(routers, ["api-router", "web-router"]);
    // Services are filtered by the same provider rule.
    assert!(!http.services.contains_key("dashboard"));
    assert_eq!(http.services.len(), 2);
}

#[test]
fn priorities_reset_unless_discovered() {
    let filtered = source(json!({"http": {"routers": {"rule": "Entrypoint(`websecure`)"}}}));
    let out = process_source(&cluster(), &filtered);
    assert_eq!(out.http.unwrap().routers["web-router"].priority, 0);

    let kept = source(json!({"http": {"routers": {
        "rule": "Entrypoint(`websecure`)",
        "discoverPriority": true
    }}}));
    let out = process_source(&cluster(), &kept);
    assert_eq!(out.http.unwrap().routers["web-router"].priority, 42);
}

#[test]
fn invalid_section_rule_fails_closed() {
    let config = source(json!({"http": {"routers": {"rule": "Name(`web-router`"}}}));
    let out = process_source(&cluster(), &config);
    let http = out.http.unwrap();
    assert!(http.routers.is_empty());
    // Other sections are unaffected.
    assert_eq!(http.services.len(), 3);
}

#[test]
fn router_overrides_with_backreference() {
    let config = source(json!({
        "http": {"routers": {
            "rule": "Provider(`docker`)",
            "overrides": {
                "rules": [
                    {"rule": "Name(`api-router@docker`)", "value": "$1 && PathPrefix(`/v1`)"}
                ],
                "entrypoints": [{"value": ["edge"]}],
                "services": [{"rule": "Service(`api@docker`)", "value": "api-v2@docker"}],
                "middlewares": [{"value": "auth@file"}]
            }
        }}
    }));
    let out = process_source(&cluster(), &config);
    let routers = out.http.unwrap().routers;

    let api = &routers["api-router"];
    assert_eq!(api.rule, "Host(`api.example.com`) && PathPrefix(`/v1`)");
    assert_eq!(api.entry_points, ["edge"]);
    assert_eq!(api.service, "api-v2");
    assert_eq!(api.middlewares, ["auth"]);
}

#[test]
fn server_override_through_tunnel() {
    let config = source(json!({
        "http": {"services": {"overrides": {
            "servers": [{"rule": "Name(`web@docker`)", "value": "http://ignored", "tunnel": "edge"}],
            "healthChecks": [{"rule": "Name(`web@docker`)", "interval": "30s", "path": ""}]
        }}},
        "tunnels": [{
            "name": "edge",
            "rule": "Name(`nothing-matches`)",
            "addresses": ["http://tunnel-a:8080", "http://tunnel-b:8080"]
        }]
    }));
    let out = process_source(&cluster(), &config);
    let services = out.http.unwrap().services;

    let web = &services["web"];
    assert_eq!(
        web.server_addresses(),
        ["http://tunnel-a:8080", "http://tunnel-b:8080"]
    );
    let hc = web.load_balancer.as_ref().unwrap().health_check.as_ref().unwrap();
    assert_eq!(hc.interval, "30s");
    assert_eq!(hc.path, "/health");
    assert_eq!(hc.timeout, "5s");
}

#[test]
fn tunnel_with_mtls_across_protocols() {
    let rule = "Provider(`docker`) && !NameRegexp(`^api`)";
    let config = source(json!({
        "tunnels": [{
            "name": "vpn",
            "rule": rule,
            "addresses": ["https://vpn-1:443"],
            "mtls": {"caFile": "/ca.pem", "certFile": "/client.pem", "keyFile": "/client.key"}
        }]
    }));
    let out = process_source(&cluster(), &config);
    let transport = transport_name(rule);

    let http = out.http.unwrap();
    let web = &http.services["web"];
    assert_eq!(web.server_addresses(), ["https://vpn-1:443"]);
    assert_eq!(
        web.load_balancer.as_ref().unwrap().servers_transport,
        transport
    );
    assert_eq!(http.servers_transports[&transport].root_cas, ["/ca.pem"]);
    assert_eq!(http.services["api"].server_addresses(), ["http://10.0.0.6:80"]);

    // The router in front of the tunneled service loses its options-only TLS;
    // the other keeps its resolver-backed TLS untouched.
    assert!(http.routers["web-router"].tls.is_none());
    assert_eq!(
        http.routers["api-router"].tls.as_ref().unwrap().options,
        "modern@file"
    );

    let tcp = out.tcp.unwrap();
    assert_eq!(tcp.services["db"].server_addresses(), ["https://vpn-1:443"]);
    assert!(tcp.servers_transports.contains_key(&transport));
    assert!(tcp.routers["db"].tls.as_ref().unwrap().passthrough);

    let udp = out.udp.unwrap();
    assert_eq!(udp.services["dns"].server_addresses(), ["https://vpn-1:443"]);
}

#[test]
fn udp_overrides() {
    let config = source(json!({
        "udp": {
            "routers": {"overrides": {"entrypoints": [{"value": "dns-tcp"}]}},
            "services": {"overrides": {"servers": [{"value": ["10.0.9.1:53", "10.0.9.2:53"]}]}}
        }
    }));
    let out = process_source(&cluster(), &config);
    let udp = out.udp.unwrap();
    assert_eq!(udp.routers["dns"].entry_points, ["dns", "dns-tcp"]);
    assert_eq!(
        udp.services["dns"].server_addresses(),
        ["10.0.9.1:53", "10.0.9.2:53"]
    );
}

#[test]
fn merge_sources_last_write_wins() {
    let a = process_source(
        &raw(json!({
            "routers": {"r1@docker": {"rule": "Host(`a`)"}},
            "tlsCertificates": [{"certFile": "/a.pem"}]
        })),
        &SourceConfig::default(),
    );
    let b = process_source(
        &raw(json!({
            "routers": {"r1@kubernetes": {"rule": "Host(`b`)"}},
            "tlsCertificates": [{"certFile": "/b.pem"}, {"certFile": "/a.pem"}]
        })),
        &SourceConfig::default(),
    );

    let merged = merge([Some(&a), None, Some(&b)]);
    let routers = &merged.http.as_ref().unwrap().routers;
    assert_eq!(routers.len(), 1);
    assert_eq!(routers["r1"].rule, "Host(`b`)");

    let certs: Vec<&str> = merged
        .tls
        .as_ref()
        .unwrap()
        .certificates
        .iter()
        .map(|c| c.cert_file.as_str())
        .collect();
    assert_eq!(certs, ["/a.pem", "/b.pem", "/a.pem"]);
}

#[test]
fn processing_never_touches_shared_input() {
    let decoded: Configuration = weave_dynamic::raw::decode_configuration(&cluster());
    let http = decoded.http.as_ref().unwrap();
    let selected = filter(&http.routers, "Provider(`docker`)", "");
    let api = &http.routers["api-router@docker"];
    assert!(Arc::ptr_eq(api, &selected["api-router@docker"]));
}

#[test]
fn output_serializes_with_proxy_field_names() {
    let out = process_source(&cluster(), &SourceConfig::default());
    let value = serde_json::to_value(&out).unwrap();

    assert_eq!(
        value["http"]["routers"]["web-router"]["entryPoints"],
        json!(["websecure"])
    );
    assert_eq!(
        value["http"]["services"]["web"]["loadBalancer"]["servers"][0]["url"],
        "http://10.0.0.5:80"
    );
    assert_eq!(value["tcp"]["routers"]["db"]["tls"]["passthrough"], true);
    assert_eq!(value["tls"]["certificates"][0]["certFile"], "/certs/example.pem");
}

#[test]
fn unmodelled_fields_pass_through() {
    let doc = raw(json!({
        "routers": {
            "grpc@docker": {
                "rule": "Host(`grpc.example.com`)",
                "service": "api@docker",
                "ruleSyntax": "v3",
                "tls": {"options": "modern@file", "certResolverOptions": {"x": 1}}
            }
        },
        "services": {
            "api@docker": {"loadBalancer": {
                "strategy": "p2c",
                "servers": [{"url": "http://10.0.0.6:80", "fenced": true}],
                "healthCheck": {"path": "/h", "followRedirects": false, "mode": "grpc", "status": 204}
            }}
        },
        "serversTransports": {
            "t@docker": {"serverName": "api", "spiffe": {"ids": ["spiffe://cluster/api"]}}
        },
        "tcpServices": {
            "db@docker": {"loadBalancer": {
                "servers": [{"address": "10.0.1.5:5432"}],
                "terminationDelay": 100
            }}
        },
        "udpServices": {
            "dns@docker": {"loadBalancer": {"servers": [{"address": "10.0.2.5:53", "weight": 2}]}}
        }
    }));
    let config = source(json!({
        "http": {"services": {"overrides": {
            "healthChecks": [{"rule": "Name(`api@docker`)", "interval": "30s"}]
        }}}
    }));
    let out = serde_json::to_value(process_source(&doc, &config)).unwrap();

    let lb = &out["http"]["services"]["api"]["loadBalancer"];
    assert_eq!(lb["strategy"], "p2c");
    assert_eq!(lb["servers"][0]["fenced"], true);
    assert_eq!(
        lb["healthCheck"],
        json!({"path": "/h", "interval": "30s", "followRedirects": false, "mode": "grpc", "status": 204})
    );
    assert_eq!(
        out["http"]["serversTransports"]["t"]["spiffe"],
        json!({"ids": ["spiffe://cluster/api"]})
    );
    assert_eq!(out["http"]["routers"]["grpc"]["ruleSyntax"], "v3");
    assert_eq!(out["http"]["routers"]["grpc"]["tls"]["certResolverOptions"], json!({"x": 1}));
    assert_eq!(
        out["tcp"]["services"]["db"]["loadBalancer"]["terminationDelay"],
        100
    );
    assert_eq!(out["udp"]["services"]["dns"]["loadBalancer"]["servers"][0]["weight"], 2);
}
