//! Merge followed by router completion.

use config_merge::config::schema::{Router, TcpRouter};
use config_merge::provider::{complete, merge, DefaultRuleTemplate, FuncMap, TemplateError};
use config_merge::{Configuration, Diagnostics};
use serde_json::json;

mod common;
use common::*;

fn template(rule: &str) -> DefaultRuleTemplate {
    DefaultRuleTemplate::new(rule, &FuncMap::new()).unwrap()
}

#[test]
fn test_rule_synthesized_after_merge() {
    let mut a = Configuration::default();
    a.http.routers.insert(
        "web".into(),
        Router {
            service: "web".into(),
            ..Default::default()
        },
    );
    a.http.services.insert("web".into(), service(&["http://a"]));

    let mut diagnostics = Diagnostics::new();
    let mut merged = merge(&sources(vec![("a", a)]), &mut diagnostics);
    complete(
        &mut merged,
        "default",
        &template("Host(`{{ host }}`)"),
        &json!({ "host": "example.com" }),
        &mut diagnostics,
    );

    assert_eq!(merged.http.routers["web"].rule, "Host(`example.com`)");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_default_router_for_sole_service() {
    let mut a = Configuration::default();
    a.http.services.insert("svc1".into(), service(&["http://a"]));
    let mut b = Configuration::default();
    b.http.services.insert("svc1".into(), service(&["http://b"]));

    let mut diagnostics = Diagnostics::new();
    let mut merged = merge(&sources(vec![("a", a), ("b", b)]), &mut diagnostics);
    complete(
        &mut merged,
        "my-default",
        &template("Host(`{{ normalize(name) }}.local`)"),
        &json!({ "name": "My App" }),
        &mut diagnostics,
    );

    assert_eq!(merged.http.routers.len(), 1);
    let router = &merged.http.routers["my-default"];
    assert_eq!(router.service, "svc1");
    assert_eq!(router.rule, "Host(`My-App.local`)");
    assert_eq!(urls(&merged, "svc1"), vec!["http://a", "http://b"]);
}

#[test]
fn test_no_router_for_many_services() {
    let mut a = Configuration::default();
    a.http.services.insert("svc1".into(), service(&["http://a"]));
    a.http.services.insert("svc2".into(), service(&["http://b"]));

    let mut diagnostics = Diagnostics::new();
    let mut merged = merge(&sources(vec![("a", a)]), &mut diagnostics);
    complete(&mut merged, "default", &template("Host(`x`)"), &json!({}), &mut diagnostics);

    assert!(merged.http.routers.is_empty());
    assert_eq!(merged.http.services.len(), 2);
    assert_eq!(diagnostics.with_label("no_default_router").count(), 1);
}

#[test]
fn test_synthesized_router_with_empty_rule_dropped() {
    let mut a = Configuration::default();
    a.http.services.insert("svc1".into(), service(&["http://a"]));

    let mut diagnostics = Diagnostics::new();
    let mut merged = merge(&sources(vec![("a", a)]), &mut diagnostics);
    complete(&mut merged, "default", &template("{{ host }}"), &json!({}), &mut diagnostics);

    assert!(merged.http.routers.is_empty());
    assert!(merged.http.services.contains_key("svc1"));
    assert_eq!(diagnostics.with_label("undefined_rule").count(), 1);
}

#[test]
fn test_service_reference_defaults() {
    let mut a = Configuration::default();
    a.http.routers.insert("web".into(), router("Host(`a`)", ""));
    a.http.services.insert("only".into(), service(&["http://a"]));
    a.tcp.routers.insert("db".into(), tcp_router("HostSNI(`*`)", ""));
    a.tcp.services.insert("pg1".into(), tcp_service(&["10.0.0.1:5432"]));
    a.tcp.services.insert("pg2".into(), tcp_service(&["10.0.0.2:5432"]));

    let mut diagnostics = Diagnostics::new();
    let mut merged = merge(&sources(vec![("a", a)]), &mut diagnostics);
    complete(&mut merged, "default", &template(""), &json!({}), &mut diagnostics);

    assert_eq!(merged.http.routers["web"].service, "only");
    assert!(merged.tcp.routers.is_empty());
    assert_eq!(diagnostics.with_label("too_many_services").count(), 1);
}

#[test]
fn test_tcp_router_without_rule_dropped() {
    let mut a = Configuration::default();
    a.tcp.routers.insert("raw".into(), TcpRouter::default());
    a.tcp.services.insert("pg".into(), tcp_service(&["10.0.0.1:5432"]));

    let mut diagnostics = Diagnostics::new();
    let mut merged = merge(&sources(vec![("a", a)]), &mut diagnostics);
    complete(&mut merged, "default", &template("Host(`x`)"), &json!({}), &mut diagnostics);

    assert!(merged.tcp.routers.is_empty());
    assert_eq!(diagnostics.with_label("empty_rule").count(), 1);
}

#[test]
fn test_render_failure_drops_only_that_router() {
    let funcs = FuncMap::new().with(
        "host",
        minijinja::Value::from_function(|| -> Result<String, minijinja::Error> {
            Err(minijinja::Error::new(
                minijinja::ErrorKind::InvalidOperation,
                "no host label",
            ))
        }),
    );
    let default_rule = DefaultRuleTemplate::new("Host(`{{ host() }}`)", &funcs).unwrap();

    let mut a = Configuration::default();
    a.http.routers.insert("templated".into(), router("", "web"));
    a.http.routers.insert("explicit".into(), router("Host(`b`)", "web"));
    a.http.services.insert("web".into(), service(&["http://a"]));

    let mut diagnostics = Diagnostics::new();
    let mut merged = merge(&sources(vec![("a", a)]), &mut diagnostics);
    complete(&mut merged, "default", &default_rule, &json!({}), &mut diagnostics);

    assert!(!merged.http.routers.contains_key("templated"));
    assert!(merged.http.routers.contains_key("explicit"));
    let failures: Vec<_> = diagnostics.with_label("template_error").collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].reason.to_string().contains("no host label"));
}

#[test]
fn test_template_compile_error_is_caller_failure() {
    let result = DefaultRuleTemplate::new("Host(`{% if %}`)", &FuncMap::new());
    assert!(matches!(result, Err(TemplateError::Compile(_))));
}

#[test]
fn test_default_router_without_services_keeps_empty_service() {
    let mut a = Configuration::default();
    a.http.middlewares.insert("strip".into(), strip_prefix("/api"));

    let mut diagnostics = Diagnostics::new();
    let mut merged = merge(&sources(vec![("a", a)]), &mut diagnostics);
    complete(
        &mut merged,
        "default",
        &template("Host(`{{ normalize(name) }}`)"),
        &json!({ "name": "web" }),
        &mut diagnostics,
    );

    let router = &merged.http.routers["default"];
    assert_eq!(router.rule, "Host(`web`)");
    assert_eq!(router.service, "");
    assert!(diagnostics.is_empty());
}
