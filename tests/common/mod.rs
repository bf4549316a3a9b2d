//! Shared builders for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use config_merge::config::schema::{
    Middleware, Router, Server, ServersLoadBalancer, Service, StripPrefix, TcpRouter,
    TcpServer, TcpServersLoadBalancer, TcpService,
};
use config_merge::Configuration;

pub fn router(rule: &str, service: &str) -> Router {
    Router {
        rule: rule.into(),
        service: service.into(),
        entry_points: vec!["web".into()],
        ..Default::default()
    }
}

pub fn service(urls: &[&str]) -> Service {
    Service {
        load_balancer: Some(ServersLoadBalancer {
            servers: urls.iter().map(|u| Server { url: u.to_string() }).collect(),
            pass_host_header: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn strip_prefix(prefix: &str) -> Middleware {
    Middleware {
        strip_prefix: Some(StripPrefix {
            prefixes: vec![prefix.into()],
            force_slash: false,
        }),
        ..Default::default()
    }
}

pub fn tcp_router(rule: &str, service: &str) -> TcpRouter {
    TcpRouter {
        rule: rule.into(),
        service: service.into(),
        ..Default::default()
    }
}

pub fn tcp_service(addresses: &[&str]) -> TcpService {
    TcpService {
        load_balancer: Some(TcpServersLoadBalancer {
            servers: addresses
                .iter()
                .map(|a| TcpServer { address: a.to_string() })
                .collect(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn urls(configuration: &Configuration, name: &str) -> Vec<String> {
    configuration.http.services[name]
        .load_balancer
        .as_ref()
        .map(|lb| lb.servers.iter().map(|s| s.url.clone()).collect())
        .unwrap_or_default()
}

/// Build the source map inserting sources in the given order.
pub fn sources(entries: Vec<(&str, Configuration)>) -> HashMap<String, Configuration> {
    entries
        .into_iter()
        .map(|(name, configuration)| (name.to_string(), configuration))
        .collect()
}
