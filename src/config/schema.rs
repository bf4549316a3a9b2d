//! Dynamic configuration schema definitions.
//!
//! This module defines the routing configuration produced by every source and
//! consumed by the routing engine. All types derive Serde traits so snapshots
//! can be read from TOML or JSON and written back out.
//!
//! Equality is derived field by field: two entities are "deep equal" exactly
//! when every field listed here compares equal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root dynamic configuration: one snapshot per source, or the merged result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Configuration {
    /// HTTP routers, services and middlewares.
    pub http: HttpConfiguration,

    /// TCP routers and services.
    pub tcp: TcpConfiguration,

    /// UDP routers and services.
    pub udp: UdpConfiguration,
}

impl Configuration {
    /// True when no collection holds any entity.
    pub fn is_empty(&self) -> bool {
        self.http.routers.is_empty()
            && self.http.services.is_empty()
            && self.http.middlewares.is_empty()
            && self.tcp.routers.is_empty()
            && self.tcp.services.is_empty()
            && self.udp.routers.is_empty()
            && self.udp.services.is_empty()
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// HTTP entity collections, keyed by entity name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HttpConfiguration {
    pub routers: BTreeMap<String, Router>,
    pub services: BTreeMap<String, Service>,
    pub middlewares: BTreeMap<String, Middleware>,
}

/// HTTP router: a matching rule bound to one service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Router {
    /// Entry points this router listens on (empty = all).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,

    /// Middleware names applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub middlewares: Vec<String>,

    /// Target service name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,

    /// Matching rule in the routing DSL, e.g. ``Host(`example.com`)``.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule: String,

    /// Router priority (0 = derived from rule length downstream).
    #[serde(skip_serializing_if = "is_zero")]
    pub priority: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouterTlsConfig>,
}

/// TLS settings attached to an HTTP router.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterTlsConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub options: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub cert_resolver: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<Domain>,
}

/// Certificate domain request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Domain {
    pub main: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sans: Vec<String>,
}

/// HTTP service. Exactly one of the variants is normally set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<ServersLoadBalancer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted: Option<WeightedRoundRobin>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirroring: Option<Mirroring>,
}

/// Load-balancing policy over a list of backend servers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ServersLoadBalancer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky: Option<Sticky>,

    /// Backend targets. Not part of the policy.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_host_header: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_forwarding: Option<ResponseForwarding>,
}

impl ServersLoadBalancer {
    /// Two policies are mergeable when they agree on everything but `servers`.
    pub fn mergeable(&self, other: &Self) -> bool {
        self.sticky == other.sticky
            && self.health_check == other.health_check
            && self.pass_host_header == other.pass_host_header
            && self.response_forwarding == other.response_forwarding
    }
}

/// A single HTTP backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Server {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Sticky {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie: Option<Cookie>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Cookie {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
}

/// Active health check settings for a load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HealthCheck {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scheme: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,

    #[serde(skip_serializing_if = "is_zero_u16")]
    pub port: u16,

    /// Interval as a duration string, e.g. "10s".
    #[serde(skip_serializing_if = "String::is_empty")]
    pub interval: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub timeout: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseForwarding {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub flush_interval: String,
}

/// Weighted round robin over other services.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WeightedRoundRobin {
    pub services: Vec<WrrService>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky: Option<Sticky>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WrrService {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

/// Mirroring: one main service plus mirrored copies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Mirroring {
    pub service: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_body_size: Option<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mirrors: Vec<MirrorService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MirrorService {
    pub name: String,
    pub percent: u32,
}

/// HTTP middleware. Each field is one middleware type; a source sets one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Middleware {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_prefix: Option<AddPrefix>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_prefix: Option<StripPrefix>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_scheme: Option<RedirectScheme>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<Retry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_allow_list: Option<IpAllowList>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Chain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AddPrefix {
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct StripPrefix {
    pub prefixes: Vec<String>,
    pub force_slash: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Headers {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_request_headers: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_response_headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectScheme {
    pub scheme: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub port: String,

    pub permanent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicAuth {
    pub users: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub realm: String,

    pub remove_header: bool,
}

/// Requests per period; `period` is a duration string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RateLimit {
    pub average: u64,
    pub burst: u64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Retry {
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct IpAllowList {
    pub source_range: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Chain {
    pub middlewares: Vec<String>,
}

// ---------------------------------------------------------------------------
// TCP
// ---------------------------------------------------------------------------

/// TCP entity collections, keyed by entity name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TcpConfiguration {
    pub routers: BTreeMap<String, TcpRouter>,
    pub services: BTreeMap<String, TcpService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpRouter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,

    /// Matching rule, e.g. ``HostSNI(`*`)``. Required.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouterTcpTlsConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterTcpTlsConfig {
    pub passthrough: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub options: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub cert_resolver: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<Domain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<TcpServersLoadBalancer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted: Option<StreamWeightedRoundRobin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpServersLoadBalancer {
    /// Milliseconds to wait for a close from the peer; negative = forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_delay: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_protocol: Option<ProxyProtocol>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<TcpServer>,
}

impl TcpServersLoadBalancer {
    /// Two policies are mergeable when they agree on everything but `servers`.
    pub fn mergeable(&self, other: &Self) -> bool {
        self.termination_delay == other.termination_delay
            && self.proxy_protocol == other.proxy_protocol
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TcpServer {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyProtocol {
    pub version: u8,
}

/// Weighted round robin for the stream families.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StreamWeightedRoundRobin {
    pub services: Vec<WrrService>,
}

// ---------------------------------------------------------------------------
// UDP
// ---------------------------------------------------------------------------

/// UDP entity collections, keyed by entity name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UdpConfiguration {
    pub routers: BTreeMap<String, UdpRouter>,
    pub services: BTreeMap<String, UdpService>,
}

/// UDP routers have no rule: everything on the entry point goes to the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UdpRouter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UdpService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<UdpServersLoadBalancer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted: Option<StreamWeightedRoundRobin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UdpServersLoadBalancer {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<UdpServer>,
}

impl UdpServersLoadBalancer {
    /// UDP policies carry nothing but servers, so any two are mergeable.
    pub fn mergeable(&self, _other: &Self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UdpServer {
    pub address: String,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

fn is_zero_u16(value: &u16) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_balancer_mergeable_ignores_servers() {
        let a = ServersLoadBalancer {
            servers: vec![Server { url: "http://10.0.0.1".into() }],
            pass_host_header: Some(true),
            ..Default::default()
        };
        let b = ServersLoadBalancer {
            servers: vec![Server { url: "http://10.0.0.2".into() }],
            pass_host_header: Some(true),
            ..Default::default()
        };
        assert!(a.mergeable(&b));

        let c = ServersLoadBalancer {
            pass_host_header: Some(false),
            ..b.clone()
        };
        assert!(!a.mergeable(&c));
    }

    #[test]
    fn test_tcp_load_balancer_mergeable() {
        let a = TcpServersLoadBalancer {
            termination_delay: Some(100),
            ..Default::default()
        };
        let b = TcpServersLoadBalancer {
            termination_delay: Some(200),
            ..Default::default()
        };
        assert!(a.mergeable(&a.clone()));
        assert!(!a.mergeable(&b));
    }

    #[test]
    fn test_deserialize_toml_snapshot() {
        let snapshot: Configuration = toml::from_str(
            r#"
            [http.routers.web]
            rule = "Host(`example.com`)"
            service = "app"
            entryPoints = ["websecure"]

            [http.services.app.loadBalancer]
            passHostHeader = true
            servers = [{ url = "http://10.0.0.1:8080" }]

            [tcp.routers.db]
            rule = "HostSNI(`*`)"
            "#,
        )
        .unwrap();

        let router = &snapshot.http.routers["web"];
        assert_eq!(router.rule, "Host(`example.com`)");
        assert_eq!(router.entry_points, vec!["websecure".to_string()]);

        let lb = snapshot.http.services["app"].load_balancer.as_ref().unwrap();
        assert_eq!(lb.servers.len(), 1);
        assert_eq!(lb.pass_host_header, Some(true));

        assert!(snapshot.tcp.routers["db"].service.is_empty());
        assert!(snapshot.udp.routers.is_empty());
    }

    #[test]
    fn test_empty_configuration() {
        assert!(Configuration::default().is_empty());
    }
}
