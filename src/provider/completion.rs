//! Router completion after the merge.
//!
//! # Responsibilities
//! - Synthesize a default HTTP router when none exists and at most one service does
//! - Fill empty HTTP rules from the default rule template
//! - Assign the sole service to routers that reference none
//! - Drop routers that cannot be completed, with a diagnostic
//!
//! # Design Decisions
//! - Stream routers get no template fallback: an empty TCP rule is fatal for that router
//! - UDP routers carry no rule; only the service default applies
//! - With zero services the service reference stays empty for the routing
//!   engine to reject downstream

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::schema::{Configuration, HttpConfiguration, Router, TcpConfiguration, UdpConfiguration};
use crate::observability::diagnostics::{Diagnostics, Reason};
use crate::provider::entity::EntityKind;
use crate::provider::template::DefaultRuleTemplate;

/// Give a service-less router the only service there is.
///
/// Returns false when the router must be dropped.
fn assign_default_service<T>(
    kind: EntityKind,
    router_name: &str,
    service: &mut String,
    services: &BTreeMap<String, T>,
    diagnostics: &mut Diagnostics,
) -> bool {
    if !service.is_empty() {
        return true;
    }

    if services.len() > 1 {
        diagnostics.report(kind, router_name, Reason::TooManyServices);
        return false;
    }

    if let Some(only) = services.keys().next() {
        *service = only.clone();
    }
    true
}

/// Complete HTTP routers in place.
pub fn build_router_configuration<S: Serialize + ?Sized>(
    configuration: &mut HttpConfiguration,
    default_router_name: &str,
    default_rule: &DefaultRuleTemplate,
    model: &S,
    diagnostics: &mut Diagnostics,
) {
    if configuration.routers.is_empty() {
        if configuration.services.len() > 1 {
            diagnostics.report(EntityKind::HttpRouter, default_router_name, Reason::NoDefaultRouter);
        } else {
            configuration
                .routers
                .insert(default_router_name.to_string(), Router::default());
        }
    }

    let services = &configuration.services;
    configuration.routers.retain(|name, router| {
        if router.rule.is_empty() {
            match default_rule.render(model) {
                Err(err) => {
                    diagnostics.report(EntityKind::HttpRouter, name.as_str(), Reason::Template(err.to_string()));
                    return false;
                }
                Ok(rule) if rule.is_empty() => {
                    diagnostics.report(EntityKind::HttpRouter, name.as_str(), Reason::UndefinedRule);
                    return false;
                }
                Ok(rule) => router.rule = rule,
            }
        }

        assign_default_service(
            EntityKind::HttpRouter,
            name,
            &mut router.service,
            services,
            diagnostics,
        )
    });
}

/// Complete TCP routers in place.
pub fn build_tcp_router_configuration(
    configuration: &mut TcpConfiguration,
    diagnostics: &mut Diagnostics,
) {
    let services = &configuration.services;
    configuration.routers.retain(|name, router| {
        if router.rule.is_empty() {
            diagnostics.report(EntityKind::TcpRouter, name.as_str(), Reason::EmptyRule);
            return false;
        }

        assign_default_service(
            EntityKind::TcpRouter,
            name,
            &mut router.service,
            services,
            diagnostics,
        )
    });
}

/// Complete UDP routers in place.
pub fn build_udp_router_configuration(
    configuration: &mut UdpConfiguration,
    diagnostics: &mut Diagnostics,
) {
    let services = &configuration.services;
    configuration.routers.retain(|name, router| {
        assign_default_service(
            EntityKind::UdpRouter,
            name,
            &mut router.service,
            services,
            diagnostics,
        )
    });
}

/// Run every completion pass over a merged configuration.
pub fn complete<S: Serialize + ?Sized>(
    configuration: &mut Configuration,
    default_router_name: &str,
    default_rule: &DefaultRuleTemplate,
    model: &S,
    diagnostics: &mut Diagnostics,
) {
    build_router_configuration(
        &mut configuration.http,
        default_router_name,
        default_rule,
        model,
        diagnostics,
    );
    build_tcp_router_configuration(&mut configuration.tcp, diagnostics);
    build_udp_router_configuration(&mut configuration.udp, diagnostics);
}
