//! Per-kind compatibility rules for same-named entities.
//!
//! # Responsibilities
//! - Decide whether a candidate is compatible with the stored definition
//! - Fold compatible services into one (target lists concatenated)
//!
//! # Design Decisions
//! - Routers and middlewares must be deep-equal; no partial merge
//! - Services merge only when their load-balancing policies agree
//! - Never deletes: the first accepted definition stays as evidence until
//!   the orchestrator purges conflicted names

use std::collections::BTreeMap;
use std::fmt;

use crate::config::schema::{
    Middleware, Router, Service, ServersLoadBalancer, TcpRouter, TcpServersLoadBalancer,
    TcpService, UdpRouter, UdpServersLoadBalancer, UdpService,
};

/// The entity collections a merge reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    HttpRouter,
    HttpService,
    HttpMiddleware,
    TcpRouter,
    TcpService,
    UdpRouter,
    UdpService,
}

impl EntityKind {
    /// Stable identifier for logs and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::HttpRouter => "http_router",
            EntityKind::HttpService => "http_service",
            EntityKind::HttpMiddleware => "http_middleware",
            EntityKind::TcpRouter => "tcp_router",
            EntityKind::TcpService => "tcp_service",
            EntityKind::UdpRouter => "udp_router",
            EntityKind::UdpService => "udp_service",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::HttpRouter => "router",
            EntityKind::HttpService => "service",
            EntityKind::HttpMiddleware => "middleware",
            EntityKind::TcpRouter => "TCP router",
            EntityKind::TcpService => "TCP service",
            EntityKind::UdpRouter => "UDP router",
            EntityKind::UdpService => "UDP service",
        };
        f.write_str(label)
    }
}

/// A named configuration entity that can be reconciled across sources.
pub trait Entity: Clone + PartialEq {
    const KIND: EntityKind;

    /// Fold `candidate` into `self` if the two are compatible.
    ///
    /// Returns false and leaves `self` untouched otherwise.
    fn absorb(&mut self, candidate: &Self) -> bool {
        self == candidate
    }
}

/// Add `candidate` under `name`, or reconcile it with the stored entry.
///
/// Returns whether the candidate was accepted.
pub fn try_add<T: Entity>(collection: &mut BTreeMap<String, T>, name: &str, candidate: &T) -> bool {
    match collection.get_mut(name) {
        Some(existing) => existing.absorb(candidate),
        None => {
            collection.insert(name.to_string(), candidate.clone());
            true
        }
    }
}

/// A load-balancing policy plus its backend targets.
trait Pool {
    fn mergeable(&self, other: &Self) -> bool;
    fn append(&mut self, other: &Self);
}

impl Pool for ServersLoadBalancer {
    fn mergeable(&self, other: &Self) -> bool {
        ServersLoadBalancer::mergeable(self, other)
    }

    fn append(&mut self, other: &Self) {
        self.servers.extend(other.servers.iter().cloned());
    }
}

impl Pool for TcpServersLoadBalancer {
    fn mergeable(&self, other: &Self) -> bool {
        TcpServersLoadBalancer::mergeable(self, other)
    }

    fn append(&mut self, other: &Self) {
        self.servers.extend(other.servers.iter().cloned());
    }
}

impl Pool for UdpServersLoadBalancer {
    fn mergeable(&self, other: &Self) -> bool {
        UdpServersLoadBalancer::mergeable(self, other)
    }

    fn append(&mut self, other: &Self) {
        self.servers.extend(other.servers.iter().cloned());
    }
}

/// Services without a load balancer on either side are already known equal.
fn absorb_pool<P: Pool>(existing: Option<&mut P>, incoming: Option<&P>) -> bool {
    match (existing, incoming) {
        (Some(existing), Some(incoming)) => {
            if !existing.mergeable(incoming) {
                return false;
            }
            existing.append(incoming);
            true
        }
        (None, None) => true,
        _ => false,
    }
}

impl Entity for Router {
    const KIND: EntityKind = EntityKind::HttpRouter;
}

impl Entity for Middleware {
    const KIND: EntityKind = EntityKind::HttpMiddleware;
}

impl Entity for TcpRouter {
    const KIND: EntityKind = EntityKind::TcpRouter;
}

impl Entity for UdpRouter {
    const KIND: EntityKind = EntityKind::UdpRouter;
}

impl Entity for Service {
    const KIND: EntityKind = EntityKind::HttpService;

    fn absorb(&mut self, candidate: &Self) -> bool {
        if self.weighted != candidate.weighted || self.mirroring != candidate.mirroring {
            return false;
        }
        absorb_pool(self.load_balancer.as_mut(), candidate.load_balancer.as_ref())
    }
}

impl Entity for TcpService {
    const KIND: EntityKind = EntityKind::TcpService;

    fn absorb(&mut self, candidate: &Self) -> bool {
        if self.weighted != candidate.weighted {
            return false;
        }
        absorb_pool(self.load_balancer.as_mut(), candidate.load_balancer.as_ref())
    }
}

impl Entity for UdpService {
    const KIND: EntityKind = EntityKind::UdpService;

    fn absorb(&mut self, candidate: &Self) -> bool {
        if self.weighted != candidate.weighted {
            return false;
        }
        absorb_pool(self.load_balancer.as_mut(), candidate.load_balancer.as_ref())
    }
}
