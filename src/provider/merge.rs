//! Merge of per-source snapshots into one configuration.
//!
//! # Responsibilities
//! - Visit sources in lexicographic order of their identifiers
//! - Reconcile every entity kind through `entity::try_add`
//! - Purge conflicted names once, after every source is processed
//!
//! # Design Decisions
//! - Sorted source order fixes both target-list order and which definition
//!   is stored first, independent of map iteration order
//! - A name rejected once stays rejected: every defining source must agree
//! - Each call builds a fresh output; nothing is shared between calls

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::schema::{Configuration, HttpConfiguration, TcpConfiguration, UdpConfiguration};
use crate::observability::diagnostics::{Diagnostics, Reason};
use crate::provider::entity::{try_add, Entity};

/// Merge state for one entity kind.
struct KindMerge<T> {
    merged: BTreeMap<String, T>,
    /// Sources that defined each name, in processing order.
    origins: HashMap<String, Vec<String>>,
    rejected: BTreeSet<String>,
}

impl<T: Entity> KindMerge<T> {
    fn new() -> Self {
        Self {
            merged: BTreeMap::new(),
            origins: HashMap::new(),
            rejected: BTreeSet::new(),
        }
    }

    fn add_all(&mut self, source: &str, entities: &BTreeMap<String, T>) {
        for (name, entity) in entities {
            self.origins
                .entry(name.clone())
                .or_default()
                .push(source.to_string());

            if !try_add(&mut self.merged, name, entity) {
                self.rejected.insert(name.clone());
            }
        }
    }

    /// Drop conflicted names, reporting each one with all its sources.
    fn finish(self, diagnostics: &mut Diagnostics) -> BTreeMap<String, T> {
        let KindMerge {
            merged,
            mut origins,
            rejected,
        } = self;

        for name in &rejected {
            let sources = origins.remove(name).unwrap_or_default();
            diagnostics.report(T::KIND, name.as_str(), Reason::Conflict { sources });
        }

        merged
            .into_iter()
            .filter(|(name, _)| !rejected.contains(name))
            .collect()
    }
}

/// Merge every source snapshot into a single configuration.
///
/// Incompatible same-named entities are removed from the result and reported
/// to `diagnostics`; the merge itself never fails.
pub fn merge(
    configurations: &HashMap<String, Configuration>,
    diagnostics: &mut Diagnostics,
) -> Configuration {
    let mut sources: Vec<&String> = configurations.keys().collect();
    sources.sort();

    let mut http_routers = KindMerge::new();
    let mut http_services = KindMerge::new();
    let mut http_middlewares = KindMerge::new();
    let mut tcp_routers = KindMerge::new();
    let mut tcp_services = KindMerge::new();
    let mut udp_routers = KindMerge::new();
    let mut udp_services = KindMerge::new();

    for source in sources {
        let Some(configuration) = configurations.get(source) else {
            continue;
        };
        tracing::debug!(source = %source, "Merging source snapshot");

        http_routers.add_all(source, &configuration.http.routers);
        http_services.add_all(source, &configuration.http.services);
        http_middlewares.add_all(source, &configuration.http.middlewares);
        tcp_routers.add_all(source, &configuration.tcp.routers);
        tcp_services.add_all(source, &configuration.tcp.services);
        udp_routers.add_all(source, &configuration.udp.routers);
        udp_services.add_all(source, &configuration.udp.services);
    }

    Configuration {
        http: HttpConfiguration {
            routers: http_routers.finish(diagnostics),
            services: http_services.finish(diagnostics),
            middlewares: http_middlewares.finish(diagnostics),
        },
        tcp: TcpConfiguration {
            routers: tcp_routers.finish(diagnostics),
            services: tcp_services.finish(diagnostics),
        },
        udp: UdpConfiguration {
            routers: udp_routers.finish(diagnostics),
            services: udp_services.finish(diagnostics),
        },
    }
}
