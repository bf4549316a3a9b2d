//! Provider configuration reconciliation.
//!
//! # Data Flow
//! ```text
//! source snapshots (identifier → Configuration)
//!     → merge.rs (sorted sources, per-kind reconciliation)
//!         → entity.rs (compatibility: deep equality, or load-balancer union)
//!     → merged Configuration + conflict diagnostics
//!     → completion.rs (default rules via template.rs, default services)
//!     → Configuration ready for the routing engine
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no shared state between calls
//! - Failures are recovered locally; the output is always a valid snapshot
//! - Diagnostics are an explicit argument, never a global

pub mod completion;
pub mod entity;
pub mod merge;
pub mod normalize;
pub mod template;

pub use completion::{
    build_router_configuration, build_tcp_router_configuration, build_udp_router_configuration,
    complete,
};
pub use entity::{try_add, Entity, EntityKind};
pub use merge::merge;
pub use normalize::normalize;
pub use template::{DefaultRuleTemplate, FuncMap, TemplateError};
