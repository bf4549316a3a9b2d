//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! provider::merge / provider::completion produce:
//!     → diagnostics.rs (explicit per-cycle event collector)
//!         → tracing events (structured fields: entity, name, sources)
//!         → metrics.rs (rejection counters)
//!
//! Consumers:
//!     → Caller drains Diagnostics after the cycle
//!     → Log output (stderr) via logging.rs
//! ```
//!
//! # Design Decisions
//! - No global logger state in the core; the collector is an argument
//! - Metrics are cheap (facade no-ops without a recorder)

pub mod diagnostics;
pub mod logging;
pub mod metrics;

pub use diagnostics::{Diagnostic, Diagnostics, Reason, Severity};
