//! Routing configuration merge library.
//!
//! Reconciles the configuration snapshots of independent providers into one
//! configuration for the routing engine.

pub mod config;
pub mod observability;
pub mod provider;

pub use config::schema::Configuration;
pub use observability::Diagnostics;
pub use provider::{complete, merge, DefaultRuleTemplate, FuncMap};
