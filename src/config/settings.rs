//! Settings for the merge binary.
//!
//! All fields have defaults so an empty (or absent) settings file is valid.

use serde::{Deserialize, Serialize};

/// Root settings for a merge run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MergeSettings {
    /// Template used to synthesize rules for HTTP routers that have none.
    pub default_rule: String,

    /// Name given to the router synthesized when no router exists.
    pub default_router_name: String,

    /// Opaque data model handed to the default rule template.
    pub model: serde_json::Value,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            default_rule: "Host(`{{ normalize(name) }}`)".to_string(),
            default_router_name: "default".to_string(),
            model: serde_json::Value::Object(serde_json::Map::new()),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
