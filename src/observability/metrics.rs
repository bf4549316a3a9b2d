//! Metrics collection.
//!
//! # Metrics
//! - `config_merge_rejections_total` (counter): removed entities by kind and reason
//!
//! # Design Decisions
//! - Uses the `metrics` facade; without an installed recorder updates are no-ops
//! - Exposition is the embedding process's concern

use crate::observability::diagnostics::Reason;
use crate::provider::EntityKind;

/// Count one removed entity.
pub fn record_rejection(kind: EntityKind, reason: &Reason) {
    ::metrics::counter!(
        "config_merge_rejections_total",
        "kind" => kind.as_str(),
        "reason" => reason.label()
    )
    .increment(1);
}
