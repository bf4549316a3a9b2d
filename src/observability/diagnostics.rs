//! Diagnostics collected during a merge cycle.
//!
//! # Responsibilities
//! - Carry rejected-entity and router-completion events to the caller
//! - Mirror every event to the structured log and the rejection counter
//!
//! # Design Decisions
//! - Passed explicitly by `&mut` into merge and completion, drained by the caller
//! - One collector per cycle; nothing is shared across invocations

use std::fmt;

use crate::observability::metrics;
use crate::provider::EntityKind;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing was dropped; the input shape simply produced no result.
    Info,
    /// An entity was removed from the output.
    Error,
}

/// Why an entity was rejected or left incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Same name, incompatible definitions. Lists every source that defined it.
    Conflict { sources: Vec<String> },
    /// Router has no service and more than one service exists.
    TooManyServices,
    /// No router exists and more than one service does, so none was synthesized.
    NoDefaultRouter,
    /// The default rule template failed to render.
    Template(String),
    /// The default rule template rendered empty text.
    UndefinedRule,
    /// Stream router without a rule.
    EmptyRule,
}

impl Reason {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Reason::Conflict { .. } => "conflict",
            Reason::TooManyServices => "too_many_services",
            Reason::NoDefaultRouter => "no_default_router",
            Reason::Template(_) => "template_error",
            Reason::UndefinedRule => "undefined_rule",
            Reason::EmptyRule => "empty_rule",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Reason::NoDefaultRouter => Severity::Info,
            _ => Severity::Error,
        }
    }

    /// Contributing sources, for conflicts.
    pub fn sources(&self) -> &[String] {
        match self {
            Reason::Conflict { sources } => sources,
            _ => &[],
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Conflict { sources } => write!(
                f,
                "defined multiple times with different configurations in [{}]",
                sources.join(", ")
            ),
            Reason::TooManyServices => {
                write!(f, "could not define the service name for the router: too many services")
            }
            Reason::NoDefaultRouter => write!(f, "could not create a router: too many services"),
            Reason::Template(err) => write!(f, "error while rendering default rule: {}", err),
            Reason::UndefinedRule => write!(f, "undefined rule"),
            Reason::EmptyRule => write!(f, "empty rule"),
        }
    }
}

/// A single event about one named entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: EntityKind,
    pub name: String,
    pub reason: Reason,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.reason.severity()
    }

    /// True when the event removed an entity from the output.
    pub fn is_rejection(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}: {}", self.kind, self.name, self.reason)
    }
}

/// Collector for the diagnostics of one merge cycle.
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event, logging and counting it.
    pub fn report(&mut self, kind: EntityKind, name: impl Into<String>, reason: Reason) {
        let diagnostic = Diagnostic {
            kind,
            name: name.into(),
            reason,
        };

        match diagnostic.severity() {
            Severity::Error => tracing::error!(
                entity = %diagnostic.kind,
                name = %diagnostic.name,
                sources = ?diagnostic.reason.sources(),
                "{}",
                diagnostic.reason
            ),
            Severity::Info => tracing::info!(
                entity = %diagnostic.kind,
                name = %diagnostic.name,
                "{}",
                diagnostic.reason
            ),
        }
        if diagnostic.is_rejection() {
            metrics::record_rejection(diagnostic.kind, &diagnostic.reason);
        }

        self.events.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose reason has the given label.
    pub fn with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.events.iter().filter(move |d| d.reason.label() == label)
    }

    /// Take every collected event, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.events)
    }
}
