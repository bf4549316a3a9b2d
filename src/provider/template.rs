//! Default rule template.
//!
//! # Responsibilities
//! - Compile the default rule once per completion pass
//! - Provide the general-purpose function library plus `normalize`
//! - Let callers add or override functions before compilation
//!
//! # Design Decisions
//! - Compile errors surface from `DefaultRuleTemplate::new`; render errors
//!   are returned per call so completion can drop just that router
//! - The data model is any `Serialize` value and is never inspected here

use std::collections::BTreeMap;
use std::fmt;

use minijinja::{Environment, Value};
use serde::Serialize;
use thiserror::Error;

use crate::provider::normalize::normalize;

const TEMPLATE_NAME: &str = "defaultRule";

/// Error type for the default rule template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid default rule template: {0}")]
    Compile(#[source] minijinja::Error),

    #[error("{0}")]
    Render(#[source] minijinja::Error),
}

/// Named functions made available to the template.
///
/// Build entries with [`Value::from_function`].
#[derive(Debug, Clone, Default)]
pub struct FuncMap {
    functions: BTreeMap<String, Value>,
}

impl FuncMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `name`, replacing any earlier entry.
    pub fn insert(&mut self, name: impl Into<String>, function: Value) -> Option<Value> {
        self.functions.insert(name.into(), function)
    }

    pub fn with(mut self, name: impl Into<String>, function: Value) -> Self {
        self.insert(name, function);
        self
    }
}

/// A compiled default rule template.
pub struct DefaultRuleTemplate {
    env: Environment<'static>,
}

impl DefaultRuleTemplate {
    /// Compile `default_rule` with the built-in library, `normalize`, and `funcs`.
    pub fn new(default_rule: &str, funcs: &FuncMap) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        minijinja_contrib::add_to_environment(&mut env);
        env.set_unknown_method_callback(minijinja_contrib::pycompat::unknown_method_callback);
        env.add_function("normalize", |name: String| normalize(&name));

        for (name, function) in &funcs.functions {
            env.add_global(name.clone(), function.clone());
        }

        env.add_template_owned(TEMPLATE_NAME, default_rule.to_string())
            .map_err(TemplateError::Compile)?;

        Ok(Self { env })
    }

    /// Render the rule against a caller-supplied model.
    pub fn render<S: Serialize + ?Sized>(&self, model: &S) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(TemplateError::Render)?;
        template.render(model).map_err(TemplateError::Render)
    }
}

impl fmt::Debug for DefaultRuleTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRuleTemplate").finish_non_exhaustive()
    }
}
