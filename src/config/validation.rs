//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (known log levels, non-blank names)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MergeSettings → Result<(), Vec<ValidationError>>
//! - Template syntax is checked when the template is compiled, not here

use std::fmt;

use crate::config::settings::MergeSettings;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate merge settings, collecting every problem found.
pub fn validate_settings(settings: &MergeSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.default_router_name.trim().is_empty() {
        errors.push(ValidationError {
            field: "default_router_name",
            message: "must not be blank".to_string(),
        });
    }

    let level = settings.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError {
            field: "observability.log_level",
            message: format!(
                "unknown level {:?}, expected one of {}",
                settings.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&MergeSettings::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut settings = MergeSettings::default();
        settings.default_router_name = "  ".into();
        settings.observability.log_level = "loud".into();

        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "default_router_name");
        assert_eq!(errors[1].field, "observability.log_level");
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut settings = MergeSettings::default();
        settings.observability.log_level = "DEBUG".into();
        assert!(validate_settings(&settings).is_ok());
    }
}
