//! Configuration loading from disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::schema::Configuration;
use crate::config::settings::MergeSettings;
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported file format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("cannot derive a source identifier from {0}")]
    MissingIdentifier(PathBuf),

    #[error("source {name:?} defined by more than one file")]
    DuplicateSource { name: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Deserialize a TOML or JSON file, chosen by extension.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        Some("json") => serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load one source snapshot. The source identifier is the file stem.
pub fn load_snapshot(path: &Path) -> Result<(String, Configuration), ConfigError> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| ConfigError::MissingIdentifier(path.to_path_buf()))?
        .to_string();

    let snapshot = read_document(path)?;
    tracing::debug!(source = %name, path = %path.display(), "Source snapshot loaded");
    Ok((name, snapshot))
}

/// Load every source snapshot, keyed by source identifier.
pub fn load_snapshots<P: AsRef<Path>>(
    paths: &[P],
) -> Result<HashMap<String, Configuration>, ConfigError> {
    let mut snapshots = HashMap::with_capacity(paths.len());
    for path in paths {
        let (name, snapshot) = load_snapshot(path.as_ref())?;
        if snapshots.contains_key(&name) {
            return Err(ConfigError::DuplicateSource { name });
        }
        snapshots.insert(name, snapshot);
    }
    Ok(snapshots)
}

/// Load and validate merge settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<MergeSettings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: MergeSettings = toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;

    validate_settings(&settings).map_err(ConfigError::Validation)?;

    Ok(settings)
}

/// Load a template data model from a TOML or JSON file.
pub fn load_model(path: &Path) -> Result<serde_json::Value, ConfigError> {
    read_document(path)
}
