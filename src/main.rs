//! Routing configuration merge (v1)
//!
//! Loads one configuration snapshot per provider, merges them, completes
//! routers, and prints the result.
//!
//! # Architecture Overview
//!
//! ```text
//!   docker.toml ─┐
//!   file.json  ──┼─▶ config::loader ─▶ provider::merge ─▶ provider::completion ─▶ stdout (JSON)
//!   kv.toml    ──┘                           │                    │
//!                                            └──── Diagnostics ───┴──▶ logs (stderr)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use config_merge::config::loader::{load_model, load_settings, load_snapshots};
use config_merge::config::validation::validate_settings;
use config_merge::config::MergeSettings;
use config_merge::observability::logging;
use config_merge::provider::{complete, merge, DefaultRuleTemplate, FuncMap};
use config_merge::Diagnostics;

#[derive(Parser)]
#[command(name = "config-merge")]
#[command(about = "Merge provider routing configurations into one snapshot", long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Default rule template, overriding the settings file.
    #[arg(long)]
    default_rule: Option<String>,

    /// Name of the router synthesized when none exists.
    #[arg(long)]
    default_router_name: Option<String>,

    /// Template data model (TOML or JSON), overriding the settings file.
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Pretty-print the merged configuration.
    #[arg(long)]
    pretty: bool,

    /// Source snapshots (TOML or JSON); the file stem is the source identifier.
    #[arg(required = true)]
    sources: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => MergeSettings::default(),
    };
    if let Some(rule) = cli.default_rule {
        settings.default_rule = rule;
    }
    if let Some(name) = cli.default_router_name {
        settings.default_router_name = name;
    }
    if let Some(path) = &cli.model {
        settings.model = load_model(path)?;
    }
    validate_settings(&settings)
        .map_err(config_merge::config::loader::ConfigError::Validation)?;

    logging::init(&settings.observability);
    tracing::info!(sources = cli.sources.len(), "config-merge v0.1.0 starting");

    let default_rule = DefaultRuleTemplate::new(&settings.default_rule, &FuncMap::new())?;
    let snapshots = load_snapshots(&cli.sources)?;

    let mut diagnostics = Diagnostics::new();
    let mut configuration = merge(&snapshots, &mut diagnostics);
    complete(
        &mut configuration,
        &settings.default_router_name,
        &default_rule,
        &settings.model,
        &mut diagnostics,
    );

    tracing::info!(
        http_routers = configuration.http.routers.len(),
        http_services = configuration.http.services.len(),
        http_middlewares = configuration.http.middlewares.len(),
        tcp_routers = configuration.tcp.routers.len(),
        udp_routers = configuration.udp.routers.len(),
        diagnostics = diagnostics.len(),
        "Configuration merged"
    );

    let output = if cli.pretty {
        serde_json::to_string_pretty(&configuration)?
    } else {
        serde_json::to_string(&configuration)?
    };
    println!("{}", output);
    Ok(())
}
