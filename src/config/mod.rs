//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! source files (TOML/JSON), one per source
//!     → loader.rs (parse & deserialize, identifier = file stem)
//!     → schema.rs Configuration (one snapshot per source)
//!     → provider::merge (single merged snapshot)
//!
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MergeSettings (default rule, router name, template model)
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable inputs; the merge builds a fresh output
//! - All fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use schema::Configuration;
pub use schema::HttpConfiguration;
pub use schema::TcpConfiguration;
pub use schema::UdpConfiguration;
pub use settings::MergeSettings;
