//! Configuration management for nfhl-sync.
//!
//! This module provides TOML-based configuration loading, validation, and
//! the secrets document loader.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `NFHL_<SECTION>_<KEY>` environment overrides
//! - Defaults for every section, including the nine NFHL layers
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nfhl_sync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("nfhl-sync.toml")?;
//!
//! println!("Map service: {}", config.service.url);
//! for layer in &config.layers {
//!     println!("{} -> {}", layer.name, layer.item_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! name = "nfhl_sync"
//! log_level = "info"
//!
//! [service]
//! url = "https://hazards.fema.gov/arcgis/rest/services/public/NFHL/MapServer"
//! timeout_seconds = 20
//!
//! [retry]
//! max_attempts = 4
//!
//! [[layers]]
//! name = "S_BFE"
//! number = 16
//! item_id = "8cab946b96d94167bd75314c32584d1a"
//! double_fields = ["elev"]
//! ```
//!
//! # Secrets
//!
//! Credentials never live in the TOML file. They are read from
//! `/secrets/app/secrets.json` when the `/secrets` mount exists, otherwise
//! from `secrets/secrets.json`; see [`secret::load_secrets`].

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, LoggingConfig, NotificationConfig, PortalConfig, RetryConfig,
    SecretsConfig, ServiceConfig, SymbologyConfig, SyncConfig,
};
pub use secret::{load_secrets, secret_string, SecretString, SecretValue, Secrets};
