// NFHL Sync - FEMA flood hazard layers to ArcGIS Online
// Copyright (c) 2025 NFHL Sync Contributors
// Licensed under the MIT License

//! # NFHL Sync - FEMA flood hazard layers to ArcGIS Online
//!
//! nfhl-sync mirrors the Utah portion of FEMA's National Flood Hazard Layer
//! (NFHL) into hosted feature layers on ArcGIS Online. It is meant to run as
//! a scheduled job: each run replaces the contents of every hosted layer,
//! refreshes the flood hazard area symbology and emails a summary.
//!
//! ## Overview
//!
//! For each configured layer the library:
//! - **Extracts** features from the FEMA map service, paging by object id
//! - **Transforms** them: hazard labels, canonical column names, type coercion
//! - **Loads** them by truncating the hosted layer and adding features in chunks
//!
//! Failures are isolated per layer and retried with exponential backoff.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (transform, sync, symbology, retry)
//! - [`adapters`] - External integrations (FEMA map service, ArcGIS Online, SendGrid)
//! - [`domain`] - Layer descriptors, in-memory tables and error types
//! - [`config`] - Configuration and secrets loading
//! - [`logging`] - Structured logging and the per-run log file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nfhl_sync::adapters::portal::PortalClient;
//! use nfhl_sync::adapters::rest::MapServiceClient;
//! use nfhl_sync::config::{load_config, load_secrets};
//! use nfhl_sync::core::sync::SyncCoordinator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("nfhl-sync.toml")?;
//!     let secrets = load_secrets(&config.secrets)?;
//!
//!     let source = MapServiceClient::new(&config.service)?;
//!     let store =
//!         PortalClient::connect(&config.portal, &secrets.agol_user, &secrets.agol_password)
//!             .await?;
//!
//!     let coordinator =
//!         SyncCoordinator::new(&config, Arc::new(source), Arc::new(store), "/tmp/nfhl");
//!     let summary = coordinator.run().await;
//!
//!     println!("{}", summary.render_report());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type
//! [`domain::SyncError`] wraps the adapter-specific errors:
//!
//! ```rust,no_run
//! use nfhl_sync::domain::SyncError;
//!
//! fn example() -> Result<(), SyncError> {
//!     let config = nfhl_sync::config::load_config("nfhl-sync.toml")?;
//!     println!("{} layers", config.layers.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
