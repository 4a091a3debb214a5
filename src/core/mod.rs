//! Core business logic for nfhl-sync.
//!
//! # Modules
//!
//! - [`sync`] - Run orchestration, per-layer pipeline and run summary
//! - [`transform`] - Hazard labeling, column canonicalization, type coercion
//! - [`symbology`] - Hazard area drawing info refresh
//! - [`retry`] - Retry with exponential backoff
//!
//! # Sync Workflow
//!
//! 1. **Extract**: page features out of the NFHL map service
//! 2. **Transform**: label hazard areas, canonicalize columns, coerce types
//! 3. **Load**: truncate the hosted layer and add the features
//! 4. **Symbology**: rewrite the hazard area item's drawing info
//! 5. **Report**: render the run summary for the notification email
//!
//! # Example
//!
//! ```rust,no_run
//! use nfhl_sync::adapters::portal::PortalClient;
//! use nfhl_sync::adapters::rest::MapServiceClient;
//! use nfhl_sync::config::{load_config, load_secrets};
//! use nfhl_sync::core::sync::SyncCoordinator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("nfhl-sync.toml")?;
//! let secrets = load_secrets(&config.secrets)?;
//!
//! let source = Arc::new(MapServiceClient::new(&config.service)?);
//! let store = Arc::new(
//!     PortalClient::connect(&config.portal, &secrets.agol_user, &secrets.agol_password).await?,
//! );
//!
//! let work_dir = tempfile::TempDir::new()?;
//! let summary = SyncCoordinator::new(&config, source, store, work_dir.path()).run().await;
//!
//! println!("{}", summary.render_report());
//! # Ok(())
//! # }
//! ```

pub mod retry;
pub mod symbology;
pub mod sync;
pub mod transform;
