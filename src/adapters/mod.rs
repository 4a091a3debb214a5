//! External system integrations for nfhl-sync.
//!
//! This module provides adapters for the systems a run touches:
//!
//! - [`rest`] - FEMA NFHL map service (ArcGIS REST) extraction
//! - [`portal`] - ArcGIS Online token auth, truncate-and-load, item data
//! - [`notify`] - SendGrid summary email
//!
//! # Design Pattern
//!
//! Adapters implement the traits in [`traits`] so the sync core never sees
//! an HTTP client. Tests swap in in-process fakes.
//!
//! ```rust,no_run
//! use nfhl_sync::adapters::portal::PortalClient;
//! use nfhl_sync::adapters::rest::MapServiceClient;
//! use nfhl_sync::config::{secret_string, PortalConfig, ServiceConfig};
//!
//! # async fn example() -> nfhl_sync::domain::Result<()> {
//! let source = MapServiceClient::new(&ServiceConfig::default())?;
//! let store = PortalClient::connect(
//!     &PortalConfig::default(),
//!     "nfhl_bot",
//!     &secret_string("password".to_string()),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod notify;
pub mod portal;
pub mod rest;
pub mod traits;

pub use traits::{EmailMessage, FeatureSource, HostedLayerStore, Notifier};
