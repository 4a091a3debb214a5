//! ArcGIS REST map service adapter
//!
//! Reads NFHL layers from the FEMA map service.

pub mod client;
pub mod models;

pub use client::MapServiceClient;
pub use models::{service_error, LayerInfo, ObjectIdsResponse, ServiceErrorBody};
