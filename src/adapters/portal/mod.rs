//! ArcGIS Online adapter
//!
//! Token authentication, item lookup, truncate-and-load of hosted feature
//! layers, and item data updates for symbology.

pub mod client;
pub mod models;

pub use client::PortalClient;
pub use models::{AddFeaturesResponse, EditResult, ItemInfo, SuccessResponse, TokenResponse};
