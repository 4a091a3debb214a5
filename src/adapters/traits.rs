//! Adapter traits
//!
//! The sync core talks to the outside world only through these traits.
//! Production code wires in the HTTP adapters; tests substitute in-process
//! fakes.

use crate::domain::{LayerDescriptor, LayerTable, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Source of layer features (the NFHL map service)
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Fetch every feature of `layer` that matches its where clause
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached, answers with an
    /// error, or returns fewer features than it listed.
    async fn extract(&self, layer: &LayerDescriptor) -> Result<LayerTable>;
}

/// Destination hosted feature layers (ArcGIS Online)
#[async_trait]
pub trait HostedLayerStore: Send + Sync {
    /// Replace every feature of the layer's hosted item with `table`
    ///
    /// Returns the number of features the service reports as added.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be resolved, the truncate fails,
    /// or any feature is rejected.
    async fn truncate_and_load(&self, layer: &LayerDescriptor, table: &LayerTable)
        -> Result<usize>;

    /// Fetch the item's data document (its `text` JSON)
    async fn item_data(&self, item_id: &str) -> Result<Value>;

    /// Replace the item's data document
    async fn update_item_data(&self, item_id: &str, data: &Value) -> Result<()>;
}

/// A plain-text email with an optional file attachment
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

/// Summary email sender
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `message` to the configured recipients
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}
