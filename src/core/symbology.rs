//! Hazard area symbology refresh
//!
//! Truncate-and-load leaves the hosted item's renderer alone, but the
//! hazard area item is symbolized on `label` through a drawing info stored
//! in its data document. After the layers load, that drawing info is
//! rewritten from a static JSON file.

use crate::adapters::traits::HostedLayerStore;
use crate::config::SymbologyConfig;
use crate::core::retry::RetryPolicy;
use crate::domain::{PortalError, Result, SyncError};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Pick the drawing info file, preferring the container path
///
/// # Errors
///
/// Returns a configuration error when neither file exists.
pub fn resolve_drawing_info_path(config: &SymbologyConfig) -> Result<PathBuf> {
    [&config.drawing_info_path, &config.fallback_drawing_info_path]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
        .ok_or_else(|| {
            SyncError::Configuration(format!(
                "Drawing info not found at {} or {}",
                config.drawing_info_path, config.fallback_drawing_info_path
            ))
        })
}

/// Read the drawing info JSON
pub fn load_drawing_info(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| SyncError::Io(format!("Failed to read {}: {e}", path.display())))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Set `layers[0].layerDefinition.drawingInfo` in an item data document
pub fn apply_drawing_info(data: &mut Value, drawing_info: Value) -> Result<()> {
    let layer = data
        .get_mut("layers")
        .and_then(|layers| layers.get_mut(0))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| PortalError::InvalidResponse("item data has no layers".to_string()))?;

    let definition = layer
        .entry("layerDefinition")
        .or_insert_with(|| Value::Object(Default::default()));
    let definition = definition.as_object_mut().ok_or_else(|| {
        PortalError::InvalidResponse("layerDefinition is not an object".to_string())
    })?;
    definition.insert("drawingInfo".to_string(), drawing_info);
    Ok(())
}

/// Rewrite the hazard area item's drawing info
///
/// Only the item update is retried.
pub async fn update_hazard_symbology(
    store: &dyn HostedLayerStore,
    item_id: &str,
    config: &SymbologyConfig,
    retry: &RetryPolicy,
) -> Result<()> {
    let path = resolve_drawing_info_path(config)?;
    let drawing_info = load_drawing_info(&path)?;
    tracing::debug!(path = %path.display(), "Loaded drawing info");

    let mut data = store.item_data(item_id).await?;
    apply_drawing_info(&mut data, drawing_info)?;

    let data = &data;
    retry
        .retry("update hazard symbology", || async move {
            store.update_item_data(item_id, data).await
        })
        .await?;

    tracing::info!(item_id = %item_id, "Updated hazard area symbology");
    Ok(())
}
