//! Per-layer extract, transform and load
//!
//! One call of [`operate_on_layer`] is one attempt; the coordinator wraps
//! it in the retry policy. Every attempt starts from a fresh working
//! directory, so a retry never sees a previous attempt's files.

use crate::adapters::traits::{FeatureSource, HostedLayerStore};
use crate::core::transform::transform_layer;
use crate::domain::{LayerDescriptor, LayerTable, Result};
use std::path::{Path, PathBuf};

/// Name of the staged payload inside a layer's working directory
pub const STAGED_FEATURES_FILE: &str = "features.json";

/// Extract, transform and load one layer
///
/// Returns the number of features the hosted layer reports as added.
pub async fn operate_on_layer(
    source: &dyn FeatureSource,
    store: &dyn HostedLayerStore,
    layer: &LayerDescriptor,
    work_root: &Path,
) -> Result<usize> {
    tracing::info!(layer = %layer.name, "Extracting");
    let table = source.extract(layer).await?;
    tracing::debug!(layer = %layer.name, rows = table.len(), "Extracted");

    tracing::info!(layer = %layer.name, "Transforming");
    let table = transform_layer(layer, table)?;

    let staged = stage_layer(work_root, layer, &table).await?;
    tracing::debug!(layer = %layer.name, path = %staged.display(), "Staged features");

    tracing::info!(layer = %layer.name, "Loading");
    let added = store.truncate_and_load(layer, &table).await?;
    tracing::info!(layer = %layer.name, added = added, "Loaded");

    Ok(added)
}

/// Recreate `{work_root}/{layer name}` and write the payload into it
pub async fn stage_layer(
    work_root: &Path,
    layer: &LayerDescriptor,
    table: &LayerTable,
) -> Result<PathBuf> {
    let layer_dir = work_root.join(&layer.name);
    if tokio::fs::try_exists(&layer_dir).await? {
        tokio::fs::remove_dir_all(&layer_dir).await?;
    }
    tokio::fs::create_dir_all(&layer_dir).await?;

    let path = layer_dir.join(STAGED_FEATURES_FILE);
    let payload = serde_json::to_vec(table)?;
    tokio::fs::write(&path, payload).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Feature, Field, FieldType, SyncError};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StaticSource;

    #[async_trait]
    impl FeatureSource for StaticSource {
        async fn extract(&self, _layer: &LayerDescriptor) -> Result<LayerTable> {
            let attributes = json!({"OBJECTID": 1, "ELEV": "4500.5"});
            Ok(LayerTable::new(
                vec![
                    Field::new("OBJECTID", FieldType::Oid),
                    Field::new("ELEV", FieldType::String),
                ],
                vec![Feature::new(
                    attributes.as_object().cloned().unwrap(),
                    Some(json!({"paths": [[[0, 0], [1, 1]]]})),
                )],
            ))
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        loaded: Mutex<Vec<LayerTable>>,
    }

    #[async_trait]
    impl HostedLayerStore for RecordingStore {
        async fn truncate_and_load(
            &self,
            _layer: &LayerDescriptor,
            table: &LayerTable,
        ) -> Result<usize> {
            self.loaded.lock().unwrap().push(table.clone());
            Ok(table.len())
        }

        async fn item_data(&self, _item_id: &str) -> Result<Value> {
            Err(SyncError::Transform("unused".to_string()))
        }

        async fn update_item_data(&self, _item_id: &str, _data: &Value) -> Result<()> {
            Ok(())
        }
    }

    fn bfe() -> LayerDescriptor {
        LayerDescriptor::new("S_BFE", 16, "8cab946b96d94167bd75314c32584d1a")
            .with_double_fields(&["elev"])
    }

    #[tokio::test]
    async fn test_operate_on_layer_loads_transformed_table() {
        let work = TempDir::new().unwrap();
        let store = RecordingStore::default();

        let added = operate_on_layer(&StaticSource, &store, &bfe(), work.path())
            .await
            .unwrap();

        assert_eq!(added, 1);
        let loaded = store.loaded.lock().unwrap();
        assert_eq!(loaded[0].features[0].attributes["elev"], json!(4500.5));
        assert!(work.path().join("S_BFE").join(STAGED_FEATURES_FILE).exists());
    }

    #[tokio::test]
    async fn test_stage_layer_replaces_previous_attempt() {
        let work = TempDir::new().unwrap();
        let stale = work.path().join("S_BFE").join("leftover.gdb");
        std::fs::create_dir_all(&stale).unwrap();

        let path = stage_layer(work.path(), &bfe(), &LayerTable::default())
            .await
            .unwrap();

        assert!(!stale.exists());
        let staged: LayerTable =
            serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert!(staged.is_empty());
    }
}
