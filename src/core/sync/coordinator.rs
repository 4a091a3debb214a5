//! Sync coordinator - drives one run over every configured layer
//!
//! Layers are processed one after another in declaration order. Each
//! layer's pipeline runs under the retry policy; a layer that still fails
//! is logged with its full error chain, recorded as [`LayerOutcome::Failed`]
//! and the loop moves on. The symbology refresh runs last and can only
//! change the summary's symbology flag.

use crate::adapters::traits::{FeatureSource, HostedLayerStore};
use crate::config::{SymbologyConfig, SyncConfig};
use crate::core::retry::RetryPolicy;
use crate::core::symbology::update_hazard_symbology;
use crate::core::sync::pipeline::operate_on_layer;
use crate::core::sync::summary::{LayerOutcome, RunSummary};
use crate::domain::{error_chain, LayerDescriptor, SyncError};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;

/// Sync coordinator
pub struct SyncCoordinator {
    name: String,
    layers: Vec<LayerDescriptor>,
    symbology: SymbologyConfig,
    retry: RetryPolicy,
    source: Arc<dyn FeatureSource>,
    store: Arc<dyn HostedLayerStore>,
    work_dir: PathBuf,
}

impl SyncCoordinator {
    /// Create a coordinator for `config.layers`
    ///
    /// `work_dir` holds the per-layer staging directories; the caller owns
    /// its lifetime.
    pub fn new(
        config: &SyncConfig,
        source: Arc<dyn FeatureSource>,
        store: Arc<dyn HostedLayerStore>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: config.application.name.clone(),
            layers: config.layers.clone(),
            symbology: config.symbology.clone(),
            retry: RetryPolicy::from_config(&config.retry),
            source,
            store,
            work_dir: work_dir.into(),
        }
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run every layer, then the symbology refresh
    ///
    /// Never fails: per-layer and symbology errors end up in the summary.
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::new(&self.name, Local::now());

        tracing::info!(
            layers = self.layers.len(),
            max_attempts = self.retry.max_attempts,
            "Starting sync"
        );

        for layer in &self.layers {
            let outcome = self.process_layer(layer).await;
            summary.record(&layer.name, outcome);
        }

        let symbology_updated = self.update_symbology().await;
        summary.finish(symbology_updated, Local::now());
        summary.log_summary();
        summary
    }

    async fn process_layer(&self, layer: &LayerDescriptor) -> LayerOutcome {
        tracing::info!(layer = %layer.name, number = layer.number, "Processing layer");

        let source = self.source.as_ref();
        let store = self.store.as_ref();
        let work_dir = self.work_dir.as_path();
        let result = self
            .retry
            .retry(&layer.name, || async move {
                operate_on_layer(source, store, layer, work_dir).await
            })
            .await;

        match result {
            Ok(count) => LayerOutcome::Loaded(count),
            Err(e) => {
                log_failure(&format!("Layer {} failed", layer.name), &e);
                LayerOutcome::Failed
            }
        }
    }

    async fn update_symbology(&self) -> bool {
        let Some(layer) = self.layers.iter().find(|l| l.name == self.symbology.layer) else {
            tracing::error!(
                layer = %self.symbology.layer,
                "Symbology layer is not among the configured layers"
            );
            return false;
        };

        tracing::info!(layer = %layer.name, "Updating hazard area symbology");
        match update_hazard_symbology(
            self.store.as_ref(),
            &layer.item_id,
            &self.symbology,
            &self.retry,
        )
        .await
        {
            Ok(()) => true,
            Err(e) => {
                log_failure("Symbology update failed", &e);
                false
            }
        }
    }
}

fn log_failure(message: &str, error: &SyncError) {
    tracing::error!(error = %error_chain(error), "{message}");
}
