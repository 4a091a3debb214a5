//! Sync orchestration
//!
//! - [`pipeline`] - one attempt of extract, transform and load for a layer
//! - [`coordinator`] - the driver loop with retries and failure isolation
//! - [`summary`] - per-layer outcomes and the report text

pub mod coordinator;
pub mod pipeline;
pub mod summary;

pub use coordinator::SyncCoordinator;
pub use pipeline::operate_on_layer;
pub use summary::{format_duration, LayerOutcome, RunSummary};
