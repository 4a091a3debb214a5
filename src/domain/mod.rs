//! Domain models and types for nfhl-sync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Layer descriptors** ([`LayerDescriptor`]) naming each synchronized dataset
//! - **Layer tables** ([`LayerTable`]) holding extracted features in memory
//! - **Error types** ([`SyncError`], [`RestError`], [`PortalError`], [`NotificationError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use nfhl_sync::domain::{default_layers, LayerDescriptor};
//!
//! let layers = default_layers();
//! let bfe = LayerDescriptor::new("S_BFE", 16, "8cab946b96d94167bd75314c32584d1a")
//!     .with_double_fields(&["elev"]);
//! assert!(layers.contains(&bfe));
//! ```

pub mod errors;
pub mod layer;
pub mod result;
pub mod table;

pub use errors::{error_chain, NotificationError, PortalError, RestError, SyncError};
pub use layer::{default_layers, LayerDescriptor, HAZARD_AREA_LAYER};
pub use result::Result;
pub use table::{Feature, Field, FieldType, LayerTable};
