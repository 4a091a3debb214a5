//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable levels
//! - Local JSON file logging with rotation
//! - A per-run log file attached to the summary email
//!
//! # Example
//!
//! ```no_run
//! use nfhl_sync::logging::init_logging;
//! use nfhl_sync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let logging = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! let dir = tempfile::TempDir::new().unwrap();
//! let _attached = logging.run_log().attach(&dir.path().join("log.txt")).unwrap();
//! tracing::info!("Application started");
//! ```

pub mod run_log;
pub mod structured;

pub use run_log::{RunLogFile, RunLogGuard};
pub use structured::{init_logging, LoggingGuard};

/// Log an error together with every cause below it
///
/// # Example
///
/// ```no_run
/// use nfhl_sync::log_error_chain;
/// use nfhl_sync::domain::SyncError;
///
/// let error = SyncError::Configuration("Invalid config".to_string());
/// log_error_chain!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_chain {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$crate::domain::error_chain($error),
            context = $context,
            "Error occurred"
        );
    };
}
