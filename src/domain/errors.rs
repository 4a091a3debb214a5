//! Domain error types
//!
//! This module defines the error hierarchy for nfhl-sync.
//! Adapter errors are kept in their own enums so that no third-party
//! HTTP client types leak into the core.

use thiserror::Error;

/// Main nfhl-sync error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Secrets could not be located or parsed
    #[error("Secrets error: {0}")]
    Secrets(String),

    /// Map service extraction errors
    #[error("Map service error: {0}")]
    Rest(#[from] RestError),

    /// ArcGIS Online errors
    #[error("Portal error: {0}")]
    Portal(#[from] PortalError),

    /// Email notification errors
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    /// Layer transformation errors
    #[error("Transform error: {0}")]
    Transform(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl SyncError {
    /// Whether this error happened while connecting or authenticating
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            SyncError::Portal(PortalError::AuthenticationFailed(_))
                | SyncError::Portal(PortalError::ConnectionFailed(_))
                | SyncError::Rest(RestError::ConnectionFailed(_))
        )
    }
}

/// Errors raised by the ArcGIS REST map service extractor
#[derive(Debug, Error)]
pub enum RestError {
    /// Failed to reach the map service
    #[error("Failed to connect to map service: {0}")]
    ConnectionFailed(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status
    #[error("Request to {url} failed with status {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// The service answered 200 with an `error` object in the body
    #[error("Service error {code}: {message}")]
    Service { code: i64, message: String },

    /// Response body did not have the expected shape
    #[error("Invalid response from map service: {0}")]
    InvalidResponse(String),

    /// Fewer features came back than object ids were requested
    #[error("Expected {expected} features but received {received}")]
    IncompleteExtract { expected: usize, received: usize },
}

/// Errors raised by the ArcGIS Online client
#[derive(Debug, Error)]
pub enum PortalError {
    /// Failed to reach the portal
    #[error("Failed to connect to portal: {0}")]
    ConnectionFailed(String),

    /// Token generation failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Item id does not resolve to an item
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Item exists but has no feature service url
    #[error("Item {0} is not a hosted feature layer")]
    NotAFeatureLayer(String),

    /// Non-success HTTP status
    #[error("Request to {url} failed with status {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// The portal answered 200 with an `error` object in the body
    #[error("Portal error {code}: {message}")]
    Service { code: i64, message: String },

    /// Truncate request did not succeed
    #[error("Truncate failed for {0}")]
    TruncateFailed(String),

    /// Some features were rejected by addFeatures
    #[error("Add features failed: {added}/{total} added")]
    AddFailed { added: usize, total: usize },

    /// Item update request did not succeed
    #[error("Item update failed: {0}")]
    UpdateFailed(String),

    /// Response body did not have the expected shape
    #[error("Invalid response from portal: {0}")]
    InvalidResponse(String),
}

/// Errors raised while sending the summary email
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to reach the mail API
    #[error("Failed to connect to mail API: {0}")]
    ConnectionFailed(String),

    /// Mail API rejected the message
    #[error("Mail API rejected message with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Attachment could not be read
    #[error("Failed to read attachment {path}: {message}")]
    Attachment { path: String, message: String },
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

/// Render an error and every `source()` below it as one line
///
/// Used when converting a caught error into a log record so the full
/// context survives. Wrapper variants already print their inner error, so a
/// cause whose text ends the line so far is not repeated.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !rendered.ends_with(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}
