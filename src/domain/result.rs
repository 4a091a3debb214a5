//! Result type alias for nfhl-sync

use super::errors::SyncError;

/// Result type alias for nfhl-sync operations
///
/// # Examples
///
/// ```
/// use nfhl_sync::domain::result::Result;
/// use nfhl_sync::domain::errors::SyncError;
///
/// fn example_function() -> Result<usize> {
///     Ok(42)
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Transform("missing column".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
