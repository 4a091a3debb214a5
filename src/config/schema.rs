//! Configuration schema types
//!
//! This module defines the configuration structure for nfhl-sync.

use crate::domain::layer::{default_layers, LayerDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Main nfhl-sync configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// FEMA map service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// ArcGIS Online settings
    #[serde(default)]
    pub portal: PortalConfig,

    /// Retry policy for each layer pipeline
    #[serde(default)]
    pub retry: RetryConfig,

    /// Where to look for the secrets document
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Summary email settings
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Hazard area symbology fixup settings
    #[serde(default)]
    pub symbology: SymbologyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Layers to synchronize, in processing order
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerDescriptor>,
}

impl SyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.service.validate()?;
        self.portal.validate()?;
        self.retry.validate()?;
        self.notification.validate()?;
        self.logging.validate()?;

        if self.layers.is_empty() {
            return Err("at least one [[layers]] entry is required".to_string());
        }

        let mut names = HashSet::new();
        for layer in &self.layers {
            layer.validate()?;
            if !names.insert(layer.name.as_str()) {
                return Err(format!("duplicate layer name '{}'", layer.name));
            }
        }

        Ok(())
    }

    /// Look up a configured layer by name
    pub fn layer(&self, name: &str) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|l| l.name == name)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            service: ServiceConfig::default(),
            portal: PortalConfig::default(),
            retry: RetryConfig::default(),
            secrets: SecretsConfig::default(),
            notification: NotificationConfig::default(),
            symbology: SymbologyConfig::default(),
            logging: LoggingConfig::default(),
            layers: default_layers(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Job name used in log targets, email subject and report header
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("application.name cannot be empty".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// FEMA map service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Map service root; layer numbers are appended to it
    #[serde(default = "default_service_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Upper bound on object ids requested per query
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl ServiceConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err("service.url must start with http:// or https://".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("service.timeout_seconds must be greater than 0".to_string());
        }
        if self.max_page_size == 0 {
            return Err("service.max_page_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_service_url(),
            timeout_seconds: default_timeout_seconds(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// ArcGIS Online configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Organisation url
    #[serde(default = "default_org_url")]
    pub org_url: String,

    /// Lifetime of generated tokens
    #[serde(default = "default_token_expiration_minutes")]
    pub token_expiration_minutes: u64,

    /// Features sent per addFeatures request
    #[serde(default = "default_add_chunk_size")]
    pub add_chunk_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_portal_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl PortalConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.org_url.starts_with("https://") && !self.org_url.starts_with("http://") {
            return Err("portal.org_url must start with https://".to_string());
        }
        if self.add_chunk_size == 0 || self.add_chunk_size > 2000 {
            return Err(format!(
                "portal.add_chunk_size must be between 1 and 2000, got {}",
                self.add_chunk_size
            ));
        }
        Ok(())
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            org_url: default_org_url(),
            token_expiration_minutes: default_token_expiration_minutes(),
            add_chunk_size: default_add_chunk_size(),
            timeout_seconds: default_portal_timeout_seconds(),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err(format!(
                "retry.max_attempts must be between 1 and 10, got {}",
                self.max_attempts
            ));
        }
        if self.backoff_multiplier < 1.0 {
            return Err("retry.backoff_multiplier must be >= 1.0".to_string());
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Secrets document locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Mount point checked first; the document is `app/secrets.json` inside it
    #[serde(default = "default_secrets_mount_dir")]
    pub mount_dir: String,

    /// Local development folder; the document is `secrets.json` inside it
    #[serde(default = "default_secrets_local_dir")]
    pub local_dir: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            mount_dir: default_secrets_mount_dir(),
            local_dir: default_secrets_local_dir(),
        }
    }
}

/// Summary email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Sender address
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Recipients
    #[serde(default = "default_to_addresses")]
    pub to_addresses: Vec<String>,

    /// Subject prefix; defaults to `{name} on {hostname}: `
    #[serde(default)]
    pub prefix: Option<String>,

    /// SendGrid send endpoint
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,
}

impl NotificationConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.from_address.contains('@') {
            return Err(format!(
                "notification.from_address '{}' is not an email address",
                self.from_address
            ));
        }
        if self.to_addresses.is_empty() {
            return Err("notification.to_addresses cannot be empty".to_string());
        }
        if let Some(bad) = self.to_addresses.iter().find(|a| !a.contains('@')) {
            return Err(format!(
                "notification.to_addresses entry '{bad}' is not an email address"
            ));
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            from_address: default_from_address(),
            to_addresses: default_to_addresses(),
            prefix: None,
            api_url: default_mail_api_url(),
        }
    }
}

/// Hazard area symbology configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbologyConfig {
    /// Layer whose item receives the drawing info
    #[serde(default = "default_symbology_layer")]
    pub layer: String,

    /// Drawing info document location inside the container image
    #[serde(default = "default_drawing_info_path")]
    pub drawing_info_path: String,

    /// Drawing info document location for local runs
    #[serde(default = "default_fallback_drawing_info_path")]
    pub fallback_drawing_info_path: String,
}

impl Default for SymbologyConfig {
    fn default() -> Self {
        Self {
            layer: default_symbology_layer(),
            drawing_info_path: default_drawing_info_path(),
            fallback_drawing_info_path: default_fallback_drawing_info_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base name of the per-run log file attached to the summary email
    #[serde(default = "default_log_file_name")]
    pub log_file_name: String,

    /// Also keep a persistent rolling log
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for the persistent rolling log
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation strategy for the persistent log (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.log_file_name.trim().is_empty() {
            return Err("logging.log_file_name cannot be empty".to_string());
        }
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file_name: default_log_file_name(),
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "nfhl_sync".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_url() -> String {
    "https://hazards.fema.gov/arcgis/rest/services/public/NFHL/MapServer".to_string()
}

fn default_timeout_seconds() -> u64 {
    20
}

fn default_max_page_size() -> usize {
    2000
}

fn default_org_url() -> String {
    "https://utah-em.maps.arcgis.com".to_string()
}

fn default_token_expiration_minutes() -> u64 {
    120
}

fn default_add_chunk_size() -> usize {
    500
}

fn default_portal_timeout_seconds() -> u64 {
    120
}

fn default_max_attempts() -> usize {
    4
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_secrets_mount_dir() -> String {
    "/secrets".to_string()
}

fn default_secrets_local_dir() -> String {
    "secrets".to_string()
}

fn default_from_address() -> String {
    "noreply@utah.gov".to_string()
}

fn default_to_addresses() -> Vec<String> {
    vec![
        "ugrc-developers@utah.gov".to_string(),
        "hstrand@utah.gov".to_string(),
    ]
}

fn default_mail_api_url() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}

fn default_symbology_layer() -> String {
    crate::domain::HAZARD_AREA_LAYER.to_string()
}

fn default_drawing_info_path() -> String {
    "/app/assets/fld_haz_ar_drawingInfo.json".to_string()
}

fn default_fallback_drawing_info_path() -> String {
    "assets/fld_haz_ar_drawingInfo.json".to_string()
}

fn default_log_file_name() -> String {
    "log".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_valid_default() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.application.name, "nfhl_sync");
        assert_eq!(config.service.timeout_seconds, 20);
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.layers.len(), 9);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = SyncConfig::default();
        config.application.log_level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_level"));
    }

    #[test]
    fn test_retry_bounds() {
        let mut config = SyncConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
        config.retry.max_attempts = 11;
        assert!(config.validate().is_err());
        config.retry.max_attempts = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_layer_names_rejected() {
        let mut config = SyncConfig::default();
        let first = config.layers[0].clone();
        config.layers.push(first);
        let err = config.validate().unwrap_err();
        assert!(err.contains("duplicate layer name"));
    }

    #[test]
    fn test_empty_layers_rejected() {
        let mut config = SyncConfig::default();
        config.layers.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_notification_requires_recipients() {
        let mut config = SyncConfig::default();
        config.notification.to_addresses = vec![];
        assert!(config.validate().is_err());
        config.notification.to_addresses = vec!["not-an-address".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_service_url_scheme() {
        let mut config = SyncConfig::default();
        config.service.url = "ftp://hazards.fema.gov".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layer_lookup() {
        let config = SyncConfig::default();
        assert_eq!(config.layer("S_BFE").map(|l| l.number), Some(16));
        assert!(config.layer("S_NOPE").is_none());
    }
}
