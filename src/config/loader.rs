//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SyncConfig;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SyncConfig
/// 4. Applies environment variable overrides (NFHL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use nfhl_sync::config::loader::load_config;
///
/// let config = load_config("nfhl-sync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn parse_config(contents: &str) -> Result<SyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: SyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SyncError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using NFHL_* prefix
///
/// Environment variables follow the pattern: NFHL_<SECTION>_<KEY>
/// For example: NFHL_SERVICE_URL, NFHL_RETRY_MAX_ATTEMPTS
fn apply_env_overrides(config: &mut SyncConfig) {
    if let Ok(val) = std::env::var("NFHL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("NFHL_SERVICE_URL") {
        config.service.url = val;
    }
    if let Some(timeout) = parsed_env("NFHL_SERVICE_TIMEOUT_SECONDS") {
        config.service.timeout_seconds = timeout;
    }

    if let Ok(val) = std::env::var("NFHL_PORTAL_ORG_URL") {
        config.portal.org_url = val;
    }

    if let Some(attempts) = parsed_env("NFHL_RETRY_MAX_ATTEMPTS") {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay) = parsed_env("NFHL_RETRY_INITIAL_DELAY_MS") {
        config.retry.initial_delay_ms = delay;
    }

    if let Ok(val) = std::env::var("NFHL_SECRETS_MOUNT_DIR") {
        config.secrets.mount_dir = val;
    }
    if let Ok(val) = std::env::var("NFHL_SECRETS_LOCAL_DIR") {
        config.secrets.local_dir = val;
    }

    if let Ok(val) = std::env::var("NFHL_NOTIFICATION_TO_ADDRESSES") {
        config.notification.to_addresses = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Ok(val) = std::env::var("NFHL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("NFHL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

fn parsed_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
