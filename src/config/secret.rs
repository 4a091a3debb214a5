//! Credential handling
//!
//! Credentials come from a JSON secrets document mounted into the
//! container (or kept next to the checkout for local runs). Values are
//! wrapped in [`secrecy::Secret`] so they are zeroized on drop and never
//! show up in `Debug` output.

use crate::config::schema::SecretsConfig;
use crate::domain::{Result, SyncError};
use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A string that is zeroized on drop and redacted in `Debug`
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Credentials needed by a run
///
/// Keys match the secrets document. Unknown keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Secrets {
    /// SendGrid API key for the summary email
    #[serde(rename = "SENDGRID_API_KEY")]
    pub sendgrid_api_key: SecretString,

    /// ArcGIS Online user name
    #[serde(rename = "AGOL_USER")]
    pub agol_user: String,

    /// ArcGIS Online password
    #[serde(rename = "AGOL_PASSWORD")]
    pub agol_password: SecretString,
}

/// Find the secrets document
///
/// The mount point wins whenever its directory exists, even if the local
/// folder exists too. Only the directories are checked here; a missing
/// file inside an existing directory surfaces as a read error later.
///
/// # Errors
///
/// Returns [`SyncError::Secrets`] when neither directory exists.
pub fn locate_secrets(config: &SecretsConfig) -> Result<PathBuf> {
    let mount_dir = Path::new(&config.mount_dir);
    if mount_dir.exists() {
        return Ok(mount_dir.join("app").join("secrets.json"));
    }

    let local_dir = Path::new(&config.local_dir);
    if local_dir.exists() {
        return Ok(local_dir.join("secrets.json"));
    }

    Err(SyncError::Secrets(
        "Secrets folder not found; secrets not loaded.".to_string(),
    ))
}

/// Read the secrets document as raw JSON
pub fn load_secrets_document(config: &SecretsConfig) -> Result<serde_json::Value> {
    let path = locate_secrets(config)?;
    tracing::debug!(path = %path.display(), "Loading secrets");

    let contents = fs::read_to_string(&path).map_err(|e| {
        SyncError::Secrets(format!("Failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&contents)
        .map_err(|e| SyncError::Secrets(format!("Invalid JSON in {}: {e}", path.display())))
}

/// Load and validate the credentials for a run
///
/// # Errors
///
/// Fails when the document cannot be found or read, or when a required key
/// is missing or empty.
pub fn load_secrets(config: &SecretsConfig) -> Result<Secrets> {
    use secrecy::ExposeSecret;

    let document = load_secrets_document(config)?;
    let secrets: Secrets = serde_json::from_value(document)
        .map_err(|e| SyncError::Secrets(format!("Secrets document is incomplete: {e}")))?;

    if secrets.sendgrid_api_key.expose_secret().is_empty()
        || secrets.agol_user.is_empty()
        || secrets.agol_password.expose_secret().is_empty()
    {
        return Err(SyncError::Secrets(
            "SENDGRID_API_KEY, AGOL_USER and AGOL_PASSWORD must not be empty".to_string(),
        ));
    }

    Ok(secrets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    const DOCUMENT: &str =
        r#"{"SENDGRID_API_KEY": "SG.key", "AGOL_USER": "nfhl_bot", "AGOL_PASSWORD": "hunter2", "EXTRA": 1}"#;

    fn config(mount: &Path, local: &Path) -> SecretsConfig {
        SecretsConfig {
            mount_dir: mount.to_string_lossy().to_string(),
            local_dir: local.to_string_lossy().to_string(),
        }
    }

    #[test]
    fn test_loads_from_mount_point() {
        let mount = TempDir::new().unwrap();
        fs::create_dir_all(mount.path().join("app")).unwrap();
        fs::write(mount.path().join("app/secrets.json"), r#"{"foo":"bar"}"#).unwrap();

        let document =
            load_secrets_document(&config(mount.path(), Path::new("/does/not/exist"))).unwrap();

        assert_eq!(document, serde_json::json!({"foo": "bar"}));
    }

    #[test]
    fn test_loads_from_local_folder_when_mount_missing() {
        let local = TempDir::new().unwrap();
        fs::write(local.path().join("secrets.json"), r#"{"foo":"bar"}"#).unwrap();

        let document =
            load_secrets_document(&config(Path::new("/does/not/exist"), local.path())).unwrap();

        assert_eq!(document, serde_json::json!({"foo": "bar"}));
    }

    #[test]
    fn test_prefers_mount_point_when_both_exist() {
        let mount = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        fs::create_dir_all(mount.path().join("app")).unwrap();
        fs::write(mount.path().join("app/secrets.json"), r#"{"from":"mount"}"#).unwrap();
        fs::write(local.path().join("secrets.json"), r#"{"from":"local"}"#).unwrap();

        let path = locate_secrets(&config(mount.path(), local.path())).unwrap();
        let document = load_secrets_document(&config(mount.path(), local.path())).unwrap();

        assert!(path.starts_with(mount.path()));
        assert_eq!(document["from"], "mount");
    }

    #[test]
    fn test_not_found_when_neither_exists() {
        let err = load_secrets(&config(
            Path::new("/does/not/exist"),
            Path::new("/also/not/here"),
        ))
        .unwrap_err();

        assert!(matches!(err, SyncError::Secrets(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_secrets_parses_required_keys() {
        let local = TempDir::new().unwrap();
        fs::write(local.path().join("secrets.json"), DOCUMENT).unwrap();

        let secrets = load_secrets(&config(Path::new("/does/not/exist"), local.path())).unwrap();

        assert_eq!(secrets.agol_user, "nfhl_bot");
        assert_eq!(secrets.agol_password.expose_secret(), "hunter2");
        assert_eq!(secrets.sendgrid_api_key.expose_secret(), "SG.key");
    }

    #[test]
    fn test_load_secrets_missing_key() {
        let local = TempDir::new().unwrap();
        fs::write(local.path().join("secrets.json"), r#"{"AGOL_USER": "x"}"#).unwrap();

        let err = load_secrets(&config(Path::new("/does/not/exist"), local.path())).unwrap_err();

        assert!(err.to_string().contains("incomplete"));
    }

    #[test]
    fn test_secret_debug_redacted() {
        let local = TempDir::new().unwrap();
        fs::write(local.path().join("secrets.json"), DOCUMENT).unwrap();

        let secrets = load_secrets(&config(Path::new("/does/not/exist"), local.path())).unwrap();
        let debug_output = format!("{secrets:?}");

        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("SG.key"));
    }
}
