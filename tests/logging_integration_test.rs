//! Integration tests for logging functionality

use nfhl_sync::cli::commands::run::run_log_path;
use nfhl_sync::config::LoggingConfig;
use nfhl_sync::logging::{init_logging, RunLogFile};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.log_file_name, "log");
}

#[test]
fn test_run_log_captures_only_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let path = run_log_path(temp_dir.path(), "log");
    let run_log = RunLogFile::new();

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(run_log.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("loading configuration");
        let guard = run_log.attach(&path).unwrap();
        tracing::warn!(layer = "S_XS", "Dropped features with empty geometry");
        tracing::error!(layer = "S_LOMR", "Layer S_LOMR failed");
        drop(guard);
        tracing::info!("sending summary");
    });

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("WARN"));
    assert!(lines[1].contains("Layer S_LOMR failed"));
    assert!(!contents.contains("\u{1b}["));
}

#[test]
fn test_init_logging_creates_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        ..Default::default()
    };

    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());
    assert!(!guard.run_log().is_attached());
}
