//! Run command implementation
//!
//! One scheduled run: load secrets, connect to both services, sync every
//! layer, then mail the summary with the run's log attached.

use crate::adapters::notify::{summary_subject, SendGridNotifier};
use crate::adapters::portal::PortalClient;
use crate::adapters::rest::MapServiceClient;
use crate::adapters::traits::{EmailMessage, Notifier};
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_CONNECTION_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use crate::config::{load_config, load_secrets, SyncConfig};
use crate::core::sync::{RunSummary, SyncCoordinator};
use crate::log_error_chain;
use crate::logging::LoggingGuard;
use chrono::Local;
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Print the summary but do not email it
    #[arg(long)]
    pub no_email: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str, logging: &LoggingGuard) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let work_dir = tempfile::Builder::new().prefix("nfhl-sync-").tempdir()?;
        let log_path = run_log_path(work_dir.path(), &config.logging.log_file_name);
        let run_log = logging.run_log().attach(&log_path)?;
        tracing::info!(work_dir = %work_dir.path().display(), "Created working directory");

        let code = self.run_sync(&config, work_dir.path(), run_log.path()).await;

        drop(run_log);
        Ok(code)
    }

    async fn run_sync(&self, config: &SyncConfig, work_dir: &Path, log_path: &Path) -> i32 {
        let secrets = match load_secrets(&config.secrets) {
            Ok(s) => s,
            Err(e) => {
                log_error_chain!(&e, "Failed to load secrets");
                return EXIT_FATAL;
            }
        };

        let source = match MapServiceClient::new(&config.service) {
            Ok(s) => s,
            Err(e) => {
                log_error_chain!(&e, "Failed to create map service client");
                return EXIT_CONFIG_ERROR;
            }
        };

        let store = match PortalClient::connect(
            &config.portal,
            &secrets.agol_user,
            &secrets.agol_password,
        )
        .await
        {
            Ok(s) => s,
            Err(e) => {
                log_error_chain!(&e, "Failed to connect to ArcGIS Online");
                eprintln!("Failed to connect to ArcGIS Online: {e}");
                return if e.is_connection_error() {
                    EXIT_CONNECTION_ERROR
                } else {
                    EXIT_FATAL
                };
            }
        };

        let coordinator =
            SyncCoordinator::new(config, Arc::new(source), Arc::new(store), work_dir);
        let summary = coordinator.run().await;

        let message = summary_message(config, &summary, log_path);

        if self.no_email {
            tracing::info!("Skipping summary email");
            return report(&message, None).await;
        }

        match SendGridNotifier::new(&config.notification, secrets.sendgrid_api_key) {
            Ok(notifier) => report(&message, Some(&notifier)).await,
            Err(e) => {
                println!("{}", message.body);
                log_error_chain!(&e, "Failed to create mail client");
                EXIT_FATAL
            }
        }
    }
}

/// Print the summary and send it when a notifier is given
///
/// Layer and symbology failures are part of the summary, not of the exit
/// status: a run that got this far exits 0 unless the email fails.
pub async fn report(message: &EmailMessage, notifier: Option<&dyn Notifier>) -> i32 {
    println!("{}", message.body);

    if let Some(notifier) = notifier {
        if let Err(e) = notifier.send(message).await {
            log_error_chain!(&e, "Failed to send summary email");
            return EXIT_FATAL;
        }
    }

    EXIT_SUCCESS
}

/// `{dir}/{name}_{YYYYmmdd-HHMMSS}.txt`
pub fn run_log_path(dir: &Path, log_file_name: &str) -> PathBuf {
    dir.join(format!(
        "{log_file_name}_{}.txt",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}

/// Email carrying the report with the run log attached
pub fn summary_message(config: &SyncConfig, summary: &RunSummary, log_path: &Path) -> EmailMessage {
    EmailMessage {
        subject: summary_subject(&config.notification, &config.application.name),
        body: summary.render_report(),
        attachments: vec![log_path.to_path_buf()],
    }
}
