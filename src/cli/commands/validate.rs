//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the nfhl-sync configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::{load_config, SyncConfig};
use crate::core::symbology::resolve_drawing_info_path;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also check that the secrets document can be found and parsed
    #[arg(long)]
    pub check_secrets: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("Configuration is valid");
        println!();
        print_summary(&config);

        match resolve_drawing_info_path(&config.symbology) {
            Ok(path) => println!("  Drawing Info: {}", path.display()),
            Err(e) => println!("  Drawing Info: missing ({e})"),
        }

        if self.check_secrets {
            match crate::config::load_secrets(&config.secrets) {
                Ok(secrets) => println!("  Secrets: found (user {})", secrets.agol_user),
                Err(e) => {
                    println!("  Secrets: {e}");
                    return Ok(EXIT_CONFIG_ERROR);
                }
            }
        }

        println!();
        Ok(EXIT_SUCCESS)
    }
}

fn print_summary(config: &SyncConfig) {
    println!("Configuration Summary:");
    println!("  Application: {}", config.application.name);
    println!("  Log Level: {}", config.application.log_level);
    println!("  Map Service: {}", config.service.url);
    println!("  Request Timeout: {}s", config.service.timeout_seconds);
    println!("  Portal: {}", config.portal.org_url);
    println!("  Retry Attempts: {}", config.retry.max_attempts);
    println!("  Recipients: {}", config.notification.to_addresses.join(", "));
    println!("  Layers:");
    for layer in &config.layers {
        println!("    {:>3} {} -> {}", layer.number, layer.name, layer.item_id);
    }
}
