// NFHL Sync - FEMA flood hazard layers to ArcGIS Online
// Copyright (c) 2025 NFHL Sync Contributors
// Licensed under the MIT License

use clap::Parser;
use nfhl_sync::cli::{Cli, Commands, EXIT_FATAL};
use nfhl_sync::config::load_config;
use nfhl_sync::logging::{init_logging, LoggingGuard};
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; commands
    // report config errors themselves once logging is up
    let config = load_config(&cli.config).unwrap_or_default();
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.application.log_level.clone());

    let logging = match init_logging(&log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "NFHL Sync - FEMA flood hazard layers to ArcGIS Online"
    );

    let exit_code = match execute_command(&cli, &logging).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors, so flush the file writer first
    drop(logging);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, logging: &LoggingGuard) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config, logging).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
