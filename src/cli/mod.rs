//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for nfhl-sync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Run finished and the summary went out, whatever the layer outcomes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Authentication or connection failure before any layer ran
pub const EXIT_CONNECTION_ERROR: i32 = 4;
pub const EXIT_FATAL: i32 = 5;

/// NFHL Sync - FEMA flood hazard layers to ArcGIS Online
#[derive(Parser, Debug)]
#[command(name = "nfhl-sync")]
#[command(version, about, long_about = None)]
#[command(author = "NFHL Sync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "nfhl-sync.toml", env = "NFHL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "NFHL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync every configured layer and email the summary
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["nfhl-sync", "run"]);
        assert_eq!(cli.config, "nfhl-sync.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["nfhl-sync", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["nfhl-sync", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["nfhl-sync", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["nfhl-sync", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => assert!(args.force),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
