//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use crate::domain::{default_layers, LayerDescriptor};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "nfhl-sync.toml")]
    pub output: String,

    /// Write out the built-in layer list as [[layers]] tables
    #[arg(long)]
    pub with_layers: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
struct LayerTables<'a> {
    layers: &'a [LayerDescriptor],
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let mut content = Self::generate_config().to_string();
        if self.with_layers {
            let layers = default_layers();
            content.push('\n');
            content.push_str(&toml::to_string(&LayerTables { layers: &layers })?);
        }

        match fs::write(&self.output, content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put SENDGRID_API_KEY, AGOL_USER and AGOL_PASSWORD in secrets/secrets.json");
                println!("  3. Validate configuration: nfhl-sync validate-config --check-secrets");
                println!("  4. Run the sync: nfhl-sync run");
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    fn generate_config() -> &'static str {
        r#"# nfhl-sync configuration
# FEMA National Flood Hazard Layer -> ArcGIS Online

[application]
name = "nfhl_sync"
log_level = "info"

[service]
url = "https://hazards.fema.gov/arcgis/rest/services/public/NFHL/MapServer"
timeout_seconds = 20
max_page_size = 2000

[portal]
org_url = "https://utah-em.maps.arcgis.com"
token_expiration_minutes = 120
add_chunk_size = 500

[retry]
max_attempts = 4
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[secrets]
# {mount_dir}/app/secrets.json wins when mount_dir exists
mount_dir = "/secrets"
local_dir = "secrets"

[notification]
from_address = "noreply@utah.gov"
to_addresses = ["ugrc-developers@utah.gov"]
# prefix = "nfhl_sync on my-host: "

[symbology]
layer = "S_Fld_Haz_Ar"
drawing_info_path = "/app/assets/fld_haz_ar_drawingInfo.json"
fallback_drawing_info_path = "assets/fld_haz_ar_drawingInfo.json"

[logging]
log_file_name = "log"
local_enabled = false
local_path = "./logs"
local_rotation = "daily"

# Without [[layers]] tables the nine built-in NFHL layers are synced.
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_parses() {
        let config = parse_config(InitArgs::generate_config()).unwrap();
        assert_eq!(config.application.name, "nfhl_sync");
        assert_eq!(config.layers, default_layers());
    }

    #[tokio::test]
    async fn test_init_writes_layers() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nfhl-sync.toml");
        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_layers: true,
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), EXIT_SUCCESS);

        let contents = fs::read_to_string(&output).unwrap();
        let config = parse_config(&contents).unwrap();
        assert_eq!(config.layers, default_layers());
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nfhl-sync.toml");
        fs::write(&output, "existing").unwrap();
        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_layers: false,
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG_ERROR);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");
    }
}
