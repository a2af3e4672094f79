//! Command implementations

mod config;
mod stations;
mod territories;
mod vegetation;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use mtlverde_core::config::LayeredConfig;
use mtlverde_query::Atlas;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Config => config::execute(&config, &output),
        Commands::Territories => territories::list(&load_atlas(&config).await?, &output),
        Commands::Territory(args) => territories::show(&load_atlas(&config).await?, args, &output),
        Commands::Vegetation(args) => vegetation::execute(&load_atlas(&config).await?, args, &output),
        Commands::Stations => stations::list(&load_atlas(&config).await?, &output),
        Commands::Station(args) => stations::show(&load_atlas(&config).await?, args, &output),
    }
}

async fn load_atlas(config: &LayeredConfig) -> Result<Atlas> {
    Atlas::load(config).await.with_context(|| {
        format!(
            "Failed to load datasets from {} (set --data-dir or MTLVERDE_DATA_DIR)",
            config.data_dir.value.display()
        )
    })
}
