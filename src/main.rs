//! claimrunner - sequential tab clicker with a persisted claimed-item set.
//!
//! Main entry point for the CLI and the control server.

mod cli;
mod commands;
mod server;

use clap::Parser;
use tracing::{error, warn};

use claimrunner_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};
use crate::server::{init_tracing, run_server};

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let path = ConfigLoader::expand_path(&cli.config);
    let config = ConfigLoader::load_or_default(&path)?;

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for e in &validation.errors {
            error!("Config error at {}: {}", e.path, e.message);
        }
        return Err(format!(
            "invalid configuration in {} ({} error(s))",
            path.display(),
            validation.errors.len()
        )
        .into());
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        None => {
            let (host, port) = (config.server.host.clone(), config.server.port);
            run_server(config, host, port).await
        }
        Some(Commands::Serve { host, port }) => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            run_server(config, host, port).await
        }
        Some(Commands::Run { file, background }) => {
            commands::run_file(config, &file, background).await
        }
        Some(Commands::Claimed { action }) => commands::claimed(config, action).await,
        Some(Commands::Links) => commands::links(config).await,
    }
}
