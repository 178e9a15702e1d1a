//! Provider Hub - Entry Point
//!
//! Loads the configuration, installs logging, registers the catalogue and
//! runs the activated components until Ctrl-C or SIGTERM.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hub` | Activate what `hub.toml` configures |
//! | `hub -c prod.yaml heartbeat` | Use another file, activate `heartbeat` only |
//! | `hub --list` | Print the catalogue and exit |

// Force-link hub-providers so its catalogue entries are included
extern crate hub_providers;

use anyhow::Context;
use clap::Parser;
use hub_application::list_catalogue;
use hub_infrastructure::logging::init_logging;
use hub_infrastructure::{ConfigLoader, Hub};
use std::path::PathBuf;

/// Command line interface for Provider Hub
#[derive(Parser, Debug)]
#[command(name = "hub")]
#[command(about = "Provider Hub - compose and run registered components")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print every registered component and exit
    #[arg(long)]
    pub list: bool,

    /// Components to activate, overriding `hub.components`
    pub components: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list {
        for (name, description) in list_catalogue() {
            println!("{name:<16} {description}");
        }
        return Ok(());
    }

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let loaded = loader.load().context("failed to load configuration")?;
    init_logging(&loaded.hub.logging).context("failed to initialize logging")?;

    let hub = Hub::new(loaded)?;
    hub.run(&cli.components).await?;
    Ok(())
}
