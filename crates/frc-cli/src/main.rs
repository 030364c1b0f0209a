mod cache;
mod search;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use frc_cache::Cache;
use frc_core::VendorFamily;
use tracing_subscriber::EnvFilter;

use crate::cache::CacheCommands;

#[derive(Debug, Parser)]
#[command(name = "frc-cli")]
#[command(about = "FRC parts finder command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a part query through the catalog, vendor search and fallback links
    Search {
        /// Part name, alias or free text
        query: String,

        /// Search one vendor family only (real-vendors, shopify, woocommerce)
        #[arg(long)]
        family: Option<VendorFamily>,
    },
    /// Look a query up in the parts catalog without touching the network
    Resolve {
        /// Part name or alias
        query: String,
    },
    /// Inspect or prune the on-disk cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = frc_core::load_app_config()?;

    // Logs go to stderr so stdout stays machine-readable JSON.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cache = Arc::new(Cache::open(&config));

    match cli.command {
        Commands::Search { query, family } => {
            search::run_search(&config, cache, &query, family).await?;
        }
        Commands::Resolve { query } => search::run_resolve(&config, &query)?,
        Commands::Cache { command } => cache::run_cache_command(&cache, &command)?,
    }

    Ok(())
}
