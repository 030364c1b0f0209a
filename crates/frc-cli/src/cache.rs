//! Cache administration handlers.

use clap::Subcommand;
use frc_cache::Cache;
use serde_json::json;

/// Sub-commands available under `cache`.
#[derive(Debug, Subcommand)]
pub enum CacheCommands {
    /// Print per-partition entry counts
    Stats,
    /// Drop every entry in every partition
    Clear,
    /// Drop expired entries only
    Cleanup,
}

/// # Errors
///
/// Returns an error only if the output cannot be serialized.
pub(crate) fn run_cache_command(cache: &Cache, command: &CacheCommands) -> anyhow::Result<()> {
    let output = match command {
        CacheCommands::Stats => serde_json::to_value(cache.stats())?,
        CacheCommands::Clear => {
            cache.clear_all();
            json!({ "message": "Cache cleared successfully" })
        }
        CacheCommands::Cleanup => {
            let removed = cache.cleanup_expired();
            json!({ "message": "Expired cache entries cleaned up", "removed": removed })
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
