//! `search` and `resolve` handlers.

use std::sync::Arc;

use frc_cache::Cache;
use frc_core::{canonical_spec_for_query, AppConfig, Catalog, VendorFamily};
use frc_search::SearchEngine;
use serde_json::json;

/// Runs the full pipeline (or one family) and prints the response as JSON.
///
/// # Errors
///
/// Returns an error if the engine cannot be built or the output cannot be
/// serialized.
pub(crate) async fn run_search(
    config: &AppConfig,
    cache: Arc<Cache>,
    query: &str,
    family: Option<VendorFamily>,
) -> anyhow::Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("query must not be empty");
    }

    let engine = SearchEngine::from_config(config, cache)?;
    let response = match family {
        Some(family) => engine.search_family(query, family).await,
        None => engine.search(query).await,
    };

    tracing::info!(
        query,
        count = response.count,
        source = ?response.source,
        "search finished"
    );
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Catalog lookup only: listings are printed without a liveness check.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the query resolves to
/// nothing.
pub(crate) fn run_resolve(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_embedded(config.catalog_path.as_deref())?;
    let listings = catalog
        .resolve(query)
        .ok_or_else(|| anyhow::anyhow!("'{}' is not in the parts catalog", query.trim()))?;

    let output = json!({
        "query": query.trim(),
        "canonical_part": canonical_spec_for_query(query).map(|spec| spec.name),
        "count": listings.len(),
        "results": listings,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
