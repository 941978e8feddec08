use anyhow::{Context, Result};
use std::path::Path;

use carelens::analytics::FacetTable;
use carelens::ingest::load_facets;

pub fn facets(input: &Path) -> Result<FacetTable> {
    let table = load_facets(input)
        .with_context(|| format!("Failed to load facet table: {}", input.display()))?;

    tracing::info!(rows = table.len(), "Loaded 5Ws facet table");
    Ok(table)
}
