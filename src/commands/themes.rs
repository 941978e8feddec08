use anyhow::Result;
use std::path::Path;

use carelens::analytics::{rank, tag_records, ThemeRanking};
use carelens::config::Config;

use super::{read_input, Report};

/// Rank themes for the target entity, or for every facility
pub fn themes(config: &Config, input: &Path, all_facilities: bool) -> Result<Report<ThemeRanking>> {
    let vocabulary = config.vocabulary()?;
    let loaded = read_input(input)?;

    let subset = if all_facilities {
        loaded.records
    } else {
        let target = config.target_entity()?;
        target
            .select(&loaded.records)
            .into_iter()
            .cloned()
            .collect()
    };

    tracing::info!(records = subset.len(), all_facilities, "Ranking themes");

    let tagged = tag_records(subset, &vocabulary);
    let ranking = rank(&tagged, config.analysis.top_n_themes)?;

    Ok(Report {
        data: ranking,
        skipped_on_load: loaded.skipped,
    })
}
