use anyhow::Result;
use std::path::Path;

use carelens::analytics::tag_records;
use carelens::config::Config;
use carelens::TaggedRecord;

use super::{read_input, Report};

pub fn tag(config: &Config, input: &Path) -> Result<Report<Vec<TaggedRecord>>> {
    let vocabulary = config.vocabulary()?;
    let loaded = read_input(input)?;

    let tagged = tag_records(loaded.records, &vocabulary);
    tracing::info!(records = tagged.len(), "Tagged feedback records");

    Ok(Report {
        data: tagged,
        skipped_on_load: loaded.skipped,
    })
}
