pub mod facets;
pub mod tag;
pub mod themes;
pub mod trend;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use carelens::error::{AnalyticsError, ClassifyError, Error, ErrorCategory};
use carelens::ingest::{load_records, LoadedRecords};

// Re-export command functions for convenience
pub use facets::facets;
pub use tag::tag;
pub use themes::themes;
pub use trend::trend;

/// Command output together with rows rejected while loading
#[derive(Debug, Serialize)]
pub struct Report<T> {
    pub data: T,
    pub skipped_on_load: usize,
}

pub(crate) fn read_input(input: &Path) -> Result<LoadedRecords> {
    let loaded = load_records(input)
        .with_context(|| format!("Failed to load feedback records: {}", input.display()))?;

    if loaded.skipped > 0 {
        tracing::warn!(
            skipped = loaded.skipped,
            loaded = loaded.records.len(),
            "Some rows were rejected while loading"
        );
    }

    Ok(loaded)
}

/// Write pretty JSON to `output`, or stdout when not given
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Category of the first classified error in the chain
pub fn error_category(err: &anyhow::Error) -> Option<ErrorCategory> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<Error>() {
            Some(e.category())
        } else {
            cause.downcast_ref::<AnalyticsError>().map(ClassifyError::category)
        }
    })
}
