//! Loading exported feedback and facet tables from JSON
//!
//! Rows that cannot be turned into a [`FeedbackRecord`] are skipped and
//! counted rather than failing the whole batch.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::analytics::FacetTable;
use crate::error::{Error, Result};
use crate::models::{FeedbackRecord, RawFeedbackRecord};

/// Records parsed from an export, with the count of rejected rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadedRecords {
    pub records: Vec<FeedbackRecord>,
    pub skipped: usize,
}

fn parse_rows(json: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(rows) => Ok(rows),
        _ => Err(Error::other("Expected a JSON array of rows")),
    }
}

/// Parse a JSON array of feedback rows
///
/// # Errors
/// Fails only when the document itself is not a JSON array; bad rows are
/// skipped.
pub fn parse_records(json: &str) -> Result<LoadedRecords> {
    let rows = parse_rows(json)?;
    let mut loaded = LoadedRecords {
        records: Vec::with_capacity(rows.len()),
        skipped: 0,
    };

    for (index, row) in rows.into_iter().enumerate() {
        let parsed = serde_json::from_value::<RawFeedbackRecord>(row)
            .map_err(Error::from)
            .and_then(|raw| FeedbackRecord::from_raw(raw).map_err(Error::from));

        match parsed {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                tracing::warn!(row = index, error = %e, "Skipping malformed feedback row");
                loaded.skipped += 1;
            }
        }
    }

    tracing::debug!(
        records = loaded.records.len(),
        skipped = loaded.skipped,
        "Parsed feedback rows"
    );

    Ok(loaded)
}

/// Read and parse a feedback export file
pub fn load_records(path: &Path) -> Result<LoadedRecords> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

/// Parse a JSON array of 5Ws facet rows
pub fn parse_facets(json: &str) -> Result<FacetTable> {
    let rows = parse_rows(json)?
        .into_iter()
        .map(serde_json::from_value::<BTreeMap<String, Value>>)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(FacetTable::from_rows(rows)?)
}

/// Read and parse a facet export file
pub fn load_facets(path: &Path) -> Result<FacetTable> {
    let content = std::fs::read_to_string(path)?;
    parse_facets(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClassifyError, ErrorCategory};

    #[test]
    fn test_parse_records_skips_bad_rows() {
        let json = r#"[
            {"facility": "Kaiser Oakland", "source": "Yelp", "theme": "Billing",
             "sentiment": -0.5, "date": "2024-03-04"},
            {"facility": "Sutter", "source": "Yelp", "date": "not a date"},
            {"source": "Yelp"},
            {"facility": "Sutter", "source": "Google", "sentiment": "high"},
            {"Facility": "Stanford", "source": "Google", "sentiment": 0.3}
        ]"#;

        let loaded = parse_records(json).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.skipped, 3);
        assert!(loaded.records[1].date.is_none());
    }

    #[test]
    fn test_parse_records_requires_array() {
        let err = parse_records(r#"{"facility": "Sutter"}"#).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Other);

        let err = parse_records("[").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Parsing);
    }

    #[test]
    fn test_parse_facets() {
        let json = r#"[
            {"What ": "Billing error", "Why": "Coding mistake", "Who": "Patient",
             "When": "After discharge", "Where": "Billing office"}
        ]"#;
        let table = parse_facets(json).unwrap();
        assert_eq!(table.rows[0].what, "Billing error");
    }

    #[test]
    fn test_parse_facets_missing_column() {
        let err = parse_facets(r#"[{"What": "x"}]"#).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }
}
