//! Five-facet (What/Why/Who/When/Where) breakdown of feedback items
//!
//! Facet text is produced upstream; this module only cleans up the
//! exported table so downstream consumers get consistent column names and
//! whitespace.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::{AnalyticsError, AnalyticsResult};
use crate::utils::normalize_whitespace;

/// One of the five facets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facet {
    What,
    Why,
    Who,
    When,
    Where,
}

impl Facet {
    /// All facets in display order
    pub const ALL: [Facet; 5] = [Self::What, Self::Why, Self::Who, Self::When, Self::Where];

    /// Column header used by the facet export
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::What => "What",
            Self::Why => "Why",
            Self::Who => "Who",
            Self::When => "When",
            Self::Where => "Where",
        }
    }

    fn field(&self) -> &'static str {
        match self {
            Self::What => "what",
            Self::Why => "why",
            Self::Who => "who",
            Self::When => "when",
            Self::Where => "where",
        }
    }
}

/// A feedback item broken down into its five facets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetRecord {
    #[serde(rename = "What")]
    pub what: String,
    #[serde(rename = "Why")]
    pub why: String,
    #[serde(rename = "Who")]
    pub who: String,
    #[serde(rename = "When")]
    pub when: String,
    #[serde(rename = "Where")]
    pub where_: String,

    /// Any other columns, keyed by trimmed header
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl FacetRecord {
    #[must_use]
    pub fn get(&self, facet: Facet) -> &str {
        match facet {
            Facet::What => &self.what,
            Facet::Why => &self.why,
            Facet::Who => &self.who,
            Facet::When => &self.when,
            Facet::Where => &self.where_,
        }
    }

    fn slot(&mut self, facet: Facet) -> &mut String {
        match facet {
            Facet::What => &mut self.what,
            Facet::Why => &mut self.why,
            Facet::Who => &mut self.who,
            Facet::When => &mut self.when,
            Facet::Where => &mut self.where_,
        }
    }
}

/// Normalized facet rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetTable {
    pub rows: Vec<FacetRecord>,
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => normalize_whitespace(s),
        other => other.to_string(),
    }
}

impl FacetTable {
    /// Build from exported rows keyed by (possibly padded) column headers
    ///
    /// # Errors
    /// `MissingField` when a facet column is absent from the first row's
    /// headers. Later rows missing a facet get an empty cell.
    pub fn from_rows(rows: Vec<BTreeMap<String, Value>>) -> AnalyticsResult<Self> {
        if let Some(first) = rows.first() {
            for facet in Facet::ALL {
                if !first.keys().any(|key| key.trim() == facet.column()) {
                    return Err(AnalyticsError::MissingField {
                        field: facet.field(),
                    });
                }
            }
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                let mut record = FacetRecord::default();
                for (header, value) in row {
                    let header = header.trim();
                    let text = cell_text(&value);
                    match Facet::ALL.iter().find(|facet| facet.column() == header) {
                        Some(facet) => *record.slot(*facet) = text,
                        None => {
                            record.extra.insert(header.to_string(), text);
                        }
                    }
                }
                record
            })
            .collect();

        Ok(Self { rows })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one facet across all rows
    #[must_use]
    pub fn column(&self, facet: Facet) -> Vec<&str> {
        self.rows.iter().map(|row| row.get(facet)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_rows_trims_headers() {
        let rows = vec![row(json!({
            " What ": "Long  wait\nat ER",
            "Why": "Understaffed triage",
            "Who ": "Patient",
            "When": "Night shift",
            "Where": "Emergency department",
            " ID": 17
        }))];

        let table = FacetTable::from_rows(rows).unwrap();
        assert_eq!(table.len(), 1);
        let record = &table.rows[0];
        assert_eq!(record.what, "Long wait at ER");
        assert_eq!(record.get(Facet::Who), "Patient");
        assert_eq!(record.extra.get("ID").map(String::as_str), Some("17"));
    }

    #[test]
    fn test_from_rows_missing_facet() {
        let rows = vec![row(json!({
            "What": "x", "Why": "x", "Who": "x", "When": "x"
        }))];
        let err = FacetTable::from_rows(rows).unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingField { field: "where" }));
    }

    #[test]
    fn test_null_cells_are_empty() {
        let rows = vec![row(json!({
            "What": null, "Why": "a", "Who": "b", "When": "c", "Where": "d"
        }))];
        let table = FacetTable::from_rows(rows).unwrap();
        assert_eq!(table.column(Facet::What), vec![""]);
        assert_eq!(table.column(Facet::Where), vec!["d"]);
    }

    #[test]
    fn test_facet_order() {
        let columns: Vec<&str> = Facet::ALL.iter().map(Facet::column).collect();
        assert_eq!(columns, vec!["What", "Why", "Who", "When", "Where"]);
    }

    #[test]
    fn test_empty_table() {
        let table = FacetTable::from_rows(Vec::new()).unwrap();
        assert!(table.is_empty());
    }
}
