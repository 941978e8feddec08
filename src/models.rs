// Core data structures for carelens

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsError;

/// A single patient feedback item as handed over by ingestion
///
/// `date` and `sentiment` are optional because upstream scoring is not
/// guaranteed to fill them; the aggregator excludes and counts such rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub text: String,
    pub theme: String, // Free-text source label, before canonicalization
    pub sentiment: Option<f64>,
    pub facility: String,
    pub date: Option<NaiveDate>,
    pub source: String, // Channel name (e.g. "Yelp", "Google")
}

impl FeedbackRecord {
    /// Create a record with every field present
    pub fn new(
        text: impl Into<String>,
        theme: impl Into<String>,
        sentiment: f64,
        facility: impl Into<String>,
        date: NaiveDate,
        source: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            theme: theme.into(),
            sentiment: Some(sentiment),
            facility: facility.into(),
            date: Some(date),
            source: source.into(),
        }
    }

    /// Convert a loosely typed ingestion row
    ///
    /// Facility and source are required; a date that is present but cannot
    /// be parsed is an error rather than silently treated as missing.
    pub fn from_raw(raw: RawFeedbackRecord) -> Result<Self, AnalyticsError> {
        let facility = raw
            .facility
            .ok_or(AnalyticsError::MissingField { field: "facility" })?;
        let source = raw
            .source
            .ok_or(AnalyticsError::MissingField { field: "source" })?;

        let date = match raw.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(parse_date(value)?),
        };

        Ok(Self {
            text: raw.text.unwrap_or_default(),
            theme: raw.theme.unwrap_or_default(),
            sentiment: raw.sentiment,
            facility,
            date,
            source,
        })
    }
}

impl TryFrom<RawFeedbackRecord> for FeedbackRecord {
    type Error = AnalyticsError;

    fn try_from(raw: RawFeedbackRecord) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

/// Ingestion-shaped row: every field optional, source column names accepted
///
/// Fields not listed here are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeedbackRecord {
    #[serde(default, alias = "Text")]
    pub text: Option<String>,
    #[serde(default, alias = "Theme")]
    pub theme: Option<String>,
    #[serde(default, alias = "Sentiment")]
    pub sentiment: Option<f64>,
    #[serde(default, alias = "Facility")]
    pub facility: Option<String>,
    #[serde(default, alias = "Date")]
    pub date: Option<String>,
    #[serde(default, alias = "Source")]
    pub source: Option<String>,
}

/// Parse a calendar date from the formats seen in exported feedback
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps.
pub fn parse_date(value: &str) -> Result<NaiveDate, AnalyticsError> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }

    Err(AnalyticsError::MalformedDate {
        value: value.to_string(),
    })
}

/// A feedback record with its canonical theme tags attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedRecord {
    #[serde(flatten)]
    pub record: FeedbackRecord,

    /// Canonical themes in vocabulary order; never empty
    pub master_themes: Vec<String>,
}

impl TaggedRecord {
    pub fn sentiment(&self) -> Option<f64> {
        self.record.sentiment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: Option<&str>) -> RawFeedbackRecord {
        RawFeedbackRecord {
            text: Some("Great nurses".to_string()),
            theme: Some("Nursing Staff".to_string()),
            sentiment: Some(0.8),
            facility: Some("Kaiser Oakland".to_string()),
            date: date.map(str::to_string),
            source: Some("Yelp".to_string()),
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("2024-03-05").unwrap(), expected);
        assert_eq!(parse_date("2024-03-05 17:45:00").unwrap(), expected);
        assert_eq!(parse_date("2024-03-05T17:45:00+00:00").unwrap(), expected);
        assert_eq!(parse_date("  2024-03-05 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_malformed() {
        let err = parse_date("03/05/2024").unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedDate { .. }));
    }

    #[test]
    fn test_from_raw_complete() {
        let record = FeedbackRecord::from_raw(raw(Some("2024-03-05"))).unwrap();
        assert_eq!(record.facility, "Kaiser Oakland");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(record.sentiment, Some(0.8));
    }

    #[test]
    fn test_from_raw_blank_date_is_missing() {
        let record = FeedbackRecord::from_raw(raw(Some("  "))).unwrap();
        assert!(record.date.is_none());

        let record = FeedbackRecord::from_raw(raw(None)).unwrap();
        assert!(record.date.is_none());
    }

    #[test]
    fn test_from_raw_missing_facility() {
        let mut row = raw(Some("2024-03-05"));
        row.facility = None;
        let err = FeedbackRecord::try_from(row).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::MissingField { field: "facility" }
        ));
    }

    #[test]
    fn test_raw_accepts_source_column_names() {
        let json = r#"{
            "Facility": "Kaiser Richmond",
            "theme": "Billing",
            "sentiment": -0.2,
            "date": "2024-01-02",
            "source": "Google",
            "rating": 2
        }"#;
        let row: RawFeedbackRecord = serde_json::from_str(json).unwrap();
        let record = FeedbackRecord::from_raw(row).unwrap();
        assert_eq!(record.facility, "Kaiser Richmond");
        assert!(record.text.is_empty());
    }
}
