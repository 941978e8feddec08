//! Common test utilities

use carelens::models::FeedbackRecord;
use chrono::NaiveDate;

/// Monday 2024-03-04
pub fn week1() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

/// Monday 2024-03-11
#[allow(dead_code)]
pub fn week2() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

/// Create a fully populated feedback record
pub fn create_record(
    facility: &str,
    date: NaiveDate,
    sentiment: f64,
    source: &str,
) -> FeedbackRecord {
    FeedbackRecord::new(
        format!("Feedback about {facility}"),
        "",
        sentiment,
        facility,
        date,
        source,
    )
}

/// Create a record carrying a raw theme label
#[allow(dead_code)]
pub fn create_themed_record(theme: &str, sentiment: f64) -> FeedbackRecord {
    FeedbackRecord::new(
        "Patient comment",
        theme,
        sentiment,
        "Kaiser Oakland",
        week1(),
        "Google",
    )
}

/// Sample export mixing target, competition and malformed rows
#[allow(dead_code)]
pub const SAMPLE_EXPORT_JSON: &str = r#"[
    {"text": "Billing was a mess", "theme": "Billing and insurance", "sentiment": -0.6,
     "Facility": "Kaiser Permanente Oakland", "date": "2024-03-05", "source": "Yelp"},
    {"text": "Nurses were kind", "theme": "Nursing Staff", "sentiment": -0.2,
     "Facility": "KAISER San Jose", "date": "2024-03-06 09:15:00", "source": "Yelp"},
    {"text": "Quick visit", "theme": "Wait Time", "sentiment": 0.5,
     "Facility": "Sutter Health", "date": "2024-03-07", "source": "Yelp"},
    {"text": "Clean rooms", "theme": "Cleanliness", "sentiment": 0.4,
     "Facility": "Stanford Health Care", "date": "2024-03-08", "source": "Google"},
    {"text": "Parking impossible", "theme": "Parking", "sentiment": -0.1,
     "Facility": "Kaiser Richmond", "date": "2024-03-12", "source": "Google"},
    {"text": "No date", "theme": "Food", "sentiment": 0.2,
     "Facility": "Kaiser Oakland", "source": "Yelp"},
    {"text": "Bad date", "theme": "Food", "sentiment": 0.2,
     "Facility": "Kaiser Oakland", "date": "sometime", "source": "Yelp"}
]"#;
