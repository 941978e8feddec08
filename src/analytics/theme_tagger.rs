//! Multi-label theme tagging against a fixed keyword vocabulary
//!
//! A raw theme label is matched against every vocabulary term with a
//! case-insensitive substring test. All matching terms are kept, in the
//! order the vocabulary declares them, so overlapping terms such as
//! "Scheduling" and "Appointment Scheduling" both fire. Labels that match
//! nothing fall back to [`OTHER_THEME`].

use serde::{Deserialize, Serialize};

use super::error::{AnalyticsError, AnalyticsResult};
use crate::models::{FeedbackRecord, TaggedRecord};

/// Tag assigned when no vocabulary term matches
pub const OTHER_THEME: &str = "Other";

/// Healthcare patient-experience keyword list, in declared order
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "Cleanliness",
    "Staff",
    "Emotional Support",
    "Safety",
    "Facilities",
    "Pain Management",
    "Other",
    "Billing",
    "Communication",
    "Nursing Staff",
    "Release",
    "Wait Time",
    "Food",
    "Referral",
    "Medication",
    "Coordination",
    "Equipment",
    "Bedside Manners",
    "Delivery Experience",
    "Treatment",
    "Roommates",
    "Discharge Process",
    "Preparation",
    "Diagnosis & Treatment",
    "Dietary Guidance",
    "Sharing",
    "Training",
    "Weight",
    "Navigation",
    "Corporatization",
    "Insurance",
    "Scheduling",
    "Knowledge",
    "Medical Records",
    "Parking",
    "Appointment Scheduling",
    "Privacy",
    "Schedule Management",
    "Technology",
    "Accessibility",
    "Appointment Access",
    "Appointment Management",
    "System",
    "Admin",
    "Interface",
    "Access",
    "Staffing",
    "Treatment Plan",
    "Initial Process",
    "Express Care",
    "Tech Support",
    "Diagnosis",
    "Online System",
    "Specimen Collection",
    "Location",
    "Efficient Use of Time",
];

/// Ordered, read-only set of canonical theme labels
///
/// Matching keys are precomputed once so tagging a batch does not
/// re-normalize every term per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    needles: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from terms in their display casing
    ///
    /// # Errors
    /// `EmptyVocabulary` when no terms are given, `BlankVocabularyTerm`
    /// when a term is empty after trimming (it would match every label).
    pub fn new<I, S>(terms: I) -> AnalyticsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();

        if terms.is_empty() {
            return Err(AnalyticsError::EmptyVocabulary);
        }

        let mut needles = Vec::with_capacity(terms.len());
        for (index, term) in terms.iter().enumerate() {
            let needle = normalize(term);
            if needle.is_empty() {
                return Err(AnalyticsError::BlankVocabularyTerm { index });
            }
            needles.push(needle);
        }

        Ok(Self { terms, needles })
    }

    /// The built-in healthcare vocabulary
    #[must_use]
    pub fn healthcare() -> Self {
        let terms: Vec<String> = DEFAULT_VOCABULARY.iter().map(|t| t.to_string()).collect();
        let needles = terms.iter().map(|t| normalize(t)).collect();
        Self { terms, needles }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn entries(&self) -> impl Iterator<Item = (&String, &String)> {
        self.terms.iter().zip(self.needles.iter())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::healthcare()
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = AnalyticsError;

    fn try_from(terms: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Map a raw theme label to its canonical themes
///
/// The result is never empty: it is either the matching vocabulary terms in
/// declared order (original casing, overlaps kept) or `["Other"]`.
#[must_use]
pub fn tag(raw_theme: &str, vocabulary: &Vocabulary) -> Vec<String> {
    let haystack = normalize(raw_theme);

    let tags: Vec<String> = vocabulary
        .entries()
        .filter(|(_, needle)| haystack.contains(needle.as_str()))
        .map(|(term, _)| term.clone())
        .collect();

    if tags.is_empty() {
        vec![OTHER_THEME.to_string()]
    } else {
        tags
    }
}

/// Attach canonical themes to a single record
#[must_use]
pub fn tag_record(record: FeedbackRecord, vocabulary: &Vocabulary) -> TaggedRecord {
    let master_themes = tag(&record.theme, vocabulary);
    TaggedRecord {
        record,
        master_themes,
    }
}

/// Tag a batch of records, preserving input order
pub fn tag_records<I>(records: I, vocabulary: &Vocabulary) -> Vec<TaggedRecord>
where
    I: IntoIterator<Item = FeedbackRecord>,
{
    let tagged: Vec<TaggedRecord> = records
        .into_iter()
        .map(|record| tag_record(record, vocabulary))
        .collect();

    tracing::debug!(
        records = tagged.len(),
        vocabulary_terms = vocabulary.len(),
        "Tagged feedback records"
    );

    tagged
}
