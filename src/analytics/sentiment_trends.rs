//! Weekly comparative sentiment between a target entity and its competition
//!
//! This module provides functionality for:
//! - Normalizing facility-name variants onto one canonical entity name
//! - Labelling each record as target entity or competition
//! - Bucketing records into start-of-week windows
//! - Averaging sentiment per (window, org, source) group
//! - Aligning target and competition means per (window, source) and
//!   flagging divergence alerts

use chrono::{Datelike, Duration, NaiveDate};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

use super::error::{AnalyticsError, AnalyticsResult};
use crate::models::FeedbackRecord;

/// Default gap below zero the target mean must cross to raise an alert
pub const DEFAULT_DIVERGENCE_THRESHOLD: f64 = 0.25;

/// Default fraction of records allowed to carry out-of-range sentiment
pub const DEFAULT_SENTIMENT_TOLERANCE: f64 = 0.05;

/// First day of a weekly time window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    /// Truncate a date to the start of its week
    #[must_use]
    pub fn window_start(self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            Self::Monday => date.weekday().num_days_from_monday(),
            Self::Sunday => date.weekday().num_days_from_sunday(),
        };
        date - Duration::days(i64::from(offset))
    }

    /// Parse from a config value, case-insensitively
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "monday" | "mon" => Some(Self::Monday),
            "sunday" | "sun" => Some(Self::Sunday),
            _ => None,
        }
    }
}

/// Rewrites facility names matching a pattern to one canonical name
///
/// Matching is case-insensitive and unanchored: any facility whose name
/// contains a match is replaced wholesale by the canonical name.
#[derive(Debug, Clone)]
pub struct IdentityRule {
    regex: Regex,
    canonical: String,
}

impl IdentityRule {
    /// Compile a rewrite rule
    ///
    /// # Errors
    /// `InvalidIdentityPattern` when `pattern` is not a valid regex.
    pub fn new(pattern: &str, canonical: impl Into<String>) -> AnalyticsResult<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| AnalyticsError::InvalidIdentityPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            regex,
            canonical: canonical.into(),
        })
    }

    /// Apply the rule, borrowing the input when it does not match
    #[must_use]
    pub fn apply<'a>(&self, facility: &'a str) -> Cow<'a, str> {
        if self.regex.is_match(facility) {
            Cow::Owned(self.canonical.clone())
        } else {
            Cow::Borrowed(facility)
        }
    }
}

/// Whether a record belongs to the monitored entity or to everyone else
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgLabel {
    Target,
    Competition,
}

/// The organization whose sentiment is being monitored
#[derive(Debug, Clone)]
pub struct TargetEntity {
    canonical_name: String,
    identity_rule: Option<IdentityRule>,
}

impl TargetEntity {
    /// Create a target with no name-variant rewriting
    ///
    /// # Errors
    /// `BlankTargetName` when the name is empty after trimming, since every
    /// facility would then contain it.
    pub fn new(canonical_name: impl Into<String>) -> AnalyticsResult<Self> {
        let canonical_name = canonical_name.into();
        if canonical_name.trim().is_empty() {
            return Err(AnalyticsError::BlankTargetName);
        }

        Ok(Self {
            canonical_name,
            identity_rule: None,
        })
    }

    /// Rewrite facilities matching `pattern` to the canonical name
    pub fn with_identity_pattern(mut self, pattern: &str) -> AnalyticsResult<Self> {
        self.identity_rule = Some(IdentityRule::new(pattern, self.canonical_name.clone())?);
        Ok(self)
    }

    #[must_use]
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Facility name after applying the identity rule, if any
    #[must_use]
    pub fn canonicalize<'a>(&self, facility: &'a str) -> Cow<'a, str> {
        match &self.identity_rule {
            Some(rule) => rule.apply(facility),
            None => Cow::Borrowed(facility),
        }
    }

    /// Label a facility; containment of the canonical name is case-sensitive
    #[must_use]
    pub fn classify(&self, facility: &str) -> OrgLabel {
        if self.canonicalize(facility).contains(&self.canonical_name) {
            OrgLabel::Target
        } else {
            OrgLabel::Competition
        }
    }

    /// Records belonging to the target, matched case-insensitively
    ///
    /// Used to restrict theme ranking to the monitored entity.
    pub fn select<'a, I>(&self, records: I) -> Vec<&'a FeedbackRecord>
    where
        I: IntoIterator<Item = &'a FeedbackRecord>,
    {
        let needle = self.canonical_name.to_lowercase();
        records
            .into_iter()
            .filter(|record| {
                self.canonicalize(&record.facility)
                    .to_lowercase()
                    .contains(&needle)
            })
            .collect()
    }
}

/// Tunables for [`aggregate`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationOptions {
    pub divergence_threshold: f64,
    pub sentiment_tolerance: f64,
    pub week_start: WeekStart,
}

impl AggregationOptions {
    /// Check option ranges
    ///
    /// # Errors
    /// `InvalidThreshold` outside [0, 2], `InvalidTolerance` outside [0, 1].
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(0.0..=2.0).contains(&self.divergence_threshold) {
            return Err(AnalyticsError::InvalidThreshold(self.divergence_threshold));
        }
        if !(0.0..=1.0).contains(&self.sentiment_tolerance) {
            return Err(AnalyticsError::InvalidTolerance(self.sentiment_tolerance));
        }
        Ok(())
    }
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            divergence_threshold: DEFAULT_DIVERGENCE_THRESHOLD,
            sentiment_tolerance: DEFAULT_SENTIMENT_TOLERANCE,
            week_start: WeekStart::Monday,
        }
    }
}

/// Running mean that can be merged across partitions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn merge(&mut self, other: &Self) {
        self.sum += other.sum;
        self.count += other.count;
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, or `None` when nothing was added
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Mean sentiment of one (window, org, source) group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedSentiment {
    /// First day of the week
    pub window: NaiveDate,
    pub org: OrgLabel,
    pub source: String,
    pub mean_sentiment: f64,
    /// Records averaged into this group
    pub records: usize,
}

/// Target and competition means side by side for one (window, source)
///
/// A side with no records in the window stays `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub window: NaiveDate,
    pub source: String,
    pub target_mean: Option<f64>,
    pub competition_mean: Option<f64>,
    pub alert: bool,
}

/// Point to mark on a trend chart for an alerting row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertAnnotation {
    pub window: NaiveDate,
    pub source: String,
    pub target_mean: f64,
}

/// Records left out of the aggregation, by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipReport {
    pub missing_date: usize,
    pub missing_sentiment: usize,
    /// Outside [-1, 1] but within the configured tolerance
    pub out_of_range: usize,
}

impl SkipReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.missing_date + self.missing_sentiment + self.out_of_range
    }
}

/// Result of a sentiment aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentTrend {
    /// Display name of the target entity
    pub target: String,
    pub divergence_threshold: f64,
    /// Ordered by (window, org, source)
    pub weekly: Vec<GroupedSentiment>,
    /// Ordered by (window, source)
    pub comparison: Vec<ComparisonRow>,
    pub skipped: SkipReport,
}

impl SentimentTrend {
    /// Alerting rows as chart annotations, in window order
    #[must_use]
    pub fn alerts(&self) -> Vec<AlertAnnotation> {
        self.comparison
            .iter()
            .filter(|row| row.alert)
            .filter_map(|row| {
                row.target_mean.map(|target_mean| AlertAnnotation {
                    window: row.window,
                    source: row.source.clone(),
                    target_mean,
                })
            })
            .collect()
    }
}

/// Divergence rule: competition positive while the target is below `-threshold`
///
/// Deliberately one-sided; a missing side never alerts.
#[must_use]
pub fn is_divergent(
    target_mean: Option<f64>,
    competition_mean: Option<f64>,
    threshold: f64,
) -> bool {
    match (target_mean, competition_mean) {
        (Some(target), Some(competition)) => competition > 0.0 && target < -threshold,
        _ => false,
    }
}

fn in_range(sentiment: f64) -> bool {
    (-1.0..=1.0).contains(&sentiment)
}

/// Aggregate weekly sentiment and flag divergence alerts
///
/// Records missing a date or sentiment are excluded and counted in
/// [`SkipReport`]. Groups with no records are absent, not zero-filled.
///
/// # Errors
/// - `InvalidThreshold` / `InvalidTolerance` for bad options
/// - `SentimentOutOfRange` when the share of out-of-range sentiment values
///   exceeds the tolerance
/// - `NoTargetRecords` when no usable record belongs to the target
pub fn aggregate(
    records: &[FeedbackRecord],
    target: &TargetEntity,
    options: &AggregationOptions,
) -> AnalyticsResult<SentimentTrend> {
    options.validate()?;

    let scored = records.iter().filter(|r| r.sentiment.is_some()).count();
    let out_of_range = records
        .iter()
        .filter_map(|r| r.sentiment)
        .filter(|&s| !in_range(s))
        .count();

    // share of scored records; unscored ones are skipped below
    if scored > 0 && out_of_range as f64 / scored as f64 > options.sentiment_tolerance {
        return Err(AnalyticsError::SentimentOutOfRange {
            out_of_range,
            total: scored,
            tolerance: options.sentiment_tolerance,
        });
    }

    let mut skipped = SkipReport::default();
    let mut groups: BTreeMap<(NaiveDate, OrgLabel, String), MeanAccumulator> = BTreeMap::new();

    for record in records {
        let Some(sentiment) = record.sentiment else {
            skipped.missing_sentiment += 1;
            continue;
        };
        if !in_range(sentiment) {
            skipped.out_of_range += 1;
            continue;
        }
        let Some(date) = record.date else {
            skipped.missing_date += 1;
            continue;
        };

        let key = (
            options.week_start.window_start(date),
            target.classify(&record.facility),
            record.source.clone(),
        );
        groups.entry(key).or_default().add(sentiment);
    }

    if !groups.keys().any(|(_, org, _)| *org == OrgLabel::Target) {
        return Err(AnalyticsError::NoTargetRecords {
            target: target.canonical_name().to_string(),
        });
    }

    let weekly: Vec<GroupedSentiment> = groups
        .into_iter()
        .filter_map(|((window, org, source), acc)| {
            acc.mean().map(|mean_sentiment| GroupedSentiment {
                window,
                org,
                source,
                mean_sentiment,
                records: acc.count(),
            })
        })
        .collect();

    let comparison = pivot(&weekly, options.divergence_threshold);
    let alerts = comparison.iter().filter(|row| row.alert).count();

    tracing::debug!(
        groups = weekly.len(),
        rows = comparison.len(),
        alerts,
        skipped = skipped.total(),
        "Aggregated weekly sentiment"
    );

    Ok(SentimentTrend {
        target: target.canonical_name().to_string(),
        divergence_threshold: options.divergence_threshold,
        weekly,
        comparison,
        skipped,
    })
}

/// Align target and competition means per (window, source)
fn pivot(weekly: &[GroupedSentiment], threshold: f64) -> Vec<ComparisonRow> {
    let mut aligned: BTreeMap<(NaiveDate, &str), (Option<f64>, Option<f64>)> = BTreeMap::new();

    for group in weekly {
        let sides = aligned
            .entry((group.window, group.source.as_str()))
            .or_default();
        match group.org {
            OrgLabel::Target => sides.0 = Some(group.mean_sentiment),
            OrgLabel::Competition => sides.1 = Some(group.mean_sentiment),
        }
    }

    aligned
        .into_iter()
        .map(|((window, source), (target_mean, competition_mean))| ComparisonRow {
            window,
            source: source.to_string(),
            target_mean,
            competition_mean,
            alert: is_divergent(target_mean, competition_mean, threshold),
        })
        .collect()
}
