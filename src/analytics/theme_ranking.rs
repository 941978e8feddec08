//! Theme volume and sentiment rollup
//!
//! Tagged records are exploded into one row per (record, theme) pair, rolled
//! up per theme, then ranked by volume with a name tie-break so the output
//! does not depend on input order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::error::{AnalyticsError, AnalyticsResult};
use super::sentiment_trends::MeanAccumulator;
use crate::models::TaggedRecord;

/// Default number of themes kept after ranking
pub const DEFAULT_TOP_N_THEMES: usize = 80;

/// One (record, theme) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplodedThemeRow<'a> {
    pub record: &'a TaggedRecord,
    pub theme: &'a str,
}

/// Volume and mean sentiment for one theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSummary {
    pub theme: String,
    /// Every exploded row carrying this theme, scored or not
    pub count: usize,
    /// Mean over the scored rows; `None` when no row has a sentiment
    pub avg_sentiment: Option<f64>,
}

/// Ranked themes plus the totals they were computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRanking {
    /// Sorted by count descending, then theme ascending; at most `top_n`
    pub themes: Vec<ThemeSummary>,
    /// Exploded rows that contributed to the rollup
    pub exploded_rows: usize,
    /// Distinct themes before truncation
    pub distinct_themes: usize,
    /// Tagged records without a sentiment score (counted, not averaged)
    pub unscored_records: usize,
}

/// Explode records into one row per assigned theme
pub fn explode(records: &[TaggedRecord]) -> Vec<ExplodedThemeRow<'_>> {
    records
        .iter()
        .flat_map(|record| {
            record.master_themes.iter().map(move |theme| ExplodedThemeRow {
                record,
                theme: theme.as_str(),
            })
        })
        .collect()
}

#[derive(Default)]
struct ThemeTally {
    rows: usize,
    sentiment: MeanAccumulator,
}

/// Group exploded rows by theme, in theme-name order
pub fn rollup(rows: &[ExplodedThemeRow<'_>]) -> Vec<ThemeSummary> {
    let mut by_theme: BTreeMap<&str, ThemeTally> = BTreeMap::new();

    for row in rows {
        let tally = by_theme.entry(row.theme).or_default();
        tally.rows += 1;
        if let Some(sentiment) = row.record.sentiment() {
            tally.sentiment.add(sentiment);
        }
    }

    by_theme
        .into_iter()
        .map(|(theme, tally)| ThemeSummary {
            theme: theme.to_string(),
            count: tally.rows,
            avg_sentiment: tally.sentiment.mean(),
        })
        .collect()
}

fn by_volume(a: &ThemeSummary, b: &ThemeSummary) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.theme.cmp(&b.theme))
}

/// Rank themes by volume and keep the first `top_n`
///
/// # Errors
/// `InvalidTopN` when `top_n` is zero.
pub fn rank(records: &[TaggedRecord], top_n: usize) -> AnalyticsResult<ThemeRanking> {
    if top_n == 0 {
        return Err(AnalyticsError::InvalidTopN(top_n));
    }

    let unscored_records = records.iter().filter(|r| r.sentiment().is_none()).count();
    let rows = explode(records);

    let mut themes = rollup(&rows);
    let distinct_themes = themes.len();

    themes.sort_by(by_volume);
    themes.truncate(top_n);

    tracing::debug!(
        exploded_rows = rows.len(),
        distinct_themes,
        kept = themes.len(),
        unscored_records,
        "Ranked themes"
    );

    Ok(ThemeRanking {
        themes,
        exploded_rows: rows.len(),
        distinct_themes,
        unscored_records,
    })
}
