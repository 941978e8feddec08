//! Analytics over patient feedback records
//!
//! Three independent batch transformations:
//! - [`theme_tagger`] - multi-label theme tagging against a vocabulary
//! - [`sentiment_trends`] - weekly target-vs-competition sentiment with alerts
//! - [`theme_ranking`] - per-theme volume and sentiment rollup
//!
//! plus [`facets`], the cleanup of upstream 5Ws breakdown tables.

pub mod error;
pub mod facets;
pub mod sentiment_trends;
pub mod theme_ranking;
pub mod theme_tagger;

pub use error::{AnalyticsError, AnalyticsResult, ErrorKind};
pub use facets::{Facet, FacetRecord, FacetTable};
pub use sentiment_trends::{
    aggregate, is_divergent, AggregationOptions, AlertAnnotation, ComparisonRow,
    GroupedSentiment, IdentityRule, MeanAccumulator, OrgLabel, SentimentTrend, SkipReport,
    TargetEntity, WeekStart,
};
pub use theme_ranking::{explode, rank, rollup, ExplodedThemeRow, ThemeRanking, ThemeSummary};
pub use theme_tagger::{tag, tag_record, tag_records, Vocabulary, OTHER_THEME};
