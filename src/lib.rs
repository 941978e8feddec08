//! carelens - Patient feedback analytics
//!
//! Turns already-scored patient feedback into three analytic views.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`analytics`] - Theme tagging, weekly sentiment comparison, theme ranking
//!   and 5Ws facet tables
//! - [`config`] - Configuration management and settings
//! - [`ingest`] - Loading JSON exports with per-row skipping
//! - [`models`] - Core data structures and types
//! - [`error`] - Unified error type
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use carelens::analytics::{aggregate, rank, tag_records};
//! use carelens::config::Config;
//! use carelens::ingest::load_records;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let loaded = load_records(std::path::Path::new("feedback.json"))?;
//!
//!     let trend = aggregate(
//!         &loaded.records,
//!         &config.target_entity()?,
//!         &config.aggregation_options(),
//!     )?;
//!     let tagged = tag_records(loaded.records, &config.vocabulary()?);
//!     let themes = rank(&tagged, config.analysis.top_n_themes)?;
//!
//!     println!("{} alerts, {} themes", trend.alerts().len(), themes.themes.len());
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{
        aggregate, rank, tag, tag_records, AggregationOptions, ComparisonRow, SentimentTrend,
        TargetEntity, ThemeRanking, ThemeSummary, Vocabulary, WeekStart,
    };
    pub use crate::config::Config;
    pub use crate::error::{ClassifyError, Error, ErrorCategory, Result};
    pub use crate::models::{FeedbackRecord, TaggedRecord};
}

// Direct re-exports for convenience
pub use models::{FeedbackRecord, TaggedRecord};
