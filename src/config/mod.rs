//! Configuration management for carelens
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files, and builds the injected values (vocabulary,
//! target entity, aggregation options) the analytics operations take.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analytics::sentiment_trends::{
    DEFAULT_DIVERGENCE_THRESHOLD, DEFAULT_SENTIMENT_TOLERANCE,
};
use crate::analytics::theme_ranking::DEFAULT_TOP_N_THEMES;
use crate::analytics::theme_tagger::DEFAULT_VOCABULARY;
use crate::analytics::{AggregationOptions, AnalyticsError, TargetEntity, Vocabulary, WeekStart};
use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analytics configuration
    pub analysis: AnalysisConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Analytics options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Theme keyword list, in matching/output order
    pub vocabulary: Vec<String>,

    /// Display name of the monitored organization
    pub target_entity_canonical_name: String,

    /// Case-insensitive regex; matching facilities are renamed to the
    /// canonical name before classification
    pub target_entity_identity_pattern: Option<String>,

    /// Alert when the target mean drops below `-divergence_threshold`
    pub divergence_threshold: f64,

    /// Number of themes kept after ranking
    pub top_n_themes: usize,

    /// First day of each weekly window
    pub week_start: WeekStart,

    /// Fraction of records allowed to carry sentiment outside [-1, 1]
    pub sentiment_tolerance: f64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            vocabulary: DEFAULT_VOCABULARY.iter().map(|t| t.to_string()).collect(),
            target_entity_canonical_name: String::from("Health System Alpha"),
            target_entity_identity_pattern: Some(String::from("kaiser")),
            divergence_threshold: DEFAULT_DIVERGENCE_THRESHOLD,
            top_n_themes: DEFAULT_TOP_N_THEMES,
            week_start: WeekStart::Monday,
            sentiment_tolerance: DEFAULT_SENTIMENT_TOLERANCE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults. The vocabulary
    /// is not configurable from the environment.
    pub fn from_env() -> Result<Self> {
        let defaults = AnalysisConfig::default();

        let target_entity_canonical_name = std::env::var("CARELENS_TARGET_NAME")
            .unwrap_or(defaults.target_entity_canonical_name);

        let target_entity_identity_pattern = match std::env::var("CARELENS_IDENTITY_PATTERN") {
            Ok(pattern) if pattern.trim().is_empty() => None,
            Ok(pattern) => Some(pattern),
            Err(_) => defaults.target_entity_identity_pattern,
        };

        let divergence_threshold = env_parse::<f64>("CARELENS_DIVERGENCE_THRESHOLD")
            .unwrap_or(defaults.divergence_threshold);

        let top_n_themes =
            env_parse::<usize>("CARELENS_TOP_N_THEMES").unwrap_or(defaults.top_n_themes);

        let week_start = std::env::var("CARELENS_WEEK_START")
            .ok()
            .and_then(|v| WeekStart::parse(&v))
            .unwrap_or(defaults.week_start);

        let sentiment_tolerance = env_parse::<f64>("CARELENS_SENTIMENT_TOLERANCE")
            .unwrap_or(defaults.sentiment_tolerance);

        let log_level =
            std::env::var("CARELENS_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("CARELENS_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            analysis: AnalysisConfig {
                vocabulary: defaults.vocabulary,
                target_entity_canonical_name,
                target_entity_identity_pattern,
                divergence_threshold,
                top_n_themes,
                week_start,
                sentiment_tolerance,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(
                format!("Failed to read config file: {}", path.display()),
                e,
            )
        })?;

        let config: Self = toml::from_str(&content)?;

        Ok(config)
    }

    /// Validate configuration values
    ///
    /// Every failure is a configuration-category error.
    pub fn validate(&self) -> Result<()> {
        self.vocabulary()?;
        self.target_entity()?;
        self.aggregation_options().validate()?;

        if self.analysis.top_n_themes == 0 {
            return Err(AnalyticsError::InvalidTopN(0).into());
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(Error::config(format!(
                "Unknown log format '{}' (expected text or json)",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Vocabulary for theme tagging
    pub fn vocabulary(&self) -> Result<Vocabulary> {
        Ok(Vocabulary::new(self.analysis.vocabulary.iter().cloned())?)
    }

    /// Target entity with its identity rewrite rule, if configured
    pub fn target_entity(&self) -> Result<TargetEntity> {
        let target = TargetEntity::new(self.analysis.target_entity_canonical_name.clone())?;

        let target = match self.analysis.target_entity_identity_pattern.as_deref() {
            Some(pattern) => target.with_identity_pattern(pattern)?,
            None => target,
        };

        Ok(target)
    }

    /// Options for sentiment aggregation
    #[must_use]
    pub fn aggregation_options(&self) -> AggregationOptions {
        AggregationOptions {
            divergence_threshold: self.analysis.divergence_threshold,
            sentiment_tolerance: self.analysis.sentiment_tolerance,
            week_start: self.analysis.week_start,
        }
    }
}
