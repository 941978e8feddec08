use anyhow::Result;
use std::path::Path;

use carelens::analytics::{aggregate, SentimentTrend};
use carelens::config::Config;

use super::{read_input, Report};

pub fn trend(config: &Config, input: &Path) -> Result<Report<SentimentTrend>> {
    let target = config.target_entity()?;
    let options = config.aggregation_options();
    let loaded = read_input(input)?;

    let trend = aggregate(&loaded.records, &target, &options)?;

    for alert in trend.alerts() {
        tracing::info!(
            window = %alert.window,
            source = %alert.source,
            target_mean = alert.target_mean,
            "Divergence alert"
        );
    }
    if trend.skipped.total() > 0 {
        tracing::warn!(
            missing_date = trend.skipped.missing_date,
            missing_sentiment = trend.skipped.missing_sentiment,
            out_of_range = trend.skipped.out_of_range,
            "Records excluded from aggregation"
        );
    }

    Ok(Report {
        data: trend,
        skipped_on_load: loaded.skipped,
    })
}
