use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carelens::config::Config;
use carelens::error::ErrorCategory;

mod commands;

#[derive(Parser)]
#[command(
    name = "carelens",
    version,
    about = "Patient feedback analytics: theme tagging, weekly sentiment alerts and theme ranking",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults to environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Write JSON output to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach canonical theme tags to every record
    Tag {
        /// JSON array of feedback records
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Weekly target-vs-competition sentiment with divergence alerts
    Trend {
        /// JSON array of feedback records
        #[arg(short, long)]
        input: PathBuf,

        /// Override the divergence threshold
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Rank themes by volume with mean sentiment
    Themes {
        /// JSON array of feedback records
        #[arg(short, long)]
        input: PathBuf,

        /// Number of themes to keep
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Rank themes across every facility, not only the target entity
        #[arg(long, default_value = "false")]
        all_facilities: bool,
    },

    /// Normalize a 5Ws (What/Why/Who/When/Where) facet table
    Facets {
        /// JSON array of facet rows
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = &result {
        let category = commands::error_category(e).unwrap_or(ErrorCategory::Other);
        tracing::error!(category = category.description(), error = %e, "carelens failed");
    }
    result
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::from_env()?,
    };

    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    // Initialize tracing/logging
    setup_tracing(&config.logging.level, &config.logging.format, cli.verbose)?;

    match &cli.command {
        Commands::Trend {
            threshold: Some(threshold),
            ..
        } => config.analysis.divergence_threshold = *threshold,
        Commands::Themes {
            top_n: Some(top_n), ..
        } => config.analysis.top_n_themes = *top_n,
        _ => {}
    }

    config.validate().context("Invalid configuration")?;

    tracing::info!("carelens starting");

    let output = cli.output.as_deref();

    match cli.command {
        Commands::Tag { input } => {
            tracing::info!(input = %input.display(), "Starting tag command");
            let report = commands::tag(&config, &input)?;
            commands::write_json(&report, output)?;
        }

        Commands::Trend { input, threshold } => {
            tracing::info!(
                input = %input.display(),
                threshold = ?threshold,
                "Starting trend command"
            );
            let report = commands::trend(&config, &input)?;
            commands::write_json(&report, output)?;
        }

        Commands::Themes {
            input,
            top_n,
            all_facilities,
        } => {
            tracing::info!(
                input = %input.display(),
                top_n = ?top_n,
                all_facilities = %all_facilities,
                "Starting themes command"
            );
            let report = commands::themes(&config, &input, all_facilities)?;
            commands::write_json(&report, output)?;
        }

        Commands::Facets { input } => {
            tracing::info!(input = %input.display(), "Starting facets command");
            let table = commands::facets(&input)?;
            commands::write_json(&table, output)?;
        }
    }

    tracing::info!("carelens completed successfully");
    Ok(())
}

fn setup_tracing(level: &str, format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("carelens=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new(format!("carelens={level},warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
