//! CLI entry point for the lactation analytics tool.
//!
//! Provides subcommands for analyzing a single animal, building a herd
//! index, and printing the expected lactation curve.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use lactation_analytics::analyzers::analyzer::{analyze_animal, analyze_herd};
use lactation_analytics::analyzers::curve::{build_lactation_curve, expected_lactation};
use lactation_analytics::config::AnalyticsConfig;
use lactation_analytics::fetch::BasicClient;
use lactation_analytics::fetch::auth::ApiKey;
use lactation_analytics::infra::{CsvRecordSource, DairyApiClient};
use lactation_analytics::output::{append_daily_rows, print_json, print_pretty, write_json};
use lactation_analytics::records::DateRange;
use lactation_analytics::services::RecordSource;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "lactation_analytics")]
#[command(about = "Lactation production analytics for dairy herds", long_about = None)]
struct Cli {
    /// JSON analytics config (curve parameters, windows)
    #[arg(long, global = true, env = "LACTATION_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// CSV export path or record-keeping API base URL
    #[arg(short, long, value_name = "FILE_OR_URL")]
    source: String,

    /// Animal profiles JSON (CSV sources only)
    #[arg(long)]
    profiles: Option<String>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Reference time for days in milk (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

impl SourceArgs {
    fn range(&self) -> Option<DateRange> {
        let range = DateRange::new(self.from, self.to);
        (!range.is_unbounded()).then_some(range)
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one animal's lactation
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Ear tag of the animal
        #[arg(short, long)]
        animal: String,

        /// JSON file to write the analysis to
        #[arg(short, long, default_value = "analysis.json")]
        output: String,

        /// Optional CSV file to append daily summaries to
        #[arg(long)]
        daily_csv: Option<String>,
    },
    /// Analyze every animal and write a herd index
    Herd {
        #[command(flatten)]
        source: SourceArgs,

        /// Maximum number of animals analyzed at once
        #[arg(short, long, default_value_t = 5)]
        concurrency: usize,

        /// JSON file to write the herd index to
        #[arg(short, long, default_value = "herd.json")]
        output: String,
    },
    /// Print the expected lactation curve for the configured parameters
    Curve,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "Analytics config loaded");

    match cli.command {
        Commands::Analyze {
            source,
            animal,
            output,
            daily_csv,
        } => {
            let records = record_source(&source)?;
            let result = analyze_animal(records.as_ref(), &animal, source.range(), source.now(), &config).await?;

            print_pretty(&result.analysis.statistics);
            write_json(&output, &result)?;
            if let Some(path) = daily_csv {
                append_daily_rows(&path, &result.analysis.daily)?;
            }
        }
        Commands::Herd {
            source,
            concurrency,
            output,
        } => {
            let records = record_source(&source)?;
            let index = analyze_herd(
                records,
                source.range(),
                source.now(),
                Arc::new(config),
                concurrency,
            )
            .await?;

            info!(animals = index.animals.len(), output = %output, "Herd index ready");
            write_json(&output, &index)?;
        }
        Commands::Curve => {
            let curve = build_lactation_curve(&[], None, &config.curve, config.lactation_length);
            print_json(&expected_lactation(&config.curve, config.lactation_length))?;
            println!("{}", serde_json::to_string_pretty(&curve)?);
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/lactation_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("lactation_analytics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

fn load_config(path: Option<&str>) -> Result<AnalyticsConfig> {
    let config = match path {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    }
    .with_env_overrides()?;
    config.validate().context("invalid analytics config")?;
    Ok(config)
}

/// Picks the HTTP API for URLs and the CSV reader for anything else.
#[tracing::instrument(skip(args), fields(source = %args.source))]
fn record_source(args: &SourceArgs) -> Result<Arc<dyn RecordSource>> {
    if args.source.starts_with("http") {
        let client = BasicClient::new()?;
        return match std::env::var("DAIRY_API_TOKEN") {
            Ok(token) => {
                let client = ApiKey::bearer(client, &token)?;
                Ok(Arc::new(DairyApiClient::new(&args.source, client)?))
            }
            Err(_) => {
                info!("DAIRY_API_TOKEN not set, calling the API without credentials");
                Ok(Arc::new(DairyApiClient::new(&args.source, client)?))
            }
        };
    }

    let mut source = CsvRecordSource::new(&args.source);
    if let Some(profiles) = &args.profiles {
        source = source.with_profiles(Path::new(profiles))?;
    }
    Ok(Arc::new(source))
}
