//! Dynoload - batched delimited-file import into DynamoDB

use anyhow::Result;
use clap::Parser;
use dynoload_common::logging::{init_logging, LogConfig, LogLevel};
use dynoload_common::types::{Delimiter, FieldClassification};
use dynoload_import::config::ImportConfig;
use dynoload_import::source::CsvRowSource;
use dynoload_import::stream::StreamController;
use dynoload_import::writer::DynamoSink;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dynoload")]
#[command(author, version, about = "Stream a delimited file into a DynamoDB table in batches")]
struct Cli {
    /// AWS region of the destination table
    #[arg(long)]
    region: String,

    /// Destination table name
    #[arg(long)]
    table: String,

    /// Path of the delimited file to import
    #[arg(long)]
    csv: PathBuf,

    /// Input delimiter: comma or tab
    #[arg(long, default_value = "comma")]
    delimiter: String,

    /// Keep transport connections alive between batch writes
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    keep_alive: bool,

    /// Comma-separated field names that contain numeric values
    #[arg(long, default_value = "")]
    numeric_fields: String,

    /// Comma-separated field names that contain boolean values
    #[arg(long, default_value = "")]
    boolean_fields: String,

    /// Records per batch write (at most 25, the store's limit)
    #[arg(long, default_value_t = dynoload_import::MAX_BATCH_SIZE)]
    batch_size: usize,

    /// Log a progress line every N written records (0 disables)
    #[arg(long, default_value_t = dynoload_import::config::DEFAULT_PROGRESS_EVERY)]
    progress_every: u64,

    /// Endpoint override for a local DynamoDB instance
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    let log_config = LogConfig::console(log_level, "dynoload");

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    let config = ImportConfig {
        region: cli.region,
        table: cli.table,
        csv_path: cli.csv,
        delimiter: cli
            .delimiter
            .parse::<Delimiter>()
            .unwrap_or_default(),
        keep_alive: cli.keep_alive,
        classification: FieldClassification::from_lists(&cli.numeric_fields, &cli.boolean_fields),
        batch_size: cli.batch_size,
        progress_every: cli.progress_every,
        endpoint_url: cli.endpoint_url,
    };
    config.validate()?;

    info!(
        csv = %config.csv_path.display(),
        table = %config.table,
        region = %config.region,
        delimiter = %config.delimiter,
        "importing"
    );

    let sink = DynamoSink::connect(&config).await?;
    let mut source = CsvRowSource::open(&config.csv_path, config.delimiter).await?;
    let mut controller = StreamController::new(sink, &config);

    let summary = controller.run(&mut source, &config.classification).await?;

    info!(
        "inserted {} of {} rows in {:.2}s - {:.0} records per second",
        summary.records_written,
        summary.rows_read,
        summary.elapsed_secs,
        summary.records_per_second
    );

    Ok(())
}
