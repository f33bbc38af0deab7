//! Fetch the inflation and index streams of one provider, print them, and
//! raise an alert when the mean of either stream exceeds the threshold.
//!
//! Requires PRIVATE_KEY, PROVIDER_URL and PROVIDER_ADDRESS in the environment
//! or a `.env` file.
//!
//! Run with: cargo run --bin risk_monitor

use std::path::PathBuf;

use alloy::primitives::Address;
use clap::Parser;
use tracing::{error, info};

use tn_stream_sdk::{
    calculate_risk_metrics, fetch_processed, generate_alerts, logging::setup_logging, AppConfig,
    LogFormat, ProcessedRecord, RecordRange, StreamId, StreamLocator, TnClient,
};

const INFLATION_STREAM: &str = "stf389ad7681059ca7750dda907735b2";
const INDEX_STREAM: &str = "st15889445eac65d03159da7c882a895";

#[derive(Parser)]
#[command(name = "risk_monitor")]
#[command(version, about = "Inflation and index VaR monitor", long_about = None)]
struct Cli {
    /// Optional TOML config (query window, threshold, logging)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format for logs
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(mut config) => {
            config.apply_env();
            config
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    setup_logging(
        &config.logging.level,
        cli.log_format.unwrap_or(config.logging.format),
    );

    if let Err(e) = run(&config).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let signer = config.signer()?;
    let base_url = config.base_url()?;
    let provider = config.provider_address()?;
    let range = config.query_range()?;
    let alert_config = config.alert_config();

    let client = TnClient::new(base_url, signer, None);

    let inflation_data = fetch_stream(&client, INFLATION_STREAM, provider, range).await?;
    println!("Inflation Data:");
    for record in &inflation_data {
        println!("{record}");
    }

    let index_data = fetch_stream(&client, INDEX_STREAM, provider, range).await?;
    println!("Index Data:");
    for record in &index_data {
        println!(
            "Date (DateValue): {}, Index Value: {:.6}",
            record.label, record.value
        );
    }

    let inflation_metrics = calculate_risk_metrics(&inflation_data);
    println!("Inflation Risk Metrics: {inflation_metrics}");
    generate_alerts("inflation", &inflation_metrics, &alert_config);

    let index_metrics = calculate_risk_metrics(&index_data);
    println!("Index Risk Metrics: {index_metrics}");
    generate_alerts("index", &index_metrics, &alert_config);

    Ok(())
}

async fn fetch_stream(
    client: &TnClient,
    stream: &str,
    provider: Address,
    range: RecordRange,
) -> Result<Vec<ProcessedRecord>, String> {
    let stream_id = StreamId::from_name_or_id(stream);
    info!(stream = %stream_id, provider = %provider, "Fetching stream");
    let reader = client.load_primitive_stream(StreamLocator::new(stream_id.clone(), provider));
    fetch_processed(&reader, range)
        .await
        .map_err(|e| format!("Failed to fetch records for stream {stream_id}: {e}"))
}
