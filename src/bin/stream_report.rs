//! Report on any set of provider streams over a date window.
//!
//! Usage:
//!   cargo run --bin stream_report -- --stream st15889445eac65d03159da7c882a895
//!   cargo run --bin stream_report -- --stream cpi --stream st1588... --from 2023-02-01 --to 2023-02-28
//!   cargo run --bin stream_report -- health
//!
//! Exit status is 1 on any failure and 2 when `--fail-on-alert` is set and an alert fired.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use tn_stream_sdk::{
    calculate_risk_metrics, fetch_processed, generate_alerts, logging::setup_logging, AppConfig,
    BaseUrl, LogFormat, RecordRange, StreamId, StreamLocator, TnClient,
};

#[derive(Parser)]
#[command(name = "stream_report")]
#[command(version, about = "Print records and VaR for TRUF Network streams", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "tn.toml")]
    config: PathBuf,

    /// Stream id or name; repeat for several streams
    #[arg(long = "stream")]
    streams: Vec<String>,

    /// Data provider address (overrides PROVIDER_ADDRESS)
    #[arg(long)]
    provider: Option<String>,

    /// Network or gateway URL (overrides PROVIDER_URL)
    #[arg(long)]
    network: Option<String>,

    /// Private key (overrides config and env var)
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// First day of the window (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the window (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Alert when a stream's VaR is above this value
    #[arg(long)]
    threshold: Option<f64>,

    /// Exit with status 2 if any alert fired
    #[arg(long)]
    fail_on_alert: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output format for logs
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the gateway's health and exit
    Health,
    /// Print the merged configuration (private key redacted)
    ShowConfig,
    /// Fetch and report on streams (default)
    Report,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    setup_logging(
        cli.log_level.as_deref().unwrap_or(&config.logging.level),
        cli.log_format.unwrap_or(config.logging.format),
    );

    let result = match cli.command {
        Some(Commands::ShowConfig) => {
            println!("{config:#?}");
            Ok(0)
        }
        Some(Commands::Health) => health(&config).await,
        Some(Commands::Report) | None => report(&cli, &config).await,
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}

/// File, then environment, then CLI flags.
fn load_config(cli: &Cli) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load(Some(cli.config.as_path()))?;
    config.apply_env();

    if let Some(key) = &cli.private_key {
        config.network.private_key = Some(key.clone());
    }
    if let Some(network) = &cli.network {
        config.network.base_url = Some(network.clone());
    }
    if let Some(provider) = &cli.provider {
        config.network.provider_address = Some(provider.clone());
    }
    if let Some(from) = cli.from {
        config.query.from = from;
    }
    if let Some(to) = cli.to {
        config.query.to = to;
    }
    if let Some(threshold) = cli.threshold {
        config.alerts.threshold = threshold;
    }
    Ok(config)
}

fn connect(config: &AppConfig) -> Result<TnClient, Box<dyn std::error::Error>> {
    let signer = config.signer()?;
    let base_url = config.base_url_or(BaseUrl::Staging)?;
    Ok(TnClient::new(base_url, signer, None))
}

async fn health(config: &AppConfig) -> Result<i32, Box<dyn std::error::Error>> {
    let client = connect(config)?;
    let health = client
        .health()
        .await
        .map_err(|e| format!("Node health check failed: {e}"))?;
    println!(
        "Node health: healthy={} version={} block_height={}",
        health.healthy, health.version, health.block_height
    );
    Ok(if health.healthy { 0 } else { 1 })
}

async fn report(cli: &Cli, config: &AppConfig) -> Result<i32, Box<dyn std::error::Error>> {
    if cli.streams.is_empty() {
        return Err("No streams given. Pass at least one --stream".into());
    }
    let client = connect(config)?;
    let provider = config.provider_address()?;
    let range: RecordRange = config.query_range()?;
    let alert_config = config.alert_config();

    let mut alerts = 0usize;
    for stream in &cli.streams {
        let stream_id = StreamId::from_name_or_id(stream);
        if stream_id.as_str() != stream {
            warn!(name = %stream, stream_id = %stream_id, "Not a stream id, using generated id");
        }
        info!(stream = %stream_id, provider = %provider, range = %range, "Fetching stream");

        let reader = client.load_primitive_stream(StreamLocator::new(stream_id.clone(), provider));
        let data = fetch_processed(&reader, range)
            .await
            .map_err(|e| format!("Failed to fetch records for stream {stream_id}: {e}"))?;

        println!("{stream_id} Data:");
        for record in &data {
            println!("{record}");
        }
        let metrics = calculate_risk_metrics(&data);
        println!("{stream_id} Risk Metrics: {metrics}");
        if generate_alerts(stream_id.as_str(), &metrics, &alert_config).is_some() {
            alerts += 1;
        }
    }

    info!(streams = cli.streams.len(), alerts, "Report complete");
    Ok(if cli.fail_on_alert && alerts > 0 { 2 } else { 0 })
}
