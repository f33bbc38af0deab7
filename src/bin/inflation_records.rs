//! Print one month of records from a stream owned by the signing key.
//!
//! Usage:
//!   cargo run --bin inflation_records
//!   cargo run --bin inflation_records -- --stream TRUUK --year 2023 --month 1
//!
//! Reads PRIVATE_KEY (required) and PROVIDER_URL (optional, defaults to staging)
//! from the environment or a `.env` file.

use clap::Parser;
use tracing::{error, info};

use tn_stream_sdk::{
    logging::setup_logging, AppConfig, BaseUrl, GetRecordInput, LogFormat, RecordRange, StreamId,
    TnClient,
};

#[derive(Parser)]
#[command(name = "inflation_records")]
#[command(version, about = "Print a month of records from your own stream", long_about = None)]
struct Cli {
    /// Stream name (hashed into an id) or an existing stream id
    #[arg(long, default_value = "TRUUK")]
    stream: String,

    /// Calendar year to fetch
    #[arg(long, default_value_t = 2023)]
    year: i32,

    /// Calendar month to fetch (1-12)
    #[arg(long, default_value_t = 1)]
    month: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    setup_logging(&cli.log_level, LogFormat::Pretty);

    if let Err(e) = run(&cli).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::default();
    config.apply_env();

    let signer = config
        .signer()
        .map_err(|e| format!("Failed to create private key: {e}"))?;
    let client = TnClient::new(config.base_url_or(BaseUrl::Staging)?, signer, None);

    let stream_id = StreamId::from_name_or_id(&cli.stream);
    let locator = client.own_stream_locator(stream_id);
    let actions = client.load_primitive_actions();

    let range = RecordRange::month_timestamps(cli.year, cli.month)?;
    info!(stream = %locator, range = %range, "Fetching inflation data");

    let records = actions
        .get_record(GetRecordInput::new(locator, range))
        .await
        .map_err(|e| format!("Failed to fetch inflation data: {e}"))?;

    println!("Inflation Data:");
    for record in &records {
        println!("{record}");
    }
    Ok(())
}
