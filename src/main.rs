use anyhow::Context;
use clap::{Parser, ValueEnum};
use gex_profile::Error;
use gex_profile::chain::{PolygonClient, Ticker};
use gex_profile::config::Config;
use gex_profile::exposure::DEFAULT_TOP_STRIKES;
use gex_profile::pipeline::{GexPipeline, GexRequest};
use gex_profile::report::{DEFAULT_BAR_WIDTH, GexReport, TextReport};
use rust_decimal::Decimal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Gamma exposure by strike for an options chain, with the king node
/// (strongest dealer magnet) highlighted.
#[derive(Parser)]
#[command(name = "gex-profile", version, about)]
struct Cli {
    /// Underlying ticker (SPY, QQQ, IWM, AAPL, TSLA, NVDA, AMD, META, GOOGL,
    /// MSFT, AMZN, SMH, HOOD, COIN)
    #[arg(long, short = 't', default_value = "SPY")]
    ticker: Ticker,

    /// Current price of the underlying (default: GEX_DEFAULT_SPOT or 585.0)
    #[arg(long, short = 's')]
    spot: Option<Decimal>,

    /// Polygon.io API key (default: POLYGON_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Number of strikes in the summary table
    #[arg(long, default_value_t = DEFAULT_TOP_STRIKES)]
    top: usize,

    /// Width of the largest chart bar, in characters
    #[arg(long, default_value_t = DEFAULT_BAR_WIDTH)]
    width: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("loading configuration")?;

    let request = GexRequest::new(
        cli.ticker,
        cli.spot.unwrap_or(config.default_spot),
        cli.api_key.or_else(|| config.api_key.clone()),
    );

    let source = PolygonClient::new(&config.base_url, config.contract_limit)
        .context("building market data client")?;
    let pipeline = GexPipeline::with_config(source, &config);

    let profile = match pipeline.run(&request) {
        Ok(profile) => profile,
        Err(Error::MissingApiKey) => {
            eprintln!(
                "Paste your Polygon.io API key (--api-key or POLYGON_API_KEY) to unlock real data"
            );
            return Ok(ExitCode::from(2));
        }
        Err(Error::NoData { .. }) => {
            eprintln!("No data – double-check your Polygon key");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context(format!("computing GEX profile for {}", cli.ticker)),
    };

    let report = GexReport::new(&profile, cli.top);
    match cli.format {
        OutputFormat::Text => print!("{}", TextReport::new(&report, cli.width)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(ExitCode::SUCCESS)
}
