//! KalshiBot - Main Entry Point
//!
//! Polls the Kalshi market API on a fixed interval, sizes and books at most
//! one trade per cycle, and reports to the operator over Telegram.

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use kalshi_bot::config::{load_config, load_from_env};
use kalshi_bot::notify::build_notifier;
use kalshi_bot::{
    DecisionEngine, FirstMarketStrategy, KalshiRestClient, Scheduler, StrategyChain,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Read the flat KALSHI_*/TELEGRAM_*/BANKROLL environment variables instead of the config file
    #[arg(long)]
    env_only: bool,

    /// Run a single trading cycle and exit
    #[arg(long)]
    once: bool,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = if args.env_only {
        load_from_env()?
    } else {
        load_config(Some(&args.config))?
    };

    // Initialize logging
    let level = parse_level(args.log_level.as_deref().unwrap_or(config.settings.log_level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Kalshi Trading Bot");
    if !args.env_only {
        info!("Configuration file: {}", args.config);
    }

    let timeout = Duration::from_secs(config.settings.request_timeout_seconds);
    let source = KalshiRestClient::from_config(&config.kalshi, timeout)?;
    let notifier = build_notifier(&config)?;

    let engine = StrategyChain::new().with_engine(Box::new(FirstMarketStrategy::new()));
    info!("Decision engine: {} ({} strategies)", engine.name(), engine.len());

    let mut scheduler = Scheduler::new(
        Box::new(source),
        Box::new(engine),
        notifier,
        &config.trading,
    );

    if args.once {
        let outcome = scheduler.run_cycle().await?;
        info!("Cycle finished: {:?}", outcome);
        return Ok(());
    }

    let interval = Duration::from_secs(config.trading.trade_interval_seconds);
    tokio::select! {
        result = scheduler.run_forever(interval) => {
            if let Err(e) = result {
                error!("Trading loop stopped: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, cleaning up...");
        }
    }

    Ok(())
}
