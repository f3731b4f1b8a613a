mod classifier;
mod config;
mod data;
mod engine;
mod indicators;
mod types;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::BotConfig;
use engine::{PaperExecutor, TradingEngine};
use types::{Candle, Direction, TradeSignal};

#[derive(Parser)]
#[command(name = "lorentzian-bot")]
#[command(version = "0.1.0")]
#[command(about = "Lorentzian k-NN regime classifier over bar data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the classifier over a synthetic candle series
    Run {
        /// Number of candles to generate
        #[arg(short, long, default_value = "4000")]
        bars: usize,

        /// Seed for the synthetic random walk
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write the emitted signals to a JSON lines file
        #[arg(short, long)]
        export: Option<String>,
    },
    /// Validate the configuration file and exit
    CheckConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Run { bars, seed, export } => run(config, bars, seed, export.as_deref()),
        Commands::CheckConfig => {
            config
                .validate()
                .map_err(|errors| anyhow!("invalid config:\n  {}", errors.join("\n  ")))?;
            info!("configuration is valid");
            Ok(())
        }
    }
}

fn load_config(path: &str) -> Result<BotConfig> {
    if Path::new(path).exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {path}"))?;
        let config: BotConfig =
            toml::from_str(&raw).with_context(|| format!("failed to parse {path}"))?;
        info!("loaded configuration from {path}");
        Ok(config)
    } else {
        info!("no config file at {path}, using defaults");
        Ok(BotConfig::default())
    }
}

#[derive(Serialize)]
struct SignalRecord {
    bar: usize,
    #[serde(flatten)]
    signal: TradeSignal,
}

fn run(config: BotConfig, bars: usize, seed: u64, export: Option<&str>) -> Result<()> {
    let warmup = config.classifier.max_bars_back;
    info!(
        "running {} bars (seed {}), evaluation starts after {} classified bars",
        bars, seed, warmup
    );

    let mut engine = TradingEngine::new(config, PaperExecutor::new())?;
    let mut records = Vec::new();
    let mut longs = 0usize;
    let mut shorts = 0usize;

    for (bar, candle) in generate_candles(bars, seed).iter().enumerate() {
        if let Some(signal) = engine.on_candle(candle) {
            match signal.direction {
                Direction::Long => longs += 1,
                Direction::Short => shorts += 1,
                Direction::Neutral => {}
            }
            records.push(SignalRecord { bar, signal });
        }
    }

    info!(
        "classified {} bars: {} long signals, {} short signals, {} fills",
        engine.bars_classified(),
        longs,
        shorts,
        engine.executor().fills().len()
    );

    if let Some(path) = export {
        let mut out = String::new();
        for record in &records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        std::fs::write(path, out).with_context(|| format!("failed to write {path}"))?;
        info!("wrote {} signal records to {}", records.len(), path);
    }

    Ok(())
}

/// Seeded random walk with a slow drift cycle, so both regimes appear
fn generate_candles(bars: usize, seed: u64) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut candles = Vec::with_capacity(bars);
    let mut price = 1.2000_f64;
    let start = Utc::now() - Duration::minutes(bars as i64);

    for i in 0..bars {
        let drift = (i as f64 / 300.0).sin() * 0.0004;
        let noise: f64 = rng.gen_range(-0.0010..0.0010);
        let open = price;
        price = (price + drift + noise).max(0.0001);
        let close = price;
        let high = open.max(close) + rng.gen_range(0.0..0.0005);
        let low = open.min(close) - rng.gen_range(0.0..0.0005);

        candles.push(Candle {
            open_time: start + Duration::minutes(i as i64),
            open: decimal(open),
            high: decimal(high),
            low: decimal(low),
            close: decimal(close),
            volume: dec!(1000),
        });
    }
    candles
}

fn decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}
