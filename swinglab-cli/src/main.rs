//! SwingLab CLI — backtest commands.
//!
//! Commands:
//! - `backtest` — replay one or more daily-bar CSV files under a TOML run
//!   config and print the JSON results

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use swinglab_runner::{load_bars_csv, run_universe, RunConfig, SymbolBars};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "swinglab",
    about = "SwingLab CLI — EMA swing-trading decision engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay daily bars through the decision engine.
    Backtest {
        /// Daily-bar CSV files, one per symbol (date,open,high,low,close,volume).
        #[arg(required = true)]
        bars: Vec<PathBuf>,

        /// Path to a TOML run config. Defaults to backtest-mode defaults
        /// with the given capital.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Starting cash when no config file is given.
        #[arg(long, default_value_t = 10_000_000.0)]
        capital: f64,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Backtest {
            bars,
            config,
            capital,
            pretty,
        } => backtest(bars, config, capital, pretty),
    }
}

fn backtest(
    bar_files: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    capital: f64,
    pretty: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path.display()))?;
            RunConfig::from_toml(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RunConfig::with_capital(capital),
    };

    let mut universe = Vec::with_capacity(bar_files.len());
    for path in &bar_files {
        let bars = load_bars_csv(path)
            .with_context(|| format!("loading bars from {}", path.display()))?;
        let symbol = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        universe.push(SymbolBars { symbol, bars });
    }

    let results = run_universe(&universe, &config);
    if results.is_empty() {
        bail!("no symbol produced a result");
    }

    let json = if pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    println!("{json}");

    Ok(())
}
