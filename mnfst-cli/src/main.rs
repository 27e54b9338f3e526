//! MNFST CLI: replay bar files through the signal engine.
//!
//! Commands:
//! - `replay`: classify every bar of a CSV file and export the record stream
//! - `synthetic`: write a deterministic synthetic bar file for experiments

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mnfst_runner::{
    load_bars_csv, load_synthetic, render, replay_all, write_bars_csv, write_output,
    ExportFormat, RunConfig, SymbolReplay,
};

#[derive(Parser)]
#[command(
    name = "mnfst",
    about = "MNFST CLI: session-gated VWAP / OBV / CEI signal replay"
)]
struct Cli {
    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a CSV bar file and export one record per classified bar.
    Replay {
        /// CSV with columns symbol,timestamp,open,high,low,close,volume.
        #[arg(long)]
        bars: PathBuf,

        /// TOML run config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (csv or json). Overrides the config file.
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Only replay these symbols. Overrides the config file.
        #[arg(long = "symbol")]
        symbols: Vec<String>,
    },
    /// Generate synthetic one-minute bars as CSV.
    Synthetic {
        /// Symbols to generate.
        #[arg(long = "symbol", default_values_t = vec!["SYN".to_string()])]
        symbols: Vec<String>,

        /// Bars per symbol.
        #[arg(long, default_value_t = 390)]
        bars: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First bar timestamp (YYYY-MM-DD HH:MM).
        #[arg(long, default_value = "2024-01-02 07:30")]
        start: String,

        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match cli.command {
        Commands::Replay {
            bars,
            config,
            output,
            format,
            symbols,
        } => run_replay(bars, config, output, format, symbols),
        Commands::Synthetic {
            symbols,
            bars,
            seed,
            start,
            output,
        } => run_synthetic(symbols, bars, seed, &start, output),
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
///
/// Logs go to stderr so that stdout stays clean for exported records.
fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn run_replay(
    bars_path: PathBuf,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    symbols: Vec<String>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RunConfig::load(&path)?,
        None => RunConfig::default(),
    };
    if let Some(format) = format {
        config.format = format;
    }
    if !symbols.is_empty() {
        config.symbols = symbols;
    }

    let loaded = load_bars_csv(&bars_path)
        .with_context(|| format!("failed to load bars from {}", bars_path.display()))?;
    info!(
        symbols = loaded.bars.len(),
        bars = loaded.bar_count(),
        dataset = &loaded.dataset_hash[..12],
        run_id = &config.run_id()[..12],
        "bars loaded"
    );

    let results = replay_all(&loaded, &config)?;
    print_summary(&results);

    match output {
        Some(path) => {
            write_output(&results, config.format, &path)?;
            info!(path = %path.display(), format = %config.format, "records written");
        }
        None => print!("{}", render(&results, config.format)?),
    }

    Ok(())
}

fn run_synthetic(
    symbols: Vec<String>,
    count: usize,
    seed: u64,
    start: &str,
    output: PathBuf,
) -> Result<()> {
    let start = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M")
        .with_context(|| format!("invalid --start '{start}' (expected YYYY-MM-DD HH:MM)"))?;
    let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
    let data = load_synthetic(&refs, start, count, seed);
    write_bars_csv(&output, &data)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        path = %output.display(),
        symbols = refs.len(),
        bars = data.bar_count(),
        "synthetic bars written"
    );
    Ok(())
}

fn print_summary(results: &[SymbolReplay]) {
    eprintln!(
        "{:<10} {:>8} {:>8} {:>6} {:>6} {:>6} {:>6}",
        "symbol", "bars", "records", "L-lng", "L-sht", "H-lng", "H-sht"
    );
    for r in results {
        let t = &r.triggers;
        eprintln!(
            "{:<10} {:>8} {:>8} {:>6} {:>6} {:>6} {:>6}",
            r.symbol,
            r.bar_count,
            r.records.len(),
            t.live_long,
            t.live_short,
            t.historical_long,
            t.historical_short
        );
    }
}
