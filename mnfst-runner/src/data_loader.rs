//! Bar loading and ingestion for the runner.
//!
//! Reads intraday bars from CSV with columns
//! `symbol,timestamp,open,high,low,close,volume`, groups them by instrument and
//! validates each instrument's series before it reaches a signal engine:
//! 1. Every bar must pass `Bar::is_sane` (no NaN, high/low envelope, positive prices)
//! 2. Timestamps must be strictly increasing per instrument
//! 3. At least one bar must survive
//!
//! Rows may arrive interleaved across instruments; only per-instrument order
//! matters. Synthetic bars are a developer-only mode and are tagged as such.

use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use mnfst_core::domain::Bar;

/// Timestamp layouts accepted in the `timestamp` column.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unparseable timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("'{symbol}' bar {index} at {timestamp} is not after the previous bar at {previous}")]
    NonMonotonic {
        symbol: String,
        index: usize,
        previous: NaiveDateTime,
        timestamp: NaiveDateTime,
    },

    #[error("'{symbol}' bar {index} at {timestamp} failed OHLCV sanity checks")]
    InsaneBar {
        symbol: String,
        index: usize,
        timestamp: NaiveDateTime,
    },

    #[error("no bars in input")]
    Empty,
}

/// Result of loading bars, including provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Validated bars per instrument, in time order.
    pub bars: BTreeMap<String, Vec<Bar>>,
    /// Dataset hash for run fingerprinting (BLAKE3 over all bar data).
    pub dataset_hash: String,
    /// Whether any instrument used synthetic data.
    pub has_synthetic: bool,
}

impl LoadedData {
    pub fn bar_count(&self) -> usize {
        self.bars.values().map(Vec::len).sum()
    }

    fn from_bars(bars: BTreeMap<String, Vec<Bar>>, has_synthetic: bool) -> Self {
        let dataset_hash = compute_dataset_hash(&bars);
        Self {
            bars,
            dataset_hash,
            has_synthetic,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    symbol: String,
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Load and validate bars from a CSV file.
pub fn load_bars_csv(path: &Path) -> Result<LoadedData, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = read_bars_csv(file)?;
    debug!(
        path = %path.display(),
        symbols = loaded.bars.len(),
        bars = loaded.bar_count(),
        "loaded bars"
    );
    Ok(loaded)
}

/// Read and validate bars from any CSV source.
pub fn read_bars_csv<R: Read>(reader: R) -> Result<LoadedData, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut grouped: BTreeMap<String, Vec<Bar>> = BTreeMap::new();

    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        // Row 1 is the header.
        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| LoadError::BadTimestamp {
            row: i + 2,
            value: row.timestamp.clone(),
        })?;
        grouped.entry(row.symbol).or_default().push(Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    let mut validated = BTreeMap::new();
    for (symbol, bars) in grouped {
        let bars = ingest(&symbol, bars)?;
        validated.insert(symbol, bars);
    }
    if validated.is_empty() {
        return Err(LoadError::Empty);
    }

    Ok(LoadedData::from_bars(validated, false))
}

/// Validate one instrument's bar series for engine consumption.
pub fn ingest(symbol: &str, bars: Vec<Bar>) -> Result<Vec<Bar>, LoadError> {
    if bars.is_empty() {
        return Err(LoadError::Empty);
    }
    for (index, bar) in bars.iter().enumerate() {
        if !bar.is_sane() {
            warn!(symbol, index, timestamp = %bar.timestamp, "rejecting insane bar");
            return Err(LoadError::InsaneBar {
                symbol: symbol.to_string(),
                index,
                timestamp: bar.timestamp,
            });
        }
        if index > 0 {
            let previous = bars[index - 1].timestamp;
            if bar.timestamp <= previous {
                warn!(symbol, index, timestamp = %bar.timestamp, "rejecting out-of-order bar");
                return Err(LoadError::NonMonotonic {
                    symbol: symbol.to_string(),
                    index,
                    previous,
                    timestamp: bar.timestamp,
                });
            }
        }
    }
    Ok(bars)
}

/// Write bars in the same CSV layout `read_bars_csv` accepts.
pub fn write_bars_csv(path: &Path, data: &LoadedData) -> Result<(), LoadError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["symbol", "timestamp", "open", "high", "low", "close", "volume"])?;
    for (symbol, bars) in &data.bars {
        for b in bars {
            wtr.write_record([
                symbol.as_str(),
                &b.timestamp.format(TIMESTAMP_FORMATS[0]).to_string(),
                &b.open.to_string(),
                &b.high.to_string(),
                &b.low.to_string(),
                &b.close.to_string(),
                &b.volume.to_string(),
            ])?;
        }
    }
    wtr.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Synthetic bars for a set of instruments, wrapped as loaded data.
pub fn load_synthetic(symbols: &[&str], start: NaiveDateTime, count: usize, seed: u64) -> LoadedData {
    warn!(
        symbols = symbols.len(),
        "generating synthetic data; results will be tagged as synthetic"
    );
    let bars = symbols
        .iter()
        .map(|s| (s.to_string(), generate_synthetic_bars(s, start, count, seed)))
        .collect();
    LoadedData::from_bars(bars, true)
}

/// Compute a deterministic BLAKE3 hash over all bar data.
///
/// `BTreeMap` iteration is sorted, so the hash is independent of input row order
/// across instruments.
fn compute_dataset_hash(bars: &BTreeMap<String, Vec<Bar>>) -> String {
    let mut hasher = blake3::Hasher::new();

    for (symbol, series) in bars {
        hasher.update(symbol.as_bytes());
        for bar in series {
            hasher.update(bar.timestamp.to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
    }

    hasher.finalize().to_hex().to_string()
}

/// Generate one-minute synthetic bars for testing/development.
///
/// Random walk from 100.0, deterministic in `(symbol, seed)`.
pub fn generate_synthetic_bars(
    symbol: &str,
    start: NaiveDateTime,
    count: usize,
    seed: u64,
) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    hasher.update(&seed.to_le_bytes());
    let mut rng = StdRng::from_seed(*hasher.finalize().as_bytes());

    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;

    for i in 0..count {
        let ret: f64 = rng.gen_range(-0.002..0.002);
        let open = price;
        let close = (price * (1.0 + ret)).max(0.01);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.001));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.001));
        let volume = rng.gen_range(100..10_000u32) as f64;

        bars.push(Bar {
            timestamp: start + Duration::minutes(i as i64),
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }

    bars
}
