//! Batch replay: runs one engine per instrument over loaded bars.
//!
//! Instruments are independent, so they replay in parallel on the rayon pool.
//! Within an instrument, bars are folded strictly in order on one thread.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use mnfst_core::domain::{Bar, SignalRecord, Trigger};
use mnfst_core::{ConfigError, ParamSetId, SignalConfig};

use crate::config::RunConfig;
use crate::data_loader::LoadedData;

/// Current schema version for persisted replay output.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("no loaded instrument matches the symbol filter {0:?}")]
    NoMatchingSymbols(Vec<String>),
}

/// Trigger counts for one instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCounts {
    pub live_long: usize,
    pub live_short: usize,
    pub historical_long: usize,
    pub historical_short: usize,
}

impl TriggerCounts {
    fn from_records(records: &[SignalRecord]) -> Self {
        let mut counts = Self::default();
        for r in records {
            match r.live_trigger {
                Trigger::Long => counts.live_long += 1,
                Trigger::Short => counts.live_short += 1,
                Trigger::None => {}
            }
            match r.historical_trigger {
                Trigger::Long => counts.historical_long += 1,
                Trigger::Short => counts.historical_short += 1,
                Trigger::None => {}
            }
        }
        counts
    }
}

/// Complete replay output for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolReplay {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub param_set: ParamSetId,
    pub bar_count: usize,
    /// Bars consumed before the first record.
    pub warmup_bars: usize,
    pub triggers: TriggerCounts,
    pub records: Vec<SignalRecord>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Replay a single instrument.
pub fn replay_symbol(
    symbol: &str,
    bars: &[Bar],
    config: &SignalConfig,
) -> Result<SymbolReplay, ConfigError> {
    let records = mnfst_core::replay(bars, config)?;
    let triggers = TriggerCounts::from_records(&records);
    info!(
        symbol,
        bars = bars.len(),
        records = records.len(),
        live_long = triggers.live_long,
        live_short = triggers.live_short,
        historical_long = triggers.historical_long,
        historical_short = triggers.historical_short,
        "replayed"
    );
    Ok(SymbolReplay {
        schema_version: SCHEMA_VERSION,
        symbol: symbol.to_string(),
        param_set: config.fingerprint(),
        bar_count: bars.len(),
        warmup_bars: config.required_history().min(bars.len()),
        triggers,
        records,
    })
}

/// Replay every instrument that passes the run's symbol filter.
///
/// Output is sorted by symbol regardless of scheduling order.
pub fn replay_all(data: &LoadedData, config: &RunConfig) -> Result<Vec<SymbolReplay>, RunError> {
    config.signal.validate()?;

    let selected: Vec<(&String, &Vec<Bar>)> = data
        .bars
        .iter()
        .filter(|(symbol, _)| config.includes(symbol))
        .collect();
    if selected.is_empty() {
        return Err(RunError::NoMatchingSymbols(config.symbols.clone()));
    }

    info!(
        symbols = selected.len(),
        param_set = config.signal.fingerprint().short(),
        synthetic = data.has_synthetic,
        "starting replay"
    );

    let results = selected
        .par_iter()
        .map(|(symbol, bars)| replay_symbol(symbol, bars, &config.signal))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}
