//! Signal engine: rolling indicator state, fusion policies, and the record arena.
//!
//! Per bar, data flows one way:
//! bar → session / VWAP band / OBV / CEI updates → snapshot → live and
//! historical policies → `SignalRecord` appended under the bar's index.

pub mod arena;
pub mod fusion;
pub mod state;
pub mod warmup;

pub use arena::RecordArena;
pub use fusion::{FusionPolicy, HistoricalPolicy, IndicatorSnapshot, LivePolicy};
pub use state::SignalEngine;
pub use warmup::WarmupState;

use crate::config::{ConfigError, SignalConfig};
use crate::domain::{Bar, SignalRecord};

/// Run a fresh engine over `bars` and collect every record it produces.
///
/// Retention is ignored here; the full record stream is returned.
pub fn replay(bars: &[Bar], config: &SignalConfig) -> Result<Vec<SignalRecord>, ConfigError> {
    let mut engine = SignalEngine::new(SignalConfig {
        record_retention: None,
        ..config.clone()
    })?;
    for bar in bars {
        engine.on_bar(bar);
    }
    Ok(engine.into_records().into_vec())
}
