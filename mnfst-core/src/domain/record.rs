//! Per-bar output record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::status::{BandLocation, CeiState, GateStatus, Inversion, SlopeStatus, Trigger};

/// Everything the engine decided about one bar.
///
/// Records exist only for bars at or after the required history; earlier bars
/// have no record at all rather than a default one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
    pub session_active: bool,
    pub vwap_gate: GateStatus,
    /// Location on the live policy's band (not session-gated).
    pub vwap_location: BandLocation,
    /// Lagged OBV slope (`ema[1]` vs `ema[2]`).
    pub obv_slope: SlopeStatus,
    /// Un-lagged OBV slope (`ema[0]` vs `ema[1]`), not session-gated.
    pub obv_live_slope: SlopeStatus,
    pub cei_state: CeiState,
    pub cei_inversion: Inversion,
    pub live_trigger: Trigger,
    pub historical_trigger: Trigger,
    pub values: RecordValues,
}

/// Numeric readings behind the classifications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordValues {
    pub close: f64,
    pub vwap: f64,
    pub stddev: f64,
    pub obv: f64,
    pub obv_ema: f64,
    pub cei_efficiency: f64,
    pub cei_slope: f64,
}
