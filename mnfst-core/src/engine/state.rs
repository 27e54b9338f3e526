//! Per-instrument signal engine.
//!
//! One `SignalEngine` owns every piece of rolling state for one instrument and
//! one parameter set. Each call to `on_bar` updates all indicators exactly
//! once, then (after warmup) classifies the bar under both fusion policies and
//! appends the result to the record arena.

use tracing::{debug, trace};

use super::arena::RecordArena;
use super::fusion::{FusionPolicy, HistoricalPolicy, IndicatorSnapshot, LivePolicy};
use super::warmup::WarmupState;
use crate::config::{ConfigError, SignalConfig};
use crate::domain::{
    Bar, CeiState, GateStatus, RecordValues, SignalRecord, SlopeMode, SlopeStatus, Trigger,
};
use crate::indicators::{CeiDetector, ObvSlope, VwapGate};

#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: SignalConfig,
    warmup: WarmupState,
    gate: VwapGate,
    /// Separate band for the live policy, only when its window differs.
    live_band: Option<VwapGate>,
    obv: ObvSlope,
    cei: CeiDetector,
    live: LivePolicy,
    historical: HistoricalPolicy,
    records: RecordArena,
}

impl SignalEngine {
    pub fn new(config: SignalConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let live_lookback = config.effective_live_band_lookback();
        let live_band = (live_lookback != config.vwap_lookback).then(|| VwapGate::new(live_lookback));

        Ok(Self {
            warmup: WarmupState::from_config(&config),
            gate: VwapGate::new(config.vwap_lookback),
            live_band,
            obv: ObvSlope::new(config.obv_ema_period),
            cei: CeiDetector::new(config.cei_lookback),
            live: LivePolicy,
            historical: HistoricalPolicy,
            records: RecordArena::new(config.retention()),
            config,
        })
    }

    /// Feed the next closed bar.
    ///
    /// Bars must arrive in strictly increasing time order; ordering is the
    /// caller's contract and is not rechecked here. Returns the bar's record,
    /// or `None` while the engine is still warming up.
    pub fn on_bar(&mut self, bar: &Bar) -> Option<&SignalRecord> {
        let bar_index = self.warmup.process_bar();
        let session_active = self.config.session.is_active(bar.timestamp);

        let band = self.gate.update(bar.close, bar.volume);
        let live_band = match self.live_band.as_mut() {
            Some(gate) => gate.update(bar.close, bar.volume),
            None => band,
        };
        let obv = self.obv.update(bar.close, bar.volume);
        let cei = self.cei.update(bar.close, band.vwap, bar.volume);

        if !self.warmup.is_warm() {
            return None;
        }
        if bar_index == self.warmup.required_history() {
            debug!(bar_index, "signal engine warm");
        }

        let snapshot = IndicatorSnapshot {
            bar_index,
            timestamp: bar.timestamp,
            session_active,
            band,
            live_band,
            obv: obv?,
            cei: cei?,
        };
        let record = self.classify(&snapshot);

        trace!(
            bar_index,
            gate = %record.vwap_gate,
            obv = %record.obv_slope,
            cei = %record.cei_state,
            "bar classified"
        );
        if record.live_trigger.is_active() || record.historical_trigger.is_active() {
            debug!(
                bar_index,
                timestamp = %record.timestamp,
                live = %record.live_trigger,
                historical = %record.historical_trigger,
                "trigger"
            );
        }

        self.records.push(record);
        self.records.latest()
    }

    /// Build the record for one snapshot.
    ///
    /// Outside the session the gated statuses are WAIT and both triggers are
    /// NONE without consulting either policy.
    pub fn classify(&self, s: &IndicatorSnapshot) -> SignalRecord {
        let (vwap_gate, obv_slope, cei_state, live_trigger, historical_trigger) =
            if s.session_active {
                (
                    s.gate_status(),
                    s.obv_status(SlopeMode::Lagged),
                    s.cei_state(),
                    self.live.evaluate(s),
                    self.historical.evaluate(s),
                )
            } else {
                (
                    GateStatus::Wait,
                    SlopeStatus::Wait,
                    CeiState::Wait,
                    Trigger::None,
                    Trigger::None,
                )
            };

        SignalRecord {
            bar_index: s.bar_index,
            timestamp: s.timestamp,
            session_active: s.session_active,
            vwap_gate,
            vwap_location: s.live_band.location(),
            obv_slope,
            obv_live_slope: s.obv.direction(SlopeMode::Live),
            cei_state,
            cei_inversion: s.cei.inversion(),
            live_trigger,
            historical_trigger,
            values: RecordValues {
                close: s.band.price,
                vwap: s.band.vwap,
                stddev: s.band.stddev,
                obv: s.obv.obv,
                obv_ema: s.obv.ema[0],
                cei_efficiency: s.cei.efficiency[0],
                cei_slope: s.cei.slope,
            },
        }
    }

    /// Record for `bar_index`, if it was classified and is still retained.
    pub fn record(&self, bar_index: usize) -> Option<&SignalRecord> {
        self.records.get(bar_index)
    }

    pub fn latest(&self) -> Option<&SignalRecord> {
        self.records.latest()
    }

    pub fn records(&self) -> &RecordArena {
        &self.records
    }

    pub fn into_records(self) -> RecordArena {
        self.records
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn bars_seen(&self) -> usize {
        self.warmup.bars_processed()
    }

    /// Index of the first bar that gets a record.
    pub fn required_history(&self) -> usize {
        self.warmup.required_history()
    }

    pub fn is_warm(&self) -> bool {
        self.warmup.is_warm()
    }
}
