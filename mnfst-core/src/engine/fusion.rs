//! Signal fusion: combines session, band, OBV and CEI readings into a trigger.
//!
//! Two policies read the same `IndicatorSnapshot`:
//!
//! - **Live**: session active, price in the live band's ACTIVE zone, CEI slope
//!   rising and un-lagged OBV slope up → LONG (falling/down → SHORT).
//! - **Historical**: session active, gate open, lagged OBV slope up and a
//!   positive CEI inversion between two and one bars back → LONG
//!   (down + negative inversion → SHORT).
//!
//! They are deliberately different and can disagree on the same bar. The
//! historical policy reacts one bar later and triggers on an inversion rather
//! than on a slope sign.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{
    BandLocation, CeiState, GateStatus, Inversion, SlopeMode, SlopeStatus, Trigger,
};
use crate::indicators::{BandReading, CeiReading, ObvReading};

/// All indicator readings for one bar, after every indicator has been updated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
    pub session_active: bool,
    /// Band on the gate's own window.
    pub band: BandReading,
    /// Band the live policy reads; equals `band` unless a separate window is configured.
    pub live_band: BandReading,
    pub obv: ObvReading,
    pub cei: CeiReading,
}

impl IndicatorSnapshot {
    pub fn gate_status(&self) -> GateStatus {
        self.band.gate_status(self.session_active)
    }

    pub fn obv_status(&self, mode: SlopeMode) -> SlopeStatus {
        self.obv.status(mode, self.session_active)
    }

    pub fn cei_state(&self) -> CeiState {
        self.cei.state(self.session_active)
    }
}

/// Maps a snapshot to a composite trigger.
///
/// Policies are pure: the same snapshot always yields the same trigger, and
/// nothing outside the snapshot is visible to them.
pub trait FusionPolicy: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(&self, snapshot: &IndicatorSnapshot) -> Trigger;
}

/// Actionable trigger for the bar that just closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LivePolicy;

impl FusionPolicy for LivePolicy {
    fn name(&self) -> &str {
        "live"
    }

    fn evaluate(&self, s: &IndicatorSnapshot) -> Trigger {
        if !s.session_active || s.live_band.location() != BandLocation::Active {
            return Trigger::None;
        }
        match (s.cei.direction(), s.obv.direction(SlopeMode::Live)) {
            (CeiState::Rising, SlopeStatus::Up) => Trigger::Long,
            (CeiState::Falling, SlopeStatus::Down) => Trigger::Short,
            _ => Trigger::None,
        }
    }
}

/// Retroactive annotation of closed bars.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoricalPolicy;

impl FusionPolicy for HistoricalPolicy {
    fn name(&self) -> &str {
        "historical"
    }

    fn evaluate(&self, s: &IndicatorSnapshot) -> Trigger {
        if s.gate_status() != GateStatus::GateOpen {
            return Trigger::None;
        }
        match (s.obv_status(SlopeMode::Lagged), s.cei.inversion()) {
            (SlopeStatus::Up, Inversion::Positive) => Trigger::Long,
            (SlopeStatus::Down, Inversion::Negative) => Trigger::Short,
            _ => Trigger::None,
        }
    }
}
