//! CEI detector: accumulated price-vs-VWAP efficiency and its sign inversions.
//!
//! Per-bar efficiency:
//!   eff[0] = ((close[0] − vwap[0]) − (close[1] − vwap[1])) / max(1, volume[0])
//!
//! Slope: Σ eff[i] for i in 0..lookback, minus eff[min(lookback, bar_index)].
//! The subtracted term is the sample just past the window once enough bars
//! exist, and the oldest sample before that.
//!
//! Inversion compares eff[2] against eff[1], one bar behind the slope.
//!
//! The first bar has no previous displacement; its efficiency is zero.

use serde::{Deserialize, Serialize};

use super::window::RollingWindow;
use crate::domain::{CeiState, Inversion};

/// Efficiency samples `[eff[0], eff[1], eff[2]]` plus the accumulated slope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CeiReading {
    pub efficiency: [f64; 3],
    pub slope: f64,
}

impl CeiReading {
    /// Sign of the slope, ignoring the session.
    pub fn direction(&self) -> CeiState {
        if self.slope > 0.0 {
            CeiState::Rising
        } else if self.slope < 0.0 {
            CeiState::Falling
        } else {
            CeiState::Flat
        }
    }

    pub fn state(&self, session_active: bool) -> CeiState {
        if !session_active {
            return CeiState::Wait;
        }
        self.direction()
    }

    /// Sign flip from two bars back to one bar back. Zero on either side is no flip.
    pub fn inversion(&self) -> Inversion {
        let (prev, now) = (self.efficiency[2], self.efficiency[1]);
        if prev < 0.0 && now > 0.0 {
            Inversion::Positive
        } else if prev > 0.0 && now < 0.0 {
            Inversion::Negative
        } else {
            Inversion::None
        }
    }
}

/// Efficiency of one bar given its own and the previous bar's displacement from VWAP.
pub fn efficiency(displacement: f64, prev_displacement: f64, volume: f64) -> f64 {
    (displacement - prev_displacement) / volume.max(1.0)
}

#[derive(Debug, Clone)]
pub struct CeiDetector {
    lookback: usize,
    bars_seen: usize,
    prev_displacement: Option<f64>,
    effs: RollingWindow<f64>,
}

impl CeiDetector {
    pub fn new(lookback: usize) -> Self {
        assert!(lookback >= 1, "CEI lookback must be >= 1");
        Self {
            lookback,
            bars_seen: 0,
            prev_displacement: None,
            // eff[lookback] plus at least eff[0..=2] for the inversion
            effs: RollingWindow::new((lookback + 1).max(3)),
        }
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Append one bar using the VWAP computed for that same bar.
    pub fn update(&mut self, close: f64, vwap: f64, volume: f64) -> Option<CeiReading> {
        let displacement = close - vwap;
        let eff = match self.prev_displacement {
            Some(prev) => efficiency(displacement, prev, volume),
            None => 0.0,
        };
        self.effs.push(eff);
        self.prev_displacement = Some(displacement);

        let bar_index = self.bars_seen;
        self.bars_seen += 1;

        let cumulative: f64 = self.effs.recent(self.lookback).sum();
        let trailing = self.effs.get(self.lookback.min(bar_index))?;

        Some(CeiReading {
            efficiency: [self.effs.get(0)?, self.effs.get(1)?, self.effs.get(2)?],
            slope: cumulative - trailing,
        })
    }
}
