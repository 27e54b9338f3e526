//! OBV slope: direction of an exponentially smoothed on-balance-volume series.
//!
//! OBV[t] = OBV[t-1] ± volume[t] by the sign of close[t] − close[t-1].
//! EMA[t] = OBV[t] while t < period, then alpha·OBV[t] + (1 − alpha)·EMA[t-1]
//! with alpha = 2 / (period + 1).
//!
//! The first bar has no previous close and leaves OBV at zero.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::window::RollingWindow;
use crate::domain::{SlopeMode, SlopeStatus};

/// OBV and the three most recent EMA samples (`ema[0]` = current bar).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObvReading {
    pub obv: f64,
    pub ema: [f64; 3],
}

impl ObvReading {
    /// Slope direction under `mode`, ignoring the session.
    pub fn direction(&self, mode: SlopeMode) -> SlopeStatus {
        let k = mode.offset();
        match self.ema[k].partial_cmp(&self.ema[k + 1]) {
            Some(Ordering::Greater) => SlopeStatus::Up,
            Some(Ordering::Less) => SlopeStatus::Down,
            _ => SlopeStatus::Flat,
        }
    }

    pub fn status(&self, mode: SlopeMode, session_active: bool) -> SlopeStatus {
        if !session_active {
            return SlopeStatus::Wait;
        }
        self.direction(mode)
    }
}

#[derive(Debug, Clone)]
pub struct ObvSlope {
    period: usize,
    alpha: f64,
    bars_seen: usize,
    prev_close: Option<f64>,
    obv: f64,
    emas: RollingWindow<f64>,
}

impl ObvSlope {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "OBV EMA period must be >= 1");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            bars_seen: 0,
            prev_close: None,
            obv: 0.0,
            emas: RollingWindow::new(3),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Append one bar. Returns a reading once three EMA samples exist.
    pub fn update(&mut self, close: f64, volume: f64) -> Option<ObvReading> {
        if let Some(prev) = self.prev_close {
            let delta = close - prev;
            if delta > 0.0 {
                self.obv += volume;
            } else if delta < 0.0 {
                self.obv -= volume;
            }
        }

        let ema = if self.bars_seen < self.period {
            self.obv
        } else {
            // bars_seen >= period >= 1, so a previous EMA always exists
            let prev = self.emas.get(0).unwrap_or(self.obv);
            self.alpha * self.obv + (1.0 - self.alpha) * prev
        };

        self.emas.push(ema);
        self.prev_close = Some(close);
        self.bars_seen += 1;
        self.reading()
    }

    pub fn reading(&self) -> Option<ObvReading> {
        Some(ObvReading {
            obv: self.obv,
            ema: [self.emas.get(0)?, self.emas.get(1)?, self.emas.get(2)?],
        })
    }

    pub fn obv(&self) -> f64 {
        self.obv
    }
}
