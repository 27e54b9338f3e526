//! VWAP distance gate: rolling VWAP with a close-price standard deviation band.
//!
//! VWAP = Σ(close·volume) / Σ(volume) over the last `lookback` bars, falling
//! back to the current close when the window carries no volume.
//! The band uses population stddev of close over the same window, computed
//! as sqrt(max(E[x²] − E[x]², 0)).
//!
//! Before the window fills, both statistics use the bars seen so far.

use serde::{Deserialize, Serialize};

use super::window::RollingWindow;
use crate::domain::{BandLocation, GateStatus};

/// One bar's band statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandReading {
    pub price: f64,
    pub vwap: f64,
    pub stddev: f64,
}

impl BandReading {
    /// Where `price` sits relative to VWAP ± 1σ and ± 2σ. All bounds are strict.
    pub fn location(&self) -> BandLocation {
        let (price, vwap, sd) = (self.price, self.vwap, self.stddev);
        let upper_active = price > vwap + sd && price < vwap + 2.0 * sd;
        let lower_active = price < vwap - sd && price > vwap - 2.0 * sd;
        if upper_active || lower_active {
            BandLocation::Active
        } else if price > vwap - sd && price < vwap + sd {
            BandLocation::Inside
        } else {
            BandLocation::Outside
        }
    }

    /// Gate classification. Outside the session this is always `Wait`.
    pub fn gate_status(&self, session_active: bool) -> GateStatus {
        if !session_active {
            return GateStatus::Wait;
        }
        match self.location() {
            BandLocation::Active => GateStatus::GateOpen,
            BandLocation::Inside | BandLocation::Outside => GateStatus::GateClosed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VwapGate {
    lookback: usize,
    /// (close, volume) per bar.
    bars: RollingWindow<(f64, f64)>,
}

impl VwapGate {
    pub fn new(lookback: usize) -> Self {
        assert!(lookback >= 1, "VWAP lookback must be >= 1");
        Self {
            lookback,
            bars: RollingWindow::new(lookback),
        }
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Append one bar and return its band statistics.
    pub fn update(&mut self, close: f64, volume: f64) -> BandReading {
        self.bars.push((close, volume));

        let mut pv = 0.0;
        let mut vv = 0.0;
        let mut sum = 0.0;
        let mut sum2 = 0.0;
        for (c, v) in self.bars.recent(self.lookback) {
            pv += c * v;
            vv += v;
            sum += c;
            sum2 += c * c;
        }

        let vwap = if vv == 0.0 { close } else { pv / vv };
        let n = self.bars.len() as f64;
        let mean = sum / n;
        let stddev = ((sum2 / n) - mean * mean).max(0.0).sqrt();

        BandReading {
            price: close,
            vwap,
            stddev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn feed(gate: &mut VwapGate, bars: &[(f64, f64)]) -> BandReading {
        let mut last = None;
        for &(c, v) in bars {
            last = Some(gate.update(c, v));
        }
        last.unwrap()
    }

    #[test]
    fn equal_volumes_reduce_to_sma() {
        let mut gate = VwapGate::new(3);
        let r = feed(&mut gate, &[(10.0, 5.0), (11.0, 5.0), (12.0, 5.0), (13.0, 5.0)]);
        // Window = 11, 12, 13
        assert_approx(r.vwap, 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn volume_weights_the_average() {
        let mut gate = VwapGate::new(2);
        let r = feed(&mut gate, &[(10.0, 1.0), (20.0, 3.0)]);
        // (10 + 60) / 4
        assert_approx(r.vwap, 17.5, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_volume_falls_back_to_close() {
        let mut gate = VwapGate::new(3);
        let r = feed(&mut gate, &[(10.0, 0.0), (11.0, 0.0), (12.5, 0.0)]);
        assert_eq!(r.vwap, 12.5);
    }

    #[test]
    fn population_stddev_of_close() {
        let mut gate = VwapGate::new(4);
        let r = feed(
            &mut gate,
            &[(2.0, 1.0), (4.0, 1.0), (4.0, 1.0), (6.0, 1.0)],
        );
        // mean 4, squared deviations 4 + 0 + 0 + 4 → variance 2
        assert_approx(r.stddev, 2.0_f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn partial_window_uses_bars_seen() {
        let mut gate = VwapGate::new(10);
        let r = feed(&mut gate, &[(10.0, 1.0), (14.0, 1.0)]);
        assert_approx(r.vwap, 12.0, DEFAULT_EPSILON);
        assert_approx(r.stddev, 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_close_has_zero_stddev_and_closed_gate() {
        let mut gate = VwapGate::new(5);
        let r = feed(&mut gate, &[(100.0, 1000.0); 8]);
        assert_eq!(r.stddev, 0.0);
        assert_eq!(r.location(), BandLocation::Outside);
        assert_eq!(r.gate_status(true), GateStatus::GateClosed);
    }

    #[test]
    fn window_slides() {
        let mut gate = VwapGate::new(1);
        gate.update(10.0, 1.0);
        gate.update(11.0, 1.0);
        let r = gate.update(12.0, 1.0);
        assert_eq!(r.vwap, 12.0);
        assert_eq!(r.stddev, 0.0);
    }

    #[test]
    fn location_bands() {
        let reading = |price| BandReading {
            price,
            vwap: 100.0,
            stddev: 2.0,
        };
        assert_eq!(reading(100.0).location(), BandLocation::Inside);
        assert_eq!(reading(101.9).location(), BandLocation::Inside);
        assert_eq!(reading(102.0).location(), BandLocation::Outside);
        assert_eq!(reading(103.0).location(), BandLocation::Active);
        assert_eq!(reading(97.0).location(), BandLocation::Active);
        assert_eq!(reading(104.0).location(), BandLocation::Outside);
        assert_eq!(reading(95.0).location(), BandLocation::Outside);
    }

    #[test]
    fn gate_waits_outside_session() {
        let r = BandReading {
            price: 103.0,
            vwap: 100.0,
            stddev: 2.0,
        };
        assert_eq!(r.gate_status(false), GateStatus::Wait);
        assert_eq!(r.gate_status(true), GateStatus::GateOpen);
    }
}
