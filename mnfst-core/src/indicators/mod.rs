//! Rolling per-bar indicators.
//!
//! Each indicator owns its history exclusively and is updated exactly once per
//! bar, in arrival order. Updates return a small `Copy` reading that the
//! fusion policies classify; no indicator looks at bars it has not been fed.
//!
//! Window sums are recomputed from the retained samples on every bar rather
//! than maintained incrementally, so equal inputs give bit-equal sums and the
//! equality-based FLAT classifications stay exact.

pub mod cei;
pub mod obv_slope;
pub mod vwap_gate;
pub mod window;

pub use cei::{CeiDetector, CeiReading};
pub use obv_slope::{ObvReading, ObvSlope};
pub use vwap_gate::{BandReading, VwapGate};
pub use window::RollingWindow;

/// Create synthetic one-minute bars from close prices for testing.
///
/// Bars start at 08:00 (inside the default session), open = prev_close,
/// high/low = max/min(open, close) ± 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: start + chrono::Duration::minutes(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
