//! Parameter set for one tracked instrument.
//!
//! A `SignalConfig` is fixed for the lifetime of a `SignalEngine`. Two engines
//! with the same config and the same bar sequence produce identical records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::SessionWindow;

/// Default VWAP / stddev window.
pub const DEFAULT_VWAP_LOOKBACK: usize = 34;
/// Default OBV EMA period.
pub const DEFAULT_OBV_EMA_PERIOD: usize = 34;
/// Default CEI accumulation window.
pub const DEFAULT_CEI_LOOKBACK: usize = 21;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be > 0")]
    ZeroLookback { field: &'static str },

    #[error("invalid HHMM session time: {0}")]
    InvalidSessionTime(u32),

    #[error("session start {start} is after session end {end}")]
    EmptySession { start: u32, end: u32 },
}

/// Content hash of a parameter set (BLAKE3 over canonical JSON).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamSetId(pub String);

impl ParamSetId {
    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ParamSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Window for VWAP and the close-price standard deviation.
    pub vwap_lookback: usize,
    /// EMA period applied to the OBV series.
    pub obv_ema_period: usize,
    /// Window over which CEI efficiency samples are accumulated.
    pub cei_lookback: usize,
    pub session: SessionWindow,
    /// Independent band window for the live policy. `None` reuses the gate's band.
    pub live_band_lookback: Option<usize>,
    /// How many output records to keep. Never less than the required history.
    pub record_retention: Option<usize>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            vwap_lookback: DEFAULT_VWAP_LOOKBACK,
            obv_ema_period: DEFAULT_OBV_EMA_PERIOD,
            cei_lookback: DEFAULT_CEI_LOOKBACK,
            session: SessionWindow::default(),
            live_band_lookback: None,
            record_retention: None,
        }
    }
}

impl SignalConfig {
    /// Single-lookback parameter set: every window uses `lookback`.
    pub fn panel(lookback: usize) -> Self {
        Self {
            vwap_lookback: lookback,
            obv_ema_period: lookback,
            cei_lookback: lookback,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let lookbacks = [
            ("vwap_lookback", Some(self.vwap_lookback)),
            ("obv_ema_period", Some(self.obv_ema_period)),
            ("cei_lookback", Some(self.cei_lookback)),
            ("live_band_lookback", self.live_band_lookback),
        ];
        for (field, value) in lookbacks {
            if value == Some(0) {
                return Err(ConfigError::ZeroLookback { field });
            }
        }
        self.session.validate()
    }

    /// Window actually used by the live policy's band.
    pub fn effective_live_band_lookback(&self) -> usize {
        self.live_band_lookback.unwrap_or(self.vwap_lookback)
    }

    /// Largest window any indicator reads.
    pub fn max_lookback(&self) -> usize {
        self.vwap_lookback
            .max(self.obv_ema_period)
            .max(self.cei_lookback)
            .max(self.effective_live_band_lookback())
    }

    /// First bar index that produces an output record.
    ///
    /// Two extra bars cover the lagged EMA comparison and the CEI inversion,
    /// which both read two bars back.
    pub fn required_history(&self) -> usize {
        self.max_lookback() + 2
    }

    /// Effective arena retention.
    pub fn retention(&self) -> Option<usize> {
        self.record_retention
            .map(|r| r.max(self.required_history()))
    }

    /// Deterministic content hash. Equal configs always share an id.
    pub fn fingerprint(&self) -> ParamSetId {
        // Serializing a struct of integers and options cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        ParamSetId(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = SignalConfig::default();
        assert_eq!(cfg.vwap_lookback, 34);
        assert_eq!(cfg.obv_ema_period, 34);
        assert_eq!(cfg.cei_lookback, 21);
        assert_eq!(cfg.session, SessionWindow::new(745, 1100).unwrap());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn required_history_is_max_lookback_plus_two() {
        let cfg = SignalConfig {
            vwap_lookback: 10,
            obv_ema_period: 20,
            cei_lookback: 5,
            ..SignalConfig::default()
        };
        assert_eq!(cfg.max_lookback(), 20);
        assert_eq!(cfg.required_history(), 22);
    }

    #[test]
    fn live_band_lookback_counts_toward_history() {
        let cfg = SignalConfig {
            live_band_lookback: Some(50),
            ..SignalConfig::panel(10)
        };
        assert_eq!(cfg.effective_live_band_lookback(), 50);
        assert_eq!(cfg.required_history(), 52);
    }

    #[test]
    fn panel_uses_single_lookback() {
        let cfg = SignalConfig::panel(12);
        assert_eq!(cfg.vwap_lookback, 12);
        assert_eq!(cfg.obv_ema_period, 12);
        assert_eq!(cfg.cei_lookback, 12);
        assert_eq!(cfg.effective_live_band_lookback(), 12);
    }

    #[test]
    fn zero_lookback_rejected() {
        let cfg = SignalConfig {
            cei_lookback: 0,
            ..SignalConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroLookback {
                field: "cei_lookback"
            })
        );

        let cfg = SignalConfig {
            live_band_lookback: Some(0),
            ..SignalConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn retention_never_below_required_history() {
        let cfg = SignalConfig {
            record_retention: Some(3),
            ..SignalConfig::panel(10)
        };
        assert_eq!(cfg.retention(), Some(12));
        assert_eq!(SignalConfig::default().retention(), None);
    }

    #[test]
    fn fingerprint_is_deterministic_and_parameter_sensitive() {
        let a = SignalConfig::default();
        let b = SignalConfig::default();
        let c = SignalConfig::panel(34);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().0.len(), 64);
        assert_eq!(a.fingerprint().short().len(), 12);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: SignalConfig = toml::from_str("cei_lookback = 8\n").unwrap();
        assert_eq!(cfg.cei_lookback, 8);
        assert_eq!(cfg.vwap_lookback, DEFAULT_VWAP_LOOKBACK);
        assert_eq!(cfg.session, SessionWindow::default());
    }

    #[test]
    fn session_table_in_toml() {
        let cfg: SignalConfig = toml::from_str(
            "vwap_lookback = 20\n[session]\nstart = 930\nend = 1130\n",
        )
        .unwrap();
        assert_eq!(cfg.session.start, 930);
        assert_eq!(cfg.session.end, 1130);
    }
}
