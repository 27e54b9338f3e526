//! Live tracking of many instruments and parameter sets.
//!
//! Each (instrument, parameter set) pair owns an independent `SignalEngine`;
//! no state is shared between pairs. The tracker is the ingestion boundary for
//! streaming bars, so it rejects out-of-order bars before they reach an engine.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

use mnfst_core::domain::{Bar, SignalRecord};
use mnfst_core::{ConfigError, ParamSetId, SignalConfig, SignalEngine};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackerKey {
    pub symbol: String,
    pub param_set: ParamSetId,
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("no open session for '{symbol}' / {param_set}")]
    NotOpen { symbol: String, param_set: String },

    #[error("'{symbol}' bar at {timestamp} is not after the previous bar at {previous}")]
    OutOfOrder {
        symbol: String,
        previous: NaiveDateTime,
        timestamp: NaiveDateTime,
    },
}

#[derive(Debug)]
struct Session {
    engine: SignalEngine,
    last_timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Default)]
pub struct Tracker {
    sessions: HashMap<TrackerKey, Session>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `symbol` under `config`. Reopening an existing pair
    /// keeps its state and returns the same key.
    pub fn open(&mut self, symbol: &str, config: SignalConfig) -> Result<TrackerKey, TrackerError> {
        let key = TrackerKey {
            symbol: symbol.to_string(),
            param_set: config.fingerprint(),
        };
        if !self.sessions.contains_key(&key) {
            let engine = SignalEngine::new(config)?;
            debug!(symbol, param_set = key.param_set.short(), "tracking opened");
            self.sessions.insert(
                key.clone(),
                Session {
                    engine,
                    last_timestamp: None,
                },
            );
        }
        Ok(key)
    }

    /// Feed the next closed bar for one pair.
    ///
    /// Returns the bar's record, or `None` while that engine is warming up.
    pub fn on_bar(
        &mut self,
        key: &TrackerKey,
        bar: &Bar,
    ) -> Result<Option<&SignalRecord>, TrackerError> {
        let session = self
            .sessions
            .get_mut(key)
            .ok_or_else(|| TrackerError::NotOpen {
                symbol: key.symbol.clone(),
                param_set: key.param_set.to_string(),
            })?;

        if let Some(previous) = session.last_timestamp {
            if bar.timestamp <= previous {
                warn!(symbol = %key.symbol, timestamp = %bar.timestamp, "out-of-order bar dropped");
                return Err(TrackerError::OutOfOrder {
                    symbol: key.symbol.clone(),
                    previous,
                    timestamp: bar.timestamp,
                });
            }
        }
        session.last_timestamp = Some(bar.timestamp);
        Ok(session.engine.on_bar(bar))
    }

    /// Record for `bar_index` of one pair, if classified and retained.
    pub fn record(&self, key: &TrackerKey, bar_index: usize) -> Option<&SignalRecord> {
        self.sessions.get(key)?.engine.record(bar_index)
    }

    pub fn engine(&self, key: &TrackerKey) -> Option<&SignalEngine> {
        self.sessions.get(key).map(|s| &s.engine)
    }

    /// Stop tracking a pair and hand back its engine.
    pub fn close(&mut self, key: &TrackerKey) -> Option<SignalEngine> {
        let session = self.sessions.remove(key)?;
        debug!(
            symbol = %key.symbol,
            bars = session.engine.bars_seen(),
            "tracking closed"
        );
        Some(session.engine)
    }

    pub fn keys(&self) -> impl Iterator<Item = &TrackerKey> {
        self.sessions.keys()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
