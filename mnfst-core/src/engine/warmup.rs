//! Warmup tracking.
//!
//! Indicators update from the very first bar, but no bar is classified until
//! its index reaches the required history (max lookback + 2).

use crate::config::SignalConfig;

/// Warmup state tracker
#[derive(Debug, Clone)]
pub struct WarmupState {
    required_history: usize,
    bars_processed: usize,
}

impl WarmupState {
    pub fn new(required_history: usize) -> Self {
        Self {
            required_history,
            bars_processed: 0,
        }
    }

    pub fn from_config(config: &SignalConfig) -> Self {
        Self::new(config.required_history())
    }

    /// Count one bar and return its index.
    pub fn process_bar(&mut self) -> usize {
        let index = self.bars_processed;
        self.bars_processed += 1;
        index
    }

    /// True once the most recently processed bar may be classified.
    pub fn is_warm(&self) -> bool {
        self.bars_processed > self.required_history
    }

    /// Bars still to process before the first classified bar.
    pub fn bars_until_warm(&self) -> usize {
        (self.required_history + 1).saturating_sub(self.bars_processed)
    }

    pub fn bars_processed(&self) -> usize {
        self.bars_processed
    }

    pub fn required_history(&self) -> usize {
        self.required_history
    }
}
