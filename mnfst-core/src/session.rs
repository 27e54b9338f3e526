//! Session filter: restricts signals to a time-of-day window.
//!
//! Times are packed as `hour * 100 + minute` and compared against a closed
//! interval. The filter is stateless.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Default window start, 07:45.
pub const DEFAULT_SESSION_START: u32 = 745;
/// Default window end, 11:00.
pub const DEFAULT_SESSION_END: u32 = 1100;

/// Time of day packed as `hour * 100 + minute` (09:45 → 945).
pub fn hhmm(timestamp: NaiveDateTime) -> u32 {
    timestamp.hour() * 100 + timestamp.minute()
}

/// Closed `[start, end]` time-of-day window in HHMM form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionWindow {
    pub start: u32,
    pub end: u32,
}

impl Default for SessionWindow {
    fn default() -> Self {
        Self {
            start: DEFAULT_SESSION_START,
            end: DEFAULT_SESSION_END,
        }
    }
}

impl SessionWindow {
    pub fn new(start: u32, end: u32) -> Result<Self, ConfigError> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    /// True iff the timestamp's HHMM lies within `[start, end]`.
    pub fn is_active(&self, timestamp: NaiveDateTime) -> bool {
        self.contains(hhmm(timestamp))
    }

    pub fn contains(&self, hhmm: u32) -> bool {
        hhmm >= self.start && hhmm <= self.end
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for value in [self.start, self.end] {
            if value / 100 >= 24 || value % 100 >= 60 {
                return Err(ConfigError::InvalidSessionTime(value));
            }
        }
        if self.start > self.end {
            return Err(ConfigError::EmptySession {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}
