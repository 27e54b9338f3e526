//! Closed classification vocabularies for each indicator and the composite trigger.
//!
//! Every per-bar classification is one of these enums. Display labels are for
//! logs and exports only; nothing inside the engine compares strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Price location relative to the rolling VWAP ± stddev bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BandLocation {
    /// Strictly within one standard deviation of VWAP.
    Inside,
    /// Strictly between one and two standard deviations, on either side.
    Active,
    /// Everything else, including the band edges and a zero-width band.
    Outside,
}

/// VWAP distance gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStatus {
    Wait,
    GateOpen,
    GateClosed,
}

/// Direction of the smoothed OBV series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlopeStatus {
    Wait,
    Up,
    Down,
    Flat,
}

/// Sign of the accumulated CEI slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CeiState {
    Wait,
    Rising,
    Falling,
    Flat,
}

/// Bar-to-bar sign change of the CEI efficiency metric, two bars back → one bar back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Inversion {
    /// Negative two bars back, positive one bar back.
    Positive,
    /// Positive two bars back, negative one bar back.
    Negative,
    None,
}

/// Composite trade trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trigger {
    Long,
    Short,
    #[default]
    None,
}

impl Trigger {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Which pair of EMA samples an OBV slope comparison reads.
///
/// `Live` compares the current EMA against the previous one. `Lagged` compares
/// the previous EMA against the one before it, so the slope only ever reflects
/// two fully closed bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeMode {
    Live,
    Lagged,
}

impl SlopeMode {
    /// Offset of the newer sample in the comparison (0 = current bar).
    pub fn offset(&self) -> usize {
        match self {
            Self::Live => 0,
            Self::Lagged => 1,
        }
    }
}

macro_rules! impl_display {
    ($ty:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let label = match self {
                    $(Self::$variant => $label),+
                };
                f.write_str(label)
            }
        }
    };
}

impl_display!(BandLocation { Inside => "INSIDE", Active => "ACTIVE", Outside => "OUTSIDE" });
impl_display!(GateStatus { Wait => "WAIT", GateOpen => "GATE_OPEN", GateClosed => "GATE_CLOSED" });
impl_display!(SlopeStatus { Wait => "WAIT", Up => "UP", Down => "DOWN", Flat => "FLAT" });
impl_display!(CeiState { Wait => "WAIT", Rising => "RISING", Falling => "FALLING", Flat => "FLAT" });
impl_display!(Inversion { Positive => "POSITIVE", Negative => "NEGATIVE", None => "NONE" });
impl_display!(Trigger { Long => "LONG", Short => "SHORT", None => "NONE" });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_label() {
        let json = serde_json::to_string(&GateStatus::GateOpen).unwrap();
        assert_eq!(json, format!("\"{}\"", GateStatus::GateOpen));
        let json = serde_json::to_string(&Trigger::None).unwrap();
        assert_eq!(json, "\"NONE\"");
    }

    #[test]
    fn trigger_default_is_none() {
        assert_eq!(Trigger::default(), Trigger::None);
        assert!(!Trigger::None.is_active());
        assert!(Trigger::Long.is_active());
        assert!(Trigger::Short.is_active());
    }

    #[test]
    fn slope_mode_offsets() {
        assert_eq!(SlopeMode::Live.offset(), 0);
        assert_eq!(SlopeMode::Lagged.offset(), 1);
    }

    #[test]
    fn statuses_deserialize_from_labels() {
        let s: SlopeStatus = serde_json::from_str("\"DOWN\"").unwrap();
        assert_eq!(s, SlopeStatus::Down);
        let c: CeiState = serde_json::from_str("\"RISING\"").unwrap();
        assert_eq!(c, CeiState::Rising);
    }
}
