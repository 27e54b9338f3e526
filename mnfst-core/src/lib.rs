//! MNFST Core: incremental multi-factor signal trigger.
//!
//! Classifies a stream of closed OHLCV bars, one bar at a time, by fusing:
//! - a session window filter
//! - a VWAP ± stddev distance gate
//! - the slope of an EMA-smoothed on-balance-volume series
//! - sign inversions of an accumulated price-vs-VWAP efficiency metric (CEI)
//!
//! Two fusion policies share the same indicator state: a live policy for the
//! bar that just closed, and a historical policy that annotates closed bars
//! with a one-bar lag.

pub mod config;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod session;

pub use config::{ConfigError, ParamSetId, SignalConfig};
pub use domain::{Bar, SignalRecord, Trigger};
pub use engine::{replay, SignalEngine};
pub use session::SessionWindow;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine state and records can move across threads,
    /// so the runner can replay instruments in parallel.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::SignalRecord>();
        require_sync::<domain::SignalRecord>();
        require_send::<SignalConfig>();
        require_sync::<SignalConfig>();
        require_send::<SignalEngine>();
        require_sync::<SignalEngine>();
        require_send::<engine::IndicatorSnapshot>();
        require_sync::<engine::IndicatorSnapshot>();
    }

    /// Architecture contract: fusion policies see only the snapshot.
    ///
    /// `evaluate()` takes `&self` and `&IndicatorSnapshot`; a policy cannot reach
    /// bars, the arena, or mutable indicator state.
    #[test]
    fn fusion_policy_sees_only_snapshot() {
        fn _check_trait_object_builds(
            policy: &dyn engine::FusionPolicy,
            snapshot: &engine::IndicatorSnapshot,
        ) -> Trigger {
            policy.evaluate(snapshot)
        }
    }
}
