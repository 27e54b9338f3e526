//! MNFST Runner: replay orchestration on top of `mnfst-core`.
//!
//! This crate provides:
//! - TOML run configuration (signal parameters, symbol filter, output format)
//! - CSV bar loading with ingestion validation, plus synthetic bars
//! - A tracker keyed by instrument and parameter set for streaming use
//! - Parallel batch replay across instruments
//! - CSV and JSON export of the record stream

pub mod config;
pub mod data_loader;
pub mod export;
pub mod replay;
pub mod tracker;

pub use config::{ExportFormat, RunConfig, RunConfigError, RunId};
pub use data_loader::{
    generate_synthetic_bars, ingest, load_bars_csv, load_synthetic, read_bars_csv,
    write_bars_csv, LoadError, LoadedData,
};
pub use export::{export_json, export_records_csv, import_json, render, write_output};
pub use replay::{replay_all, replay_symbol, RunError, SymbolReplay, TriggerCounts, SCHEMA_VERSION};
pub use tracker::{Tracker, TrackerError, TrackerKey};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
        assert_send::<ExportFormat>();
        assert_sync::<ExportFormat>();
    }

    #[test]
    fn loaded_data_is_send_sync() {
        assert_send::<LoadedData>();
        assert_sync::<LoadedData>();
    }

    #[test]
    fn replay_output_is_send_sync() {
        assert_send::<SymbolReplay>();
        assert_sync::<SymbolReplay>();
        assert_send::<TriggerCounts>();
        assert_sync::<TriggerCounts>();
    }

    #[test]
    fn tracker_is_send_sync() {
        assert_send::<Tracker>();
        assert_sync::<Tracker>();
    }
}
