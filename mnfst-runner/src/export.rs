//! Export: JSON and CSV artifacts for replayed record streams.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: one flat row per record for spreadsheets and plotting tools
//!
//! JSON artifacts carry a `schema_version`; newer versions are rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::ExportFormat;
use crate::replay::{SymbolReplay, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(results: &[SymbolReplay]) -> Result<String> {
    serde_json::to_string_pretty(results).context("failed to serialize replay output to JSON")
}

/// Deserialize replay output, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<Vec<SymbolReplay>> {
    let results: Vec<SymbolReplay> =
        serde_json::from_str(json).context("failed to deserialize replay output from JSON")?;
    for r in &results {
        if r.schema_version > SCHEMA_VERSION {
            bail!(
                "unsupported schema version {} for '{}' (max supported: {})",
                r.schema_version,
                r.symbol,
                SCHEMA_VERSION
            );
        }
    }
    Ok(results)
}

// ─── CSV export ─────────────────────────────────────────────────────

const CSV_HEADER: [&str; 20] = [
    "symbol",
    "param_set",
    "bar_index",
    "timestamp",
    "session_active",
    "vwap_gate",
    "vwap_location",
    "obv_slope",
    "obv_live_slope",
    "cei_state",
    "cei_inversion",
    "live_trigger",
    "historical_trigger",
    "close",
    "vwap",
    "stddev",
    "obv",
    "obv_ema",
    "cei_efficiency",
    "cei_slope",
];

/// Export every record of every instrument as CSV.
pub fn export_records_csv(results: &[SymbolReplay]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;

    for replay in results {
        let param_set = replay.param_set.short();
        for r in &replay.records {
            let v = &r.values;
            wtr.write_record([
                replay.symbol.as_str(),
                param_set,
                &r.bar_index.to_string(),
                &r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                &r.session_active.to_string(),
                &r.vwap_gate.to_string(),
                &r.vwap_location.to_string(),
                &r.obv_slope.to_string(),
                &r.obv_live_slope.to_string(),
                &r.cei_state.to_string(),
                &r.cei_inversion.to_string(),
                &r.live_trigger.to_string(),
                &r.historical_trigger.to_string(),
                &format!("{:.6}", v.close),
                &format!("{:.6}", v.vwap),
                &format!("{:.6}", v.stddev),
                &format!("{:.2}", v.obv),
                &format!("{:.4}", v.obv_ema),
                &format!("{:.8}", v.cei_efficiency),
                &format!("{:.8}", v.cei_slope),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn render(results: &[SymbolReplay], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => export_records_csv(results),
        ExportFormat::Json => export_json(results),
    }
}

/// Write rendered output to `path`, creating parent directories.
pub fn write_output(results: &[SymbolReplay], format: ExportFormat, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output dir: {}", parent.display()))?;
    }
    let body = render(results, format)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::generate_synthetic_bars;
    use crate::replay::replay_symbol;
    use chrono::NaiveDate;
    use mnfst_core::SignalConfig;

    fn sample() -> Vec<SymbolReplay> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let bars = generate_synthetic_bars("ES", start, 40, 5);
        vec![replay_symbol("ES", &bars, &SignalConfig::panel(5)).unwrap()]
    }

    #[test]
    fn json_round_trip() {
        let results = sample();
        let json = export_json(&results).unwrap();
        assert!(json.contains("\"GATE_"));
        let back = import_json(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].symbol, "ES");
        assert_eq!(back[0].param_set, results[0].param_set);
        assert_eq!(back[0].triggers, results[0].triggers);
        for (a, b) in back[0].records.iter().zip(&results[0].records) {
            assert_eq!(a.bar_index, b.bar_index);
            assert_eq!(a.timestamp, b.timestamp);
            assert_eq!(a.vwap_gate, b.vwap_gate);
            assert_eq!(a.live_trigger, b.live_trigger);
            assert_eq!(a.historical_trigger, b.historical_trigger);
        }
    }

    #[test]
    fn json_rejects_future_schema() {
        let mut results = sample();
        results[0].schema_version = SCHEMA_VERSION + 1;
        let json = export_json(&results).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn csv_has_one_row_per_record() {
        let results = sample();
        let csv = export_records_csv(&results).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1 + results[0].records.len());
        assert!(lines[0].starts_with("symbol,param_set,bar_index,timestamp"));
        assert!(lines[1].starts_with("ES,"));
        assert_eq!(lines[1].split(',').count(), CSV_HEADER.len());
    }
}
