//! Criterion benchmarks for the per-bar signal path.
//!
//! Benchmarks:
//! 1. Full engine replay (all indicators, both policies, arena)
//! 2. Individual indicator updates
//! 3. Fusion policy evaluation on a fixed snapshot

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mnfst_core::domain::Bar;
use mnfst_core::engine::{FusionPolicy, HistoricalPolicy, IndicatorSnapshot, LivePolicy};
use mnfst_core::indicators::{BandReading, CeiDetector, CeiReading, ObvReading, ObvSlope, VwapGate};
use mnfst_core::{replay, SignalConfig, SignalEngine};

// ── Helpers ──────────────────────────────────────────────────────────

/// One-minute bars from 07:45; only the first 196 fall inside the session.
fn make_bars(n: usize) -> Vec<Bar> {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(7, 45, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            Bar {
                timestamp: start + chrono::Duration::minutes(i as i64),
                open,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000.0 + (i % 500) as f64,
            }
        })
        .collect()
}

// ── 1. Engine Replay ─────────────────────────────────────────────────

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_replay");

    for &bar_count in &[390, 1_950, 9_750] {
        let bars = make_bars(bar_count);

        group.bench_with_input(
            BenchmarkId::new("default_config", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| replay(black_box(&bars), black_box(&SignalConfig::default())));
            },
        );

        let bounded = SignalConfig {
            record_retention: Some(64),
            ..SignalConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new("bounded_arena", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| {
                    let mut engine = SignalEngine::new(bounded.clone()).unwrap();
                    for bar in &bars {
                        black_box(engine.on_bar(bar));
                    }
                });
            },
        );
    }

    group.finish();
}

// ── 2. Indicator Updates ─────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_update");
    let bars = make_bars(1_950);

    for &lookback in &[21, 34, 89] {
        group.bench_with_input(BenchmarkId::new("vwap_gate", lookback), &lookback, |b, &l| {
            b.iter(|| {
                let mut gate = VwapGate::new(l);
                for bar in &bars {
                    black_box(gate.update(bar.close, bar.volume));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("obv_slope", lookback), &lookback, |b, &l| {
            b.iter(|| {
                let mut obv = ObvSlope::new(l);
                for bar in &bars {
                    black_box(obv.update(bar.close, bar.volume));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("cei", lookback), &lookback, |b, &l| {
            b.iter(|| {
                let mut cei = CeiDetector::new(l);
                for bar in &bars {
                    black_box(cei.update(bar.close, 100.0, bar.volume));
                }
            });
        });
    }

    group.finish();
}

// ── 3. Fusion ────────────────────────────────────────────────────────

fn bench_fusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("fusion");

    let band = BandReading {
        price: 103.0,
        vwap: 100.0,
        stddev: 2.0,
    };
    let snapshot = IndicatorSnapshot {
        bar_index: 100,
        timestamp: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
        session_active: true,
        band,
        live_band: band,
        obv: ObvReading {
            obv: 3.0,
            ema: [3.0, 2.0, 1.0],
        },
        cei: CeiReading {
            efficiency: [0.1, 0.3, -0.5],
            slope: 0.4,
        },
    };

    group.bench_function("live_and_historical", |b| {
        b.iter(|| {
            let s = black_box(&snapshot);
            (LivePolicy.evaluate(s), HistoricalPolicy.evaluate(s))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_engine, bench_indicators, bench_fusion);
criterion_main!(benches);
