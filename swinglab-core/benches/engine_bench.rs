//! Criterion benchmarks for the engine hot paths.
//!
//! Benchmarks:
//! 1. Snapshot assembly (realtime EMA + OBV z-score over a year of bars)
//! 2. A full evaluation tick (store read, evaluators, store write)

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use swinglab_core::config::StrategyConfig;
use swinglab_core::domain::{FlowReading, IndicatorSnapshot, PositionState};
use swinglab_core::engine::SwingEngine;
use swinglab_core::indicators::{compute_snapshot, FlowInputs, PriceHistory, TickQuote};
use swinglab_core::state::MemoryStore;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_history(n: usize) -> PriceHistory {
    let mut history = PriceHistory::new();
    for i in 0..n {
        let close = 70_000.0 + (i as f64 * 0.1).sin() * 2_000.0;
        history.push(close, 1_000_000 + (i as i64 % 500_000));
    }
    history
}

fn entry_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot {
        symbol: "005930".into(),
        price: 72_500.0,
        ema20: 71_850.0,
        deviation: (72_500.0 - 71_850.0) / 71_850.0,
        cumulative_volume: 1_250_000,
        reference_volume: 1_000_000,
        day_change_pct: 4.0,
        flow: FlowReading::Live {
            foreign_ratio: 3.5,
            program_ratio: 1.3,
        },
    }
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_snapshot_assembly(c: &mut Criterion) {
    let cfg = StrategyConfig::backtest();
    let history = make_history(250);
    let quote = TickQuote {
        price: 71_500.0,
        cumulative_volume: 1_400_000,
        reference_volume: 0,
        day_change_pct: 1.0,
    };

    c.bench_function("snapshot_assembly_250_bars", |b| {
        b.iter(|| {
            compute_snapshot(
                black_box("005930"),
                black_box(&history),
                black_box(&quote),
                FlowInputs::Backtest,
                &cfg,
            )
            .unwrap()
        })
    });
}

fn bench_evaluation_tick(c: &mut Criterion) {
    let engine = SwingEngine::new(StrategyConfig::live(), MemoryStore::new());
    let snap = entry_snapshot();

    c.bench_function("entry_evaluation_tick", |b| {
        b.iter(|| engine.evaluate(black_box(&snap), None).unwrap())
    });

    let position = PositionState::opened(1, "005930", 72_000.0, 10, 0.0);
    c.bench_function("exit_evaluation_tick", |b| {
        b.iter(|| engine.evaluate(black_box(&snap), Some(&position)).unwrap())
    });
}

criterion_group!(benches, bench_snapshot_assembly, bench_evaluation_tick);
criterion_main!(benches);
