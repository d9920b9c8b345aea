//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Flow ratios are finite for any net quantity / volume combination
//! 2. The confirmation streak equals the trailing run of true signals
//! 3. Breach and trend records never survive a price at or above the EMA
//! 4. The fixed stop fires for every return at or below the threshold,
//!    whatever the flow looks like
//! 5. Snapshot validation is all-or-nothing: an invalid snapshot never
//!    yields a decision from either evaluator

use proptest::prelude::*;
use swinglab_core::config::StrategyConfig;
use swinglab_core::domain::{FlowReading, IndicatorSnapshot, PositionState};
use swinglab_core::indicators::{compute_snapshot, FlowInputs, PriceHistory, TickQuote};
use swinglab_core::signals::{evaluate_entry, evaluate_exit, ExitDecision};
use swinglab_core::state::EntryConfirmationState;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1_000.0..200_000.0_f64).prop_map(|p| p.round())
}

fn arb_volume() -> impl Strategy<Value = i64> {
    0..50_000_000_i64
}

fn arb_net_qty() -> impl Strategy<Value = i64> {
    -5_000_000..5_000_000_i64
}

fn arb_flow() -> impl Strategy<Value = FlowReading> {
    prop_oneof![
        ((-10.0..10.0_f64), (-10.0..10.0_f64)).prop_map(|(foreign_ratio, program_ratio)| {
            FlowReading::Live {
                foreign_ratio,
                program_ratio,
            }
        }),
        ((-3.0..3.0_f64), (-1e6..1e6_f64)).prop_map(|(obv_z, obv_delta)| {
            FlowReading::Backtest { obv_z, obv_delta }
        }),
    ]
}

fn snapshot_with(price: f64, ema20: f64, flow: FlowReading) -> IndicatorSnapshot {
    IndicatorSnapshot {
        symbol: "005930".into(),
        price,
        ema20,
        deviation: (price - ema20) / ema20,
        cumulative_volume: 1_000_000,
        reference_volume: 1_000_000,
        day_change_pct: 0.0,
        flow,
    }
}

// ── 1. Flow ratios are always finite ─────────────────────────────────

proptest! {
    /// Any net quantity over any non-negative volume produces finite
    /// ratios — zero volume included.
    #[test]
    fn flow_ratios_always_finite(
        foreign in arb_net_qty(),
        program in arb_net_qty(),
        volume in arb_volume(),
    ) {
        let cfg = StrategyConfig::live();
        let mut history = PriceHistory::new();
        for i in 0..25 {
            history.push(50_000.0 + i as f64, 1_000_000);
        }
        let quote = TickQuote {
            price: 50_030.0,
            cumulative_volume: volume,
            reference_volume: 1_000_000,
            day_change_pct: 0.0,
        };
        let snap = compute_snapshot(
            "005930",
            &history,
            &quote,
            FlowInputs::Live { foreign_net_qty: foreign, program_net_qty: program },
            &cfg,
        ).unwrap();

        prop_assert!(snap.flow.is_finite());
        if volume == 0 {
            prop_assert_eq!(snap.flow, FlowReading::Live {
                foreign_ratio: 0.0,
                program_ratio: 0.0,
            });
        }
    }
}

// ── 2. Streak equals trailing run of trues ───────────────────────────

proptest! {
    /// Folding any signal sequence through the confirmation transition
    /// leaves a count equal to the trailing run of true signals.
    #[test]
    fn streak_is_trailing_true_run(signals in prop::collection::vec(any::<bool>(), 1..40)) {
        let mut state: Option<EntryConfirmationState> = None;
        for &signal in &signals {
            state = Some(EntryConfirmationState::advance(state.as_ref(), signal, (0.0, 0.0)));
        }

        let trailing_run = signals.iter().rev().take_while(|&&s| s).count() as u32;
        prop_assert_eq!(state.unwrap().consecutive, trailing_run);
    }
}

// ── 3. Records never survive recovery ────────────────────────────────

proptest! {
    /// Whenever price sits at or above the EMA, the exit evaluation
    /// deletes both the breach and trend records.
    #[test]
    fn records_cleared_at_or_above_ema(
        price in arb_price(),
        ema_offset in (-500.0..500.0_f64),
        flow in arb_flow(),
    ) {
        let cfg = StrategyConfig::live();
        let ema20 = (price - ema_offset).max(1.0);
        let position = PositionState::opened(1, "005930", price * 0.99, 10, 0.0);
        let snap = snapshot_with(price, ema20, flow);

        let eval = evaluate_exit(&position, &snap, None, None, &cfg).unwrap();
        if price >= ema20 {
            prop_assert!(eval.breach.is_none());
            prop_assert!(eval.trend.is_none());
        } else {
            prop_assert!(eval.breach.is_some());
            prop_assert!(eval.trend.is_some());
        }
    }
}

// ── 4. The hard stop always fires ────────────────────────────────────

proptest! {
    /// For any flow reading and any loss at or beyond the stop threshold,
    /// the decision is SELL with the fixed-stop reason — rule 1 cannot be
    /// preempted.
    #[test]
    fn stop_loss_always_first(
        entry in arb_price(),
        loss_pct in (0.03..0.40_f64),
        flow in arb_flow(),
    ) {
        let cfg = StrategyConfig::live();
        let price = (entry * (1.0 - loss_pct)).max(1.0);
        let position = PositionState::opened(1, "005930", entry, 10, 0.0);
        let snap = snapshot_with(price, entry, flow);

        let eval = evaluate_exit(&position, &snap, None, None, &cfg).unwrap();
        prop_assert_eq!(
            eval.decision,
            ExitDecision::Sell(swinglab_core::domain::Reason::FixedStopLoss)
        );
    }
}

// ── 5. Validation is all-or-nothing ──────────────────────────────────

proptest! {
    /// A non-positive EMA aborts both evaluators for any otherwise
    /// plausible snapshot.
    #[test]
    fn bad_ema_aborts_both_evaluators(
        price in arb_price(),
        bad_ema in (-1_000.0..=0.0_f64),
        flow in arb_flow(),
    ) {
        let cfg = StrategyConfig::live();
        let mut snap = snapshot_with(price, 1.0, flow);
        snap.ema20 = bad_ema;
        snap.deviation = 0.0;

        prop_assert!(evaluate_entry(&snap, None, None, &cfg).is_err());

        let position = PositionState::opened(1, "005930", price, 10, 0.0);
        prop_assert!(evaluate_exit(&position, &snap, None, None, &cfg).is_err());
    }
}
