//! Exit chain: five rules in priority order, first SELL wins.
//!
//! 1. fixed stop-loss  2. flow reversal  3. EMA breach (debounced)
//! 4. flow weakening (below EMA)  5. trend deterioration (below EMA)
//!
//! Rules 1–2 read only the snapshot and the position's entry price, so the
//! hard risk limits survive a state-store outage. Rules 3 and 5 carry
//! hysteresis: their records advance every tick — a below-threshold breach
//! tick does not short-circuit the chain, it records the count and lets
//! rules 4–5 run the same tick. There is no profit-target rule: a position
//! rides as long as the trend and the flow stay intact.

use crate::config::StrategyConfig;
use crate::domain::{IndicatorSnapshot, PositionState, Reason};
use crate::error::InvalidInput;
use crate::state::{EmaBreachState, TrendGapState};

/// What the exit chain wants to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    Sell(Reason),
    Hold,
}

impl ExitDecision {
    pub fn is_sell(&self) -> bool {
        matches!(self, ExitDecision::Sell(_))
    }
}

/// Result of one exit evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitEvaluation {
    pub decision: ExitDecision,
    /// Fraction of held quantity to close on a SELL (0.0 on HOLD).
    pub sizing_fraction: f64,
    /// Successor breach record; `None` means delete (price at/above EMA).
    pub breach: Option<EmaBreachState>,
    /// Successor trend-gap record; `None` means delete.
    pub trend: Option<TrendGapState>,
}

/// Evaluate the exit chain for one tick of an open position.
///
/// Pure: prior records come in by reference, successor records go out in
/// the evaluation; the caller persists them. Errors abort the tick before
/// any successor record is produced.
pub fn evaluate_exit(
    position: &PositionState,
    snapshot: &IndicatorSnapshot,
    breach: Option<&EmaBreachState>,
    trend: Option<&TrendGapState>,
    cfg: &StrategyConfig,
) -> Result<ExitEvaluation, InvalidInput> {
    snapshot.validate()?;

    let below = snapshot.below_ema();
    let gap = snapshot.ema_gap();

    // Record transitions happen every tick, independent of which rule
    // fires: recovery above the EMA deletes both records, a below-EMA tick
    // advances the counter and the gap sample.
    let next_breach = below.then(|| EmaBreachState::breached(breach, snapshot.price, snapshot.ema20));
    let next_trend = below.then(|| TrendGapState::sample(snapshot.price, gap));

    let decision = if position.unrealized_return(snapshot.price) <= cfg.stop_loss {
        // 1. Hard stop on return since entry. Snapshot + entry price only.
        ExitDecision::Sell(Reason::FixedStopLoss)
    } else if snapshot.flow.exit_reversal(cfg) {
        // 2. Flow reversed into heavy selling. Snapshot only.
        ExitDecision::Sell(Reason::FlowReversal)
    } else if below
        && next_breach
            .as_ref()
            .is_some_and(|b| b.count >= cfg.required_breaches)
    {
        // 3. Debounced EMA breach.
        ExitDecision::Sell(Reason::EmaBreach)
    } else if below && snapshot.flow.exit_weakening(cfg) {
        // 4. Buying interest gone quiet while under the EMA.
        ExitDecision::Sell(Reason::FlowWeakening)
    } else if below && trend.is_some_and(|t| t.deteriorated(snapshot.price, gap)) {
        // 5. Falling price and a widening gap versus the recorded sample.
        ExitDecision::Sell(Reason::TrendDeterioration)
    } else {
        ExitDecision::Hold
    };

    let sizing_fraction = if decision.is_sell() {
        // First sell closes sell_ratio of the quantity, the second closes
        // the remainder.
        if position.sell_count == 0 {
            cfg.sell_ratio
        } else {
            1.0
        }
    } else {
        0.0
    };

    Ok(ExitEvaluation {
        decision,
        sizing_fraction,
        breach: next_breach,
        trend: next_trend,
    })
}
