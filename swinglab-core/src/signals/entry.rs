//! Entry gate: five conditions plus consecutive-confirmation debounce.
//!
//! A single satisfying tick is noise until the streak reaches the required
//! count; the first one yields WAIT, and any false tick resets the streak
//! to zero. The sizing hint picks the tranche from the position's buy
//! count: the first tranche commits `buy_ratio` of remaining cash, the
//! second commits all of it.

use crate::config::StrategyConfig;
use crate::domain::{IndicatorSnapshot, PositionState};
use crate::error::InvalidInput;
use crate::state::EntryConfirmationState;
use serde::{Deserialize, Serialize};

/// What the entry gate wants to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryDecision {
    /// Streak complete — buy the tranche named by the sizing fraction.
    Buy,
    /// Predicate holds but the streak is short — wait for the next tick.
    Wait,
    /// Predicate false.
    None,
}

/// Per-condition breakdown, kept for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConditions {
    /// A: price above the EMA …
    pub price_above_ema: bool,
    /// … and not stretched more than the deviation cap above it.
    pub deviation_ok: bool,
    /// B: buying pressure strong enough.
    pub flow_strong: bool,
    /// C: flow held up versus the prior sample.
    pub flow_maintained: bool,
    /// D: cumulative volume beats the reference by the required multiple.
    pub volume_ok: bool,
    /// E: not chasing a surge.
    pub surge_ok: bool,
}

impl EntryConditions {
    pub fn all(&self) -> bool {
        self.price_above_ema
            && self.deviation_ok
            && self.flow_strong
            && self.flow_maintained
            && self.volume_ok
            && self.surge_ok
    }

    /// Number of satisfied conditions (diagnostic score).
    pub fn score(&self) -> u8 {
        [
            self.price_above_ema,
            self.deviation_ok,
            self.flow_strong,
            self.flow_maintained,
            self.volume_ok,
            self.surge_ok,
        ]
        .iter()
        .filter(|&&c| c)
        .count() as u8
    }
}

/// Result of one entry evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryEvaluation {
    pub decision: EntryDecision,
    /// Fraction of remaining cash to commit on a BUY.
    pub sizing_fraction: f64,
    pub conditions: EntryConditions,
    /// Successor confirmation record for the engine to persist.
    pub confirmation: EntryConfirmationState,
}

/// Evaluate the entry gate for one tick.
///
/// Pure: consumes the prior confirmation by reference and returns the
/// successor record; the caller persists it. Errors abort the tick before
/// any record is produced.
pub fn evaluate_entry(
    snapshot: &IndicatorSnapshot,
    prior: Option<&EntryConfirmationState>,
    position: Option<&PositionState>,
    cfg: &StrategyConfig,
) -> Result<EntryEvaluation, InvalidInput> {
    snapshot.validate()?;

    let conditions = EntryConditions {
        price_above_ema: snapshot.price > snapshot.ema20,
        deviation_ok: snapshot.deviation <= cfg.max_deviation,
        flow_strong: snapshot.flow.entry_strength(cfg),
        flow_maintained: snapshot
            .flow
            .entry_persistence(prior.map(EntryConfirmationState::prior_ratios), cfg),
        volume_ok: snapshot.volume_ratio() >= cfg.volume_ratio_threshold,
        // day_change_pct is a percentage, max_surge a fraction
        surge_ok: snapshot.day_change_pct <= cfg.max_surge * 100.0,
    };

    let signal = conditions.all();
    let confirmation =
        EntryConfirmationState::advance(prior, signal, snapshot.flow.recorded_ratios());

    let decision = if signal && confirmation.consecutive >= cfg.required_confirmations {
        EntryDecision::Buy
    } else if signal {
        EntryDecision::Wait
    } else {
        EntryDecision::None
    };

    // First tranche commits buy_ratio; the second commits the rest.
    let sizing_fraction = match position.map(|p| p.buy_count) {
        None | Some(0) => cfg.buy_ratio,
        Some(_) => 1.0,
    };

    Ok(EntryEvaluation {
        decision,
        sizing_fraction,
        conditions,
        confirmation,
    })
}
