//! The engine's output: one decision per symbol per evaluation tick.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the order-execution collaborator should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
    /// Entry predicate holds but the confirmation streak is not complete.
    Wait,
}

/// Why the engine decided what it decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Entry predicate confirmed across the required consecutive ticks.
    EntryConfirmed,
    /// First confirmation seen; waiting for the next tick.
    ConfirmationPending,
    /// Entry predicate false (or no tranche left to buy).
    NoSignal,
    /// Exit rule 1: return since entry at or below the fixed stop.
    FixedStopLoss,
    /// Exit rule 2: flow reversed into heavy net selling.
    FlowReversal,
    /// Exit rule 3: price closed below the EMA for the required streak.
    EmaBreach,
    /// Exit rule 4: buying interest dried up below the EMA.
    FlowWeakening,
    /// Exit rule 5: price falling and the below-EMA gap widening.
    TrendDeterioration,
    /// Position held: no exit rule fired.
    TrendIntact,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reason::EntryConfirmed => "entry confirmed",
            Reason::ConfirmationPending => "confirmation pending",
            Reason::NoSignal => "no signal",
            Reason::FixedStopLoss => "fixed stop-loss",
            Reason::FlowReversal => "flow reversal",
            Reason::EmaBreach => "EMA breach",
            Reason::FlowWeakening => "flow weakening",
            Reason::TrendDeterioration => "trend deterioration",
            Reason::TrendIntact => "trend intact",
        };
        f.write_str(s)
    }
}

/// One decision, consumed by the external order-execution collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub reason: Reason,
    /// Price the decision was made at.
    pub price: f64,
    /// EMA the decision was made against.
    pub ema20: f64,
    /// Buy: fraction of remaining cash to commit. Sell: fraction of held
    /// quantity to close. Zero for HOLD/WAIT.
    pub sizing_fraction: f64,
}

impl Decision {
    pub fn hold(reason: Reason, price: f64, ema20: f64) -> Self {
        Self {
            action: Action::Hold,
            reason,
            price,
            ema20,
            sizing_fraction: 0.0,
        }
    }

    pub fn wait(price: f64, ema20: f64) -> Self {
        Self {
            action: Action::Wait,
            reason: Reason::ConfirmationPending,
            price,
            ema20,
            sizing_fraction: 0.0,
        }
    }

    pub fn buy(price: f64, ema20: f64, sizing_fraction: f64) -> Self {
        Self {
            action: Action::Buy,
            reason: Reason::EntryConfirmed,
            price,
            ema20,
            sizing_fraction,
        }
    }

    pub fn sell(reason: Reason, price: f64, ema20: f64, sizing_fraction: f64) -> Self {
        Self {
            action: Action::Sell,
            reason,
            price,
            ema20,
            sizing_fraction,
        }
    }

    pub fn is_actionable(&self) -> bool {
        matches!(self.action, Action::Buy | Action::Sell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_action_and_reason() {
        let d = Decision::buy(72_500.0, 71_850.0, 0.5);
        assert_eq!(d.action, Action::Buy);
        assert_eq!(d.reason, Reason::EntryConfirmed);
        assert!(d.is_actionable());

        let d = Decision::hold(Reason::NoSignal, 100.0, 101.0);
        assert!(!d.is_actionable());
        assert_eq!(d.sizing_fraction, 0.0);
    }

    #[test]
    fn reason_display_is_human_readable() {
        assert_eq!(Reason::FixedStopLoss.to_string(), "fixed stop-loss");
        assert_eq!(Reason::TrendDeterioration.to_string(), "trend deterioration");
    }

    #[test]
    fn decision_serialization_roundtrip() {
        let d = Decision::sell(Reason::EmaBreach, 71_000.0, 71_500.0, 0.5);
        let json = serde_json::to_string(&d).unwrap();
        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}
