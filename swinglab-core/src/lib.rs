//! SwingLab Core — stateful trading-signal decision engine.
//!
//! This crate contains the heart of the swing-trading system:
//! - Domain types (indicator snapshots, flow readings, positions, decisions)
//! - Indicator adapter (realtime EMA, OBV z-score)
//! - Entry evaluator: five-condition gate with consecutive-confirmation debounce
//! - Exit evaluator: priority-ordered five-rule chain with breach/trend hysteresis
//! - TTL-bearing state store for the ephemeral per-key debounce records
//! - Per-tick engine loop that produces one decision per symbol per evaluation
//!
//! The engine runs in two modes sharing one decision shape: live mode consumes
//! real-time order-flow ratios, backtest mode substitutes an OBV z-score. The
//! evaluators never branch on mode — they consume a mode-normalized
//! [`domain::FlowReading`].

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod signals;
pub mod state;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine-facing types are Send + Sync.
    ///
    /// The backtest runner fans evaluation out across symbols on a thread
    /// pool; anything that crosses that boundary must pass this check.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::IndicatorSnapshot>();
        require_sync::<domain::IndicatorSnapshot>();
        require_send::<domain::FlowReading>();
        require_sync::<domain::FlowReading>();
        require_send::<domain::PositionState>();
        require_sync::<domain::PositionState>();
        require_send::<domain::Decision>();
        require_sync::<domain::Decision>();

        // Configuration
        require_send::<config::StrategyConfig>();
        require_sync::<config::StrategyConfig>();

        // State records
        require_send::<state::EntryConfirmationState>();
        require_sync::<state::EntryConfirmationState>();
        require_send::<state::EmaBreachState>();
        require_sync::<state::EmaBreachState>();
        require_send::<state::TrendGapState>();
        require_sync::<state::TrendGapState>();

        // Store
        require_send::<state::MemoryStore>();
        require_sync::<state::MemoryStore>();

        // Engine
        require_send::<engine::SwingEngine<state::MemoryStore>>();
        require_sync::<engine::SwingEngine<state::MemoryStore>>();
    }

    /// Architecture contract: the evaluators are pure given their inputs.
    ///
    /// `evaluate_entry` and `evaluate_exit` take prior state by reference and
    /// return the successor state — they never touch the store. If either
    /// signature grows a store parameter, the decision logic has leaked into
    /// the durability layer and this contract is broken.
    #[test]
    fn evaluators_take_state_by_value_not_store() {
        fn _entry_is_store_free(
            snapshot: &domain::IndicatorSnapshot,
            prior: Option<&state::EntryConfirmationState>,
            position: Option<&domain::PositionState>,
            cfg: &config::StrategyConfig,
        ) -> Result<signals::EntryEvaluation, error::InvalidInput> {
            signals::evaluate_entry(snapshot, prior, position, cfg)
        }

        fn _exit_is_store_free(
            position: &domain::PositionState,
            snapshot: &domain::IndicatorSnapshot,
            breach: Option<&state::EmaBreachState>,
            trend: Option<&state::TrendGapState>,
            cfg: &config::StrategyConfig,
        ) -> Result<signals::ExitEvaluation, error::InvalidInput> {
            signals::evaluate_exit(position, snapshot, breach, trend, cfg)
        }
    }
}
