//! Per-tick decision loop.
//!
//! One engine serves one symbol stream at a time: the scheduler (live) or
//! the replay (backtest) calls [`SwingEngine::evaluate`] once per tick and
//! executes the returned decision. The engine reads the prior debounce
//! records, runs the evaluators, persists the successor records, and emits
//! exactly one decision.
//!
//! Store failures degrade, they never abort: a missing, expired, corrupt or
//! unreachable record is evaluated as "first observation". The fixed
//! stop-loss and flow-reversal exits read nothing from the store at all, so
//! the hard risk limits hold even with the store down.

use crate::config::StrategyConfig;
use crate::domain::{Decision, IndicatorSnapshot, PositionState, Reason};
use crate::error::InvalidInput;
use crate::signals::{evaluate_entry, evaluate_exit, EntryDecision, ExitDecision};
use crate::state::{breach_key, entry_key, fetch, put, trend_key, StateStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The decision engine for one symbol/position stream.
pub struct SwingEngine<S: StateStore> {
    config: StrategyConfig,
    store: S,
}

impl<S: StateStore> SwingEngine<S> {
    pub fn new(config: StrategyConfig, store: S) -> Self {
        config.assert_valid();
        Self { config, store }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Evaluate one tick and return one decision.
    ///
    /// With an open position the exit chain runs first; a SELL wins the
    /// tick. Otherwise, while a buy tranche remains, the entry gate runs.
    /// An invalid snapshot aborts before any store access — no state is
    /// read or written, and the caller falls back to HOLD.
    pub fn evaluate(
        &self,
        snapshot: &IndicatorSnapshot,
        position: Option<&PositionState>,
    ) -> Result<Decision, InvalidInput> {
        snapshot.validate()?;

        if let Some(pos) = position.filter(|p| p.is_open()) {
            let breach = self.fetch_degraded(&breach_key(pos.position_id));
            let trend = self.fetch_degraded(&trend_key(pos.position_id));

            let eval = evaluate_exit(pos, snapshot, breach.as_ref(), trend.as_ref(), &self.config)?;

            self.write_or_delete(
                &breach_key(pos.position_id),
                eval.breach.as_ref(),
                self.config.breach_ttl(),
            );
            self.write_or_delete(
                &trend_key(pos.position_id),
                eval.trend.as_ref(),
                self.config.breach_ttl(),
            );

            if let ExitDecision::Sell(reason) = eval.decision {
                info!(
                    symbol = %snapshot.symbol,
                    position_id = pos.position_id,
                    %reason,
                    price = snapshot.price,
                    "sell signal"
                );
                return Ok(Decision::sell(
                    reason,
                    snapshot.price,
                    snapshot.ema20,
                    eval.sizing_fraction,
                ));
            }

            if !pos.can_scale_in() {
                return Ok(Decision::hold(
                    Reason::TrendIntact,
                    snapshot.price,
                    snapshot.ema20,
                ));
            }
            // A buy tranche remains; fall through to the entry gate.
        }

        let key = entry_key(&snapshot.symbol);
        let prior = self.fetch_degraded(&key);
        let eval = evaluate_entry(snapshot, prior.as_ref(), position, &self.config)?;

        match eval.decision {
            EntryDecision::Buy => {
                // A fill consumes the streak: the next tranche starts a
                // fresh confirmation count.
                self.delete_degraded(&key);
                info!(
                    symbol = %snapshot.symbol,
                    consecutive = eval.confirmation.consecutive,
                    price = snapshot.price,
                    ema20 = snapshot.ema20,
                    "buy signal"
                );
                Ok(Decision::buy(
                    snapshot.price,
                    snapshot.ema20,
                    eval.sizing_fraction,
                ))
            }
            EntryDecision::Wait => {
                self.write_or_delete(&key, Some(&eval.confirmation), self.config.entry_ttl());
                debug!(
                    symbol = %snapshot.symbol,
                    consecutive = eval.confirmation.consecutive,
                    required = self.config.required_confirmations,
                    "confirmation pending"
                );
                Ok(Decision::wait(snapshot.price, snapshot.ema20))
            }
            EntryDecision::None => {
                self.write_or_delete(&key, Some(&eval.confirmation), self.config.entry_ttl());
                let reason = if position.is_some_and(|p| p.is_open()) {
                    Reason::TrendIntact
                } else {
                    Reason::NoSignal
                };
                Ok(Decision::hold(reason, snapshot.price, snapshot.ema20))
            }
        }
    }

    /// Drop a closed position's breach and trend records.
    pub fn clear_position_records(&self, position_id: u64) {
        self.delete_degraded(&breach_key(position_id));
        self.delete_degraded(&trend_key(position_id));
    }

    /// Drop a symbol's entry confirmation record.
    pub fn clear_entry_record(&self, symbol: &str) {
        self.delete_degraded(&entry_key(symbol));
    }

    /// Read a record, degrading every failure mode to "no prior state".
    fn fetch_degraded<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match fetch(&self.store, key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "state store read failed; degrading to first observation");
                None
            }
        }
    }

    /// Persist (or delete) a successor record; failures are logged and the
    /// decision stands.
    fn write_or_delete<T: Serialize>(&self, key: &str, value: Option<&T>, ttl: Duration) {
        let result = match value {
            Some(v) => put(&self.store, key, v, ttl),
            None => self.store.delete(key),
        };
        if let Err(err) = result {
            warn!(key, %err, "state store write failed; decision unaffected");
        }
    }

    fn delete_degraded(&self, key: &str) {
        if let Err(err) = self.store.delete(key) {
            warn!(key, %err, "state store delete failed");
        }
    }
}
