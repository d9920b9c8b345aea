//! Day-by-day backtest replay.
//!
//! Drives the core engine through a daily bar series exactly the way the
//! live loop drives it through realtime ticks: one snapshot, one decision,
//! one (possible) fill per bar, with the same two-tranche accounting the
//! live executor applies. Bars before the warmup window or `eval_start`
//! only feed the indicator history.

use crate::config::RunConfig;
use crate::data_loader::DailyBar;
use crate::error::RunnerError;
use crate::result::{BacktestResult, TradeRecord};
use swinglab_core::config::TradingMode;
use swinglab_core::domain::{Action, Decision, PositionState};
use swinglab_core::engine::SwingEngine;
use swinglab_core::error::InvalidInput;
use swinglab_core::indicators::{compute_snapshot, FlowInputs, PriceHistory, TickQuote};
use swinglab_core::state::MemoryStore;
use tracing::{debug, warn};

/// Replay one symbol's daily bars under the given run configuration.
pub fn run_backtest(
    symbol: &str,
    bars: &[DailyBar],
    config: &RunConfig,
) -> Result<BacktestResult, RunnerError> {
    if bars.is_empty() {
        return Err(RunnerError::Validation("no bars to replay".into()));
    }
    if bars.windows(2).any(|w| w[1].date <= w[0].date) {
        return Err(RunnerError::Validation("bars out of order".into()));
    }

    let mut strategy = config.strategy.clone();
    if strategy.mode == TradingMode::Live {
        warn!("run config specified live mode; replay forces backtest");
        strategy.mode = TradingMode::Backtest;
    }

    let engine = SwingEngine::new(strategy, MemoryStore::new());
    let mut replay = Replay {
        symbol: symbol.to_string(),
        cash: config.initial_capital,
        position: None,
        avg_cost: 0.0,
        next_position_id: 1,
        trades: Vec::new(),
    };

    let mut history = PriceHistory::new();
    let mut bars_evaluated = 0usize;

    for (i, bar) in bars.iter().enumerate() {
        // The first bar has no prior close for the day-change input.
        if i > 0 {
            let prev_close = bars[i - 1].close;
            let quote = TickQuote {
                price: bar.close,
                cumulative_volume: bar.volume,
                // Backtest derives its rolling reference from the history.
                reference_volume: 0,
                day_change_pct: day_change_pct(prev_close, bar.close),
            };

            let in_eval_window = config.eval_start.map_or(true, |start| bar.date >= start);
            if in_eval_window {
                match compute_snapshot(symbol, &history, &quote, FlowInputs::Backtest, engine.config())
                {
                    Ok(snapshot) => {
                        bars_evaluated += 1;
                        match engine.evaluate(&snapshot, replay.position.as_ref()) {
                            Ok(decision) => replay.apply(&engine, bar, &decision),
                            Err(err) => {
                                warn!(date = %bar.date, %err, "evaluation aborted; holding")
                            }
                        }
                    }
                    Err(InvalidInput::InsufficientHistory { .. }) => {
                        debug!(date = %bar.date, "warming up");
                    }
                    Err(err) => warn!(date = %bar.date, %err, "snapshot rejected; holding"),
                }
            }
        }

        history.push(bar.close, bar.volume);
    }

    let last_close = bars[bars.len() - 1].close;
    let ending_equity = replay.cash
        + replay
            .position
            .as_ref()
            .map_or(0.0, |p| p.market_value(last_close));

    Ok(BacktestResult {
        run_id: config.run_id(),
        symbol: symbol.to_string(),
        initial_capital: config.initial_capital,
        final_capital: replay.cash,
        ending_equity,
        total_return_pct: (ending_equity - config.initial_capital) / config.initial_capital
            * 100.0,
        trades: replay.trades,
        bars_evaluated,
    })
}

/// Mutable replay accounting: cash, the open position, and the trade log.
struct Replay {
    symbol: String,
    cash: f64,
    position: Option<PositionState>,
    /// Weighted average cost of the open quantity (PnL basis).
    avg_cost: f64,
    next_position_id: u64,
    trades: Vec<TradeRecord>,
}

impl Replay {
    fn apply(&mut self, engine: &SwingEngine<MemoryStore>, bar: &DailyBar, decision: &Decision) {
        match decision.action {
            Action::Buy => self.fill_buy(bar, decision),
            Action::Sell => self.fill_sell(engine, bar, decision),
            Action::Hold | Action::Wait => {}
        }
    }

    fn fill_buy(&mut self, bar: &DailyBar, decision: &Decision) {
        let budget = self.cash * decision.sizing_fraction;
        let quantity = (budget / bar.close).floor() as u64;
        if quantity == 0 {
            debug!(date = %bar.date, budget, "buy signal below one share; skipped");
            return;
        }

        let cost = quantity as f64 * bar.close;
        self.cash -= cost;

        let tranche = match self.position.as_mut() {
            None => {
                self.avg_cost = bar.close;
                self.position = Some(PositionState::opened(
                    self.next_position_id,
                    self.symbol.clone(),
                    bar.close,
                    quantity,
                    self.cash,
                ));
                self.next_position_id += 1;
                1
            }
            Some(pos) => {
                let held = pos.quantity as f64;
                self.avg_cost =
                    (self.avg_cost * held + cost) / (held + quantity as f64);
                pos.quantity += quantity;
                pos.buy_count += 1;
                pos.remaining_cash = self.cash;
                pos.buy_count
            }
        };

        self.trades.push(TradeRecord {
            date: bar.date,
            action: Action::Buy,
            reason: decision.reason,
            tranche,
            quantity,
            price: bar.close,
            amount: cost,
            capital_after: self.cash,
            realized_pnl: None,
            realized_pnl_pct: None,
        });
    }

    fn fill_sell(&mut self, engine: &SwingEngine<MemoryStore>, bar: &DailyBar, decision: &Decision) {
        let Some(pos) = self.position.as_mut() else {
            return;
        };

        let mut quantity = (pos.quantity as f64 * decision.sizing_fraction).floor() as u64;
        if quantity == 0 {
            // A holding too small to split liquidates in one go.
            quantity = pos.quantity;
        }

        let proceeds = quantity as f64 * bar.close;
        let realized_pnl = (bar.close - self.avg_cost) * quantity as f64;
        let realized_pnl_pct = if self.avg_cost > 0.0 {
            (bar.close / self.avg_cost - 1.0) * 100.0
        } else {
            0.0
        };

        self.cash += proceeds;
        pos.quantity -= quantity;
        pos.sell_count += 1;
        pos.remaining_cash = self.cash;

        self.trades.push(TradeRecord {
            date: bar.date,
            action: Action::Sell,
            reason: decision.reason,
            tranche: pos.sell_count,
            quantity,
            price: bar.close,
            amount: proceeds,
            capital_after: self.cash,
            realized_pnl: Some(realized_pnl),
            realized_pnl_pct: Some(realized_pnl_pct),
        });

        if pos.quantity == 0 {
            engine.clear_position_records(pos.position_id);
            self.position = None;
            self.avg_cost = 0.0;
        }
    }
}

fn day_change_pct(prev_close: f64, close: f64) -> f64 {
    if prev_close <= 0.0 {
        return 0.0;
    }
    (close - prev_close) / prev_close * 100.0
}
