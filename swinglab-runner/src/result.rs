//! Backtest result types and summary metrics.

use crate::config::RunId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use swinglab_core::domain::{Action, Reason};

/// One executed trade in the replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub action: Action,
    pub reason: Reason,
    /// Which tranche this was (1 or 2).
    pub tranche: u8,
    pub quantity: u64,
    pub price: f64,
    pub amount: f64,
    /// Cash after the trade settled.
    pub capital_after: f64,
    /// Realized PnL against average cost; sells only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_pnl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_pnl_pct: Option<f64>,
}

/// Result of replaying one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub run_id: RunId,
    pub symbol: String,
    pub initial_capital: f64,
    /// Cash at the end of the replay.
    pub final_capital: f64,
    /// Cash plus any open position marked at the last close.
    pub ending_equity: f64,
    pub total_return_pct: f64,
    pub trades: Vec<TradeRecord>,
    /// Bars the engine actually evaluated (after warmup / eval_start).
    pub bars_evaluated: usize,
}

impl BacktestResult {
    pub fn buy_count(&self) -> usize {
        self.trades
            .iter()
            .filter(|t| t.action == Action::Buy)
            .count()
    }

    pub fn sell_count(&self) -> usize {
        self.trades
            .iter()
            .filter(|t| t.action == Action::Sell)
            .count()
    }

    /// Fraction of sells that realized a profit. `None` with no sells.
    pub fn win_rate(&self) -> Option<f64> {
        let sells: Vec<_> = self
            .trades
            .iter()
            .filter(|t| t.action == Action::Sell)
            .collect();
        if sells.is_empty() {
            return None;
        }
        let wins = sells
            .iter()
            .filter(|t| t.realized_pnl.unwrap_or(0.0) > 0.0)
            .count();
        Some(wins as f64 / sells.len() as f64)
    }
}
