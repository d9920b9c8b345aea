//! Multi-symbol fan-out.
//!
//! Symbols are independent — each replay owns its engine and store, so the
//! universe runs embarrassingly parallel. A symbol whose replay fails is
//! logged and skipped; it never poisons the rest of the universe.

use crate::config::RunConfig;
use crate::data_loader::DailyBar;
use crate::replay::run_backtest;
use crate::result::BacktestResult;
use rayon::prelude::*;
use tracing::warn;

/// One symbol's bar series, ready to replay.
#[derive(Debug, Clone)]
pub struct SymbolBars {
    pub symbol: String,
    pub bars: Vec<DailyBar>,
}

/// Replay every symbol under the same run configuration.
pub fn run_universe(universe: &[SymbolBars], config: &RunConfig) -> Vec<BacktestResult> {
    universe
        .par_iter()
        .filter_map(|entry| match run_backtest(&entry.symbol, &entry.bars, config) {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(symbol = %entry.symbol, %err, "replay failed; symbol skipped");
                None
            }
        })
        .collect()
}
