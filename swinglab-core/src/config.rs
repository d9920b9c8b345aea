//! Strategy configuration.
//!
//! Every threshold the evaluators consult lives in one explicit struct,
//! passed into the engine at construction. The two mode constructors differ
//! only where the modes genuinely differ: the confirmation count (a daily
//! close already encodes same-day confirmation, so backtest needs one
//! observation where live needs two).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which condition source feeds the flow-based rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingMode {
    /// Real-time foreign/program net-buy ratios, 5–10 minute poll loop.
    Live,
    /// OBV z-score substitute, one evaluation per historical daily bar.
    Backtest,
}

/// All tunable thresholds for the entry gate and exit chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub mode: TradingMode,

    /// EMA period for the trend baseline.
    pub ema_period: usize,
    /// Maximum (price − EMA)/EMA deviation allowed at entry.
    pub max_deviation: f64,

    /// Single-ratio strength threshold (foreign or program), percent.
    pub flow_strong_threshold: f64,
    /// Combined foreign + program threshold, percent.
    pub flow_total_threshold: f64,
    /// OBV z-score entry threshold (backtest substitute for flow strength).
    pub obv_z_buy_threshold: f64,
    /// A ratio may decay to this fraction of its prior sample and still
    /// count as maintained.
    pub flow_persistence_decay: f64,

    /// Cumulative volume must reach this multiple of the reference volume.
    pub volume_ratio_threshold: f64,
    /// Maximum same-day gain at entry (fraction; anti-chase filter).
    pub max_surge: f64,

    /// Fixed stop-loss on return since entry (negative fraction).
    pub stop_loss: f64,
    /// Flow-reversal exit threshold, percent (rule 2).
    pub flow_reversal_threshold: f64,
    /// OBV z-score reversal threshold (backtest substitute for rule 2).
    pub obv_z_sell_threshold: f64,
    /// Both ratios below this percent counts as weakened flow (rule 4).
    pub weak_flow_threshold: f64,
    /// |z| at or below this counts as stalled OBV (backtest rule 4).
    pub obv_z_weak_threshold: f64,

    /// Consecutive true evaluations of the entry predicate before a BUY.
    pub required_confirmations: u32,
    /// Consecutive below-EMA evaluations before the breach exit fires.
    pub required_breaches: u32,

    /// Fraction of remaining cash committed by the first buy tranche.
    pub buy_ratio: f64,
    /// Fraction of held quantity closed by the first sell tranche.
    pub sell_ratio: f64,

    /// Lookback for the OBV delta z-score.
    pub obv_lookback: usize,
    /// Rolling window for the backtest reference volume.
    pub volume_ma_period: usize,

    /// TTL for entry confirmation records, seconds.
    pub entry_ttl_secs: u64,
    /// TTL for EMA-breach and trend-gap records, seconds.
    pub breach_ttl_secs: u64,
}

impl StrategyConfig {
    /// Live-mode defaults: real-time flow ratios, two-tick confirmation.
    pub fn live() -> Self {
        Self {
            mode: TradingMode::Live,
            ema_period: 20,
            max_deviation: 0.02,
            flow_strong_threshold: 3.0,
            flow_total_threshold: 4.5,
            obv_z_buy_threshold: 1.0,
            flow_persistence_decay: 0.8,
            volume_ratio_threshold: 1.2,
            max_surge: 0.07,
            stop_loss: -0.03,
            flow_reversal_threshold: -2.0,
            obv_z_sell_threshold: -1.0,
            weak_flow_threshold: 1.0,
            obv_z_weak_threshold: 0.3,
            required_confirmations: 2,
            required_breaches: 2,
            buy_ratio: 0.5,
            sell_ratio: 0.5,
            obv_lookback: 7,
            volume_ma_period: 20,
            entry_ttl_secs: 900,
            breach_ttl_secs: 600,
        }
    }

    /// Backtest-mode defaults: OBV substitute, single-tick confirmation.
    pub fn backtest() -> Self {
        Self {
            mode: TradingMode::Backtest,
            required_confirmations: 1,
            ..Self::live()
        }
    }

    pub fn entry_ttl(&self) -> Duration {
        Duration::from_secs(self.entry_ttl_secs)
    }

    pub fn breach_ttl(&self) -> Duration {
        Duration::from_secs(self.breach_ttl_secs)
    }

    /// Sanity-check the tranche ratios and thresholds.
    ///
    /// Called by the engine constructor; a config that fails here is a
    /// programming error, not a market condition, hence the panic.
    pub fn assert_valid(&self) {
        assert!(self.ema_period >= 1, "ema_period must be >= 1");
        assert!(
            (0.0..=1.0).contains(&self.buy_ratio),
            "buy_ratio must be within 0..=1"
        );
        assert!(
            (0.0..=1.0).contains(&self.sell_ratio),
            "sell_ratio must be within 0..=1"
        );
        assert!(self.stop_loss < 0.0, "stop_loss must be negative");
        assert!(
            self.required_confirmations >= 1,
            "required_confirmations must be >= 1"
        );
        assert!(self.required_breaches >= 1, "required_breaches must be >= 1");
        assert!(self.obv_lookback >= 3, "obv_lookback must be >= 3");
    }
}
