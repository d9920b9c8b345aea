//! Mode-normalized order-flow reading.
//!
//! Live mode sees real foreign/program net-buy ratios; backtest mode only
//! has daily bars, so an OBV z-score stands in. Both variants answer the
//! same four questions — entry strength, entry persistence, exit reversal,
//! exit weakening — which is the whole surface the evaluators consume. The
//! evaluators never branch on mode.

use crate::config::StrategyConfig;
use serde::{Deserialize, Serialize};

/// One order-flow observation, normalized across modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FlowReading {
    /// Real-time flow: net buy quantity as a percentage of cumulative
    /// session volume, per participant class.
    Live {
        foreign_ratio: f64,
        program_ratio: f64,
    },
    /// Backtest substitute: standardized OBV delta plus the raw delta.
    Backtest { obv_z: f64, obv_delta: f64 },
}

impl FlowReading {
    /// Entry condition: is buying pressure strong enough to enter?
    ///
    /// Live: one ratio clears the single threshold AND the sum clears the
    /// combined threshold. Backtest: z-score above the buy threshold.
    pub fn entry_strength(&self, cfg: &StrategyConfig) -> bool {
        match *self {
            FlowReading::Live {
                foreign_ratio,
                program_ratio,
            } => {
                (foreign_ratio >= cfg.flow_strong_threshold
                    || program_ratio >= cfg.flow_strong_threshold)
                    && foreign_ratio + program_ratio >= cfg.flow_total_threshold
            }
            FlowReading::Backtest { obv_z, .. } => obv_z > cfg.obv_z_buy_threshold,
        }
    }

    /// Entry condition: has the flow held up since the previous evaluation?
    ///
    /// `prior` carries the (foreign, program) ratios recorded on the last
    /// tick, if any. With no prior record this is true by definition —
    /// a first observation has nothing to decay from.
    pub fn entry_persistence(&self, prior: Option<(f64, f64)>, cfg: &StrategyConfig) -> bool {
        match *self {
            FlowReading::Live {
                foreign_ratio,
                program_ratio,
            } => match prior {
                Some((prev_foreign, prev_program)) => {
                    foreign_ratio >= prev_foreign * cfg.flow_persistence_decay
                        || program_ratio >= prev_program * cfg.flow_persistence_decay
                }
                None => true,
            },
            // Daily bars: OBV not falling is the persistence signal.
            FlowReading::Backtest { obv_delta, .. } => obv_delta >= 0.0,
        }
    }

    /// Exit rule 2: has the flow reversed hard into net selling?
    pub fn exit_reversal(&self, cfg: &StrategyConfig) -> bool {
        match *self {
            FlowReading::Live {
                foreign_ratio,
                program_ratio,
            } => {
                foreign_ratio <= cfg.flow_reversal_threshold
                    || program_ratio <= cfg.flow_reversal_threshold
            }
            FlowReading::Backtest { obv_z, .. } => obv_z < cfg.obv_z_sell_threshold,
        }
    }

    /// Exit rule 4, flow side: has buying interest gone quiet?
    ///
    /// Only meaningful below the EMA; the evaluator supplies that guard.
    pub fn exit_weakening(&self, cfg: &StrategyConfig) -> bool {
        match *self {
            FlowReading::Live {
                foreign_ratio,
                program_ratio,
            } => {
                foreign_ratio < cfg.weak_flow_threshold && program_ratio < cfg.weak_flow_threshold
            }
            FlowReading::Backtest { obv_z, .. } => obv_z.abs() <= cfg.obv_z_weak_threshold,
        }
    }

    /// The (foreign, program) ratios to record in the confirmation state.
    /// Backtest readings record zeros — persistence there reads the OBV
    /// delta from the snapshot, not the stored ratios.
    pub fn recorded_ratios(&self) -> (f64, f64) {
        match *self {
            FlowReading::Live {
                foreign_ratio,
                program_ratio,
            } => (foreign_ratio, program_ratio),
            FlowReading::Backtest { .. } => (0.0, 0.0),
        }
    }

    /// All carried values are finite (validation hook for the snapshot).
    pub fn is_finite(&self) -> bool {
        match *self {
            FlowReading::Live {
                foreign_ratio,
                program_ratio,
            } => foreign_ratio.is_finite() && program_ratio.is_finite(),
            FlowReading::Backtest { obv_z, obv_delta } => {
                obv_z.is_finite() && obv_delta.is_finite()
            }
        }
    }
}
