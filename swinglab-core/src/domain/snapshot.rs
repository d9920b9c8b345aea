//! Per-tick indicator snapshot.
//!
//! One snapshot per symbol per evaluation. Transient: recomputed each tick
//! from the price history and the live quote, never stored.

use super::flow::FlowReading;
use crate::error::InvalidInput;
use serde::{Deserialize, Serialize};

/// Everything the evaluators need to know about "now" for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub symbol: String,
    /// Current price (live quote, or the bar close in backtest).
    pub price: f64,
    /// Realtime EMA with the current price appended as the newest sample.
    pub ema20: f64,
    /// (price − EMA) / EMA.
    pub deviation: f64,
    /// Session-to-date traded volume.
    pub cumulative_volume: i64,
    /// Prior session volume (live) or rolling average volume (backtest).
    pub reference_volume: i64,
    /// Same-day change, percent (e.g. 4.0 for +4%).
    pub day_change_pct: f64,
    /// Mode-normalized order-flow observation.
    pub flow: FlowReading,
}

impl IndicatorSnapshot {
    /// Reject a snapshot the engine must not trade on.
    ///
    /// A rejected snapshot aborts the tick before any state is read or
    /// written; the decision defaults to HOLD at the caller.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(InvalidInput::InvalidPrice(self.price));
        }
        if !self.ema20.is_finite() || self.ema20 <= 0.0 {
            return Err(InvalidInput::NonPositiveEma(self.ema20));
        }
        if self.cumulative_volume < 0 {
            return Err(InvalidInput::NegativeVolume {
                field: "cumulative_volume",
                value: self.cumulative_volume,
            });
        }
        if self.reference_volume < 0 {
            return Err(InvalidInput::NegativeVolume {
                field: "reference_volume",
                value: self.reference_volume,
            });
        }
        if !self.deviation.is_finite() {
            return Err(InvalidInput::NonFiniteField {
                field: "deviation",
                value: self.deviation,
            });
        }
        if !self.day_change_pct.is_finite() {
            return Err(InvalidInput::NonFiniteField {
                field: "day_change_pct",
                value: self.day_change_pct,
            });
        }
        if !self.flow.is_finite() {
            return Err(InvalidInput::NonFiniteField {
                field: "flow",
                value: f64::NAN,
            });
        }
        Ok(())
    }

    /// Cumulative volume as a multiple of the reference volume.
    /// A zero reference means "no volume signal yet", not an error.
    pub fn volume_ratio(&self) -> f64 {
        if self.reference_volume <= 0 {
            return 0.0;
        }
        self.cumulative_volume as f64 / self.reference_volume as f64
    }

    /// Price sits below the trend baseline.
    pub fn below_ema(&self) -> bool {
        self.price < self.ema20
    }

    /// How far below the EMA the price sits (only meaningful below it).
    pub fn ema_gap(&self) -> f64 {
        self.ema20 - self.price
    }
}
