//! Serializable backtest run configuration.

use crate::error::RunnerError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use swinglab_core::config::StrategyConfig;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Everything needed to reproduce a backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Strategy thresholds; the replay forces backtest mode.
    pub strategy: StrategyConfig,

    /// Starting cash.
    pub initial_capital: f64,

    /// First date decisions are acted on (earlier bars only warm up the
    /// indicators). `None` evaluates from the first computable bar.
    pub eval_start: Option<NaiveDate>,
}

impl RunConfig {
    /// Backtest defaults with the given starting cash.
    pub fn with_capital(initial_capital: f64) -> Self {
        Self {
            strategy: StrategyConfig::backtest(),
            initial_capital,
            eval_start: None,
        }
    }

    /// Parse a TOML run config.
    pub fn from_toml(text: &str) -> Result<Self, RunnerError> {
        Ok(toml::from_str(text)?)
    }

    /// Deterministic hash id for this configuration.
    ///
    /// Two runs with identical configs share a RunId, which makes results
    /// cacheable and comparable across machines.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_vec(self).expect("RunConfig serialization failed");
        blake3::hash(&json).to_hex().to_string()
    }
}
