//! Structured error types for snapshot validation.
//!
//! A rejected snapshot aborts the tick: the engine returns the error to the
//! caller, emits no BUY/SELL, and mutates no state. Store-side failures are
//! a separate family ([`crate::state::StateStoreError`]) because the engine
//! degrades on those instead of aborting.

use thiserror::Error;

/// A snapshot that must not be traded on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("EMA must be positive, got {0}")]
    NonPositiveEma(f64),

    #[error("price must be finite and positive, got {0}")]
    InvalidPrice(f64),

    #[error("volume cannot be negative: {field} = {value}")]
    NegativeVolume { field: &'static str, value: i64 },

    #[error("non-finite {field}: {value}")]
    NonFiniteField { field: &'static str, value: f64 },

    #[error("insufficient price history: have {have} closes, need {need}")]
    InsufficientHistory { have: usize, need: usize },
}
