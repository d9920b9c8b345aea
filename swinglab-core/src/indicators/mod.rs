//! Indicator computation for the decision engine.
//!
//! Everything here is a pure function of the series passed in: the realtime
//! EMA is recomputed per call from the history input (no incremental
//! smoothing state carried between calls), and the OBV z-score is derived
//! from the same appended series. Determinism given identical inputs is the
//! contract the backtest replay depends on.

pub mod ema;
pub mod obv;
pub mod snapshot;

pub use ema::{ema_series, realtime_ema};
pub use obv::{latest_obv_delta, latest_obv_z, obv_series};
pub use snapshot::{compute_snapshot, FlowInputs, PriceHistory, TickQuote};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;
