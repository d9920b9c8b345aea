//! On-Balance-Volume and its standardized delta.
//!
//! OBV is the backtest substitute for real order-flow data: add the
//! session's volume on an up-close, subtract it on a down-close, carry it
//! unchanged on an equal close. The z-score standardizes the latest OBV
//! delta against a short rolling window of deltas, which is what the flow
//! thresholds are calibrated on.

/// Minimum deltas in the window before a z-score is meaningful.
const MIN_WINDOW: usize = 3;

/// Cumulative OBV series. `closes` and `volumes` must be the same length.
///
/// The series starts at the first session's volume, matching the
/// conventional definition.
pub fn obv_series(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let n = closes.len().min(volumes.len());
    let mut result = Vec::with_capacity(n);
    if n == 0 {
        return result;
    }

    let mut obv = volumes[0];
    result.push(obv);

    for i in 1..n {
        if closes[i] > closes[i - 1] {
            obv += volumes[i];
        } else if closes[i] < closes[i - 1] {
            obv -= volumes[i];
        }
        result.push(obv);
    }

    result
}

/// The most recent session-over-session OBV change. Zero with fewer than
/// two samples.
pub fn latest_obv_delta(obv: &[f64]) -> f64 {
    match obv.len() {
        0 | 1 => 0.0,
        n => obv[n - 1] - obv[n - 2],
    }
}

/// Z-score of the latest OBV delta over a rolling window of deltas.
///
/// The window covers the last `lookback` deltas including the latest one.
/// Standard deviation is the sample deviation (n − 1 divisor). Degenerate
/// windows — fewer than three deltas, or zero deviation — yield 0.0, which
/// reads as "no flow signal" downstream rather than an error.
pub fn latest_obv_z(obv: &[f64], lookback: usize) -> f64 {
    if obv.len() < 2 {
        return 0.0;
    }

    let deltas: Vec<f64> = obv.windows(2).map(|w| w[1] - w[0]).collect();
    let window_len = deltas.len().min(lookback);
    if window_len < MIN_WINDOW {
        return 0.0;
    }

    let window = &deltas[deltas.len() - window_len..];
    let latest = window[window.len() - 1];

    let mean = window.iter().sum::<f64>() / window_len as f64;
    let variance = window
        .iter()
        .map(|d| (d - mean) * (d - mean))
        .sum::<f64>()
        / (window_len - 1) as f64;
    let stdev = variance.sqrt();

    if stdev == 0.0 {
        return 0.0;
    }

    (latest - mean) / stdev
}
