//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! alpha = 2 / (period + 1).

/// Compute the EMA over a raw f64 series.
///
/// Returns a series of the same length; the first `period - 1` values are
/// `f64::NAN` (warmup). A NaN input taints every value from its position on.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    // Seed: SMA of first `period` values
    let mut sum = 0.0;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            return result;
        }
        sum += v;
    }
    let seed = sum / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

/// Realtime EMA: prior session closes with the current price appended as
/// the most recent sample.
///
/// Recomputed from scratch on every call so that identical inputs always
/// produce identical output — the live poll loop and the historical replay
/// must not diverge through hidden smoothing state.
///
/// Returns `None` when fewer than `period` prior closes are available.
pub fn realtime_ema(closes: &[f64], current_price: f64, period: usize) -> Option<f64> {
    if closes.len() < period {
        return None;
    }

    let mut series = Vec::with_capacity(closes.len() + 1);
    series.extend_from_slice(closes);
    series.push(current_price);

    let ema = ema_series(&series, period);
    match ema.last() {
        Some(&v) if !v.is_nan() => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_input() {
        let result = ema_series(&[100.0, 200.0, 300.0], 1);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // Closes: 10, 11, 12, 13, 14
        // alpha = 2/(3+1) = 0.5
        // Seed at index 2: SMA(10,11,12) = 11.0
        // EMA[3] = 0.5*13 + 0.5*11.0 = 12.0
        // EMA[4] = 0.5*14 + 0.5*12.0 = 13.0
        let result = ema_series(&[10.0, 11.0, 12.0, 13.0, 14.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_nan_in_seed_produces_all_nan() {
        let result = ema_series(&[10.0, f64::NAN, 12.0, 13.0], 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_nan_after_seed_propagates() {
        let result = ema_series(&[10.0, 11.0, 12.0, f64::NAN, 14.0], 3);
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
    }

    #[test]
    fn realtime_ema_appends_current_price() {
        // History 10,11,12 with current 13 must equal ema_series over
        // 10,11,12,13.
        let direct = ema_series(&[10.0, 11.0, 12.0, 13.0], 3);
        let realtime = realtime_ema(&[10.0, 11.0, 12.0], 13.0, 3).unwrap();
        assert_approx(realtime, direct[3], DEFAULT_EPSILON);
    }

    #[test]
    fn realtime_ema_requires_full_period_of_history() {
        assert!(realtime_ema(&[10.0, 11.0], 12.0, 3).is_none());
        assert!(realtime_ema(&[10.0, 11.0, 12.0], 13.0, 3).is_some());
    }

    #[test]
    fn realtime_ema_is_deterministic() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64) * 0.5).collect();
        let a = realtime_ema(&closes, 121.0, 20).unwrap();
        let b = realtime_ema(&closes, 121.0, 20).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
