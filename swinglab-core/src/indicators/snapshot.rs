//! Snapshot assembly: raw tick inputs + price history → [`IndicatorSnapshot`].
//!
//! This is the only place indicator values are computed for the evaluators.
//! Live mode normalizes the flow quantities into percentage ratios; backtest
//! mode derives the OBV z-score and the rolling reference volume from the
//! same appended series the realtime EMA uses.

use super::ema::realtime_ema;
use super::obv::{latest_obv_delta, latest_obv_z, obv_series};
use crate::config::StrategyConfig;
use crate::domain::{FlowReading, IndicatorSnapshot};
use crate::error::InvalidInput;

/// Minimum sessions in the rolling volume window before the volume
/// condition can pass.
const MIN_VOLUME_SAMPLES: usize = 5;

/// Prior-session history, oldest first. Closes and volumes are parallel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    pub closes: Vec<f64>,
    pub volumes: Vec<i64>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, close: f64, volume: i64) {
        self.closes.push(close);
        self.volumes.push(volume);
    }

    pub fn len(&self) -> usize {
        self.closes.len().min(self.volumes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Raw per-tick market inputs, before indicator normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct TickQuote {
    /// Current price (live quote, or bar close in backtest).
    pub price: f64,
    /// Session-to-date traded volume.
    pub cumulative_volume: i64,
    /// Prior-session volume. Live mode only — backtest derives its rolling
    /// reference from the history instead.
    pub reference_volume: i64,
    /// Same-day change, percent.
    pub day_change_pct: f64,
}

/// Mode-dependent raw flow inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowInputs {
    /// Net buy quantities straight off the realtime feed.
    Live {
        foreign_net_qty: i64,
        program_net_qty: i64,
    },
    /// No realtime feed; flow is derived from the bar history.
    Backtest,
}

/// Assemble the indicator snapshot for one evaluation tick.
///
/// Deterministic given the same inputs; rejects inputs the engine must not
/// trade on. A zero cumulative volume is not a rejection — the flow ratios
/// resolve to 0.0, which reads as "no flow signal yet".
pub fn compute_snapshot(
    symbol: &str,
    history: &PriceHistory,
    quote: &TickQuote,
    flow_inputs: FlowInputs,
    cfg: &StrategyConfig,
) -> Result<IndicatorSnapshot, InvalidInput> {
    if !quote.price.is_finite() || quote.price <= 0.0 {
        return Err(InvalidInput::InvalidPrice(quote.price));
    }
    if quote.cumulative_volume < 0 {
        return Err(InvalidInput::NegativeVolume {
            field: "cumulative_volume",
            value: quote.cumulative_volume,
        });
    }
    if quote.reference_volume < 0 {
        return Err(InvalidInput::NegativeVolume {
            field: "reference_volume",
            value: quote.reference_volume,
        });
    }
    if let Some(&v) = history.volumes.iter().find(|&&v| v < 0) {
        return Err(InvalidInput::NegativeVolume {
            field: "history_volume",
            value: v,
        });
    }

    let ema20 = realtime_ema(&history.closes, quote.price, cfg.ema_period).ok_or(
        InvalidInput::InsufficientHistory {
            have: history.closes.len(),
            need: cfg.ema_period,
        },
    )?;
    if ema20 <= 0.0 {
        return Err(InvalidInput::NonPositiveEma(ema20));
    }

    let deviation = (quote.price - ema20) / ema20;

    let (flow, reference_volume) = match flow_inputs {
        FlowInputs::Live {
            foreign_net_qty,
            program_net_qty,
        } => {
            let flow = FlowReading::Live {
                foreign_ratio: flow_ratio(foreign_net_qty, quote.cumulative_volume),
                program_ratio: flow_ratio(program_net_qty, quote.cumulative_volume),
            };
            (flow, quote.reference_volume)
        }
        FlowInputs::Backtest => {
            // Append the current sample so today's close direction and
            // volume participate, mirroring the realtime EMA input.
            let mut closes = history.closes.clone();
            closes.push(quote.price);
            let mut volumes: Vec<f64> = history.volumes.iter().map(|&v| v as f64).collect();
            volumes.push(quote.cumulative_volume as f64);

            let obv = obv_series(&closes, &volumes);
            let flow = FlowReading::Backtest {
                obv_z: latest_obv_z(&obv, cfg.obv_lookback),
                obv_delta: latest_obv_delta(&obv),
            };
            let reference = rolling_volume_reference(
                &history.volumes,
                quote.cumulative_volume,
                cfg.volume_ma_period,
            );
            (flow, reference)
        }
    };

    Ok(IndicatorSnapshot {
        symbol: symbol.to_string(),
        price: quote.price,
        ema20,
        deviation,
        cumulative_volume: quote.cumulative_volume,
        reference_volume,
        day_change_pct: quote.day_change_pct,
        flow,
    })
}

/// Net buy quantity as a percentage of cumulative volume.
/// Divide-by-zero guard: zero volume means no flow signal yet, not an error.
fn flow_ratio(net_qty: i64, cumulative_volume: i64) -> f64 {
    if cumulative_volume <= 0 {
        return 0.0;
    }
    net_qty as f64 / cumulative_volume as f64 * 100.0
}

/// Rolling mean volume over the trailing window, today's session included.
/// Returns 0 (volume condition cannot pass) until enough sessions exist.
fn rolling_volume_reference(history: &[i64], today: i64, window: usize) -> i64 {
    let mut samples: Vec<i64> = history
        .iter()
        .copied()
        .rev()
        .take(window.saturating_sub(1))
        .collect();
    samples.push(today);

    if samples.len() < MIN_VOLUME_SAMPLES {
        return 0;
    }
    (samples.iter().sum::<i64>() as f64 / samples.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, ema_series};

    fn history(n: usize) -> PriceHistory {
        let mut h = PriceHistory::new();
        for i in 0..n {
            h.push(100.0 + i as f64 * 0.2, 1_000_000 + (i as i64 % 7) * 10_000);
        }
        h
    }

    fn quote(price: f64) -> TickQuote {
        TickQuote {
            price,
            cumulative_volume: 1_500_000,
            reference_volume: 1_000_000,
            day_change_pct: 1.0,
        }
    }

    #[test]
    fn live_snapshot_ratios() {
        let cfg = StrategyConfig::live();
        let snap = compute_snapshot(
            "005930",
            &history(30),
            &quote(108.0),
            FlowInputs::Live {
                foreign_net_qty: 52_500,
                program_net_qty: 19_500,
            },
            &cfg,
        )
        .unwrap();

        match snap.flow {
            FlowReading::Live {
                foreign_ratio,
                program_ratio,
            } => {
                assert_approx(foreign_ratio, 3.5, 1e-9);
                assert_approx(program_ratio, 1.3, 1e-9);
            }
            _ => panic!("expected live flow"),
        }
        assert_eq!(snap.reference_volume, 1_000_000);
    }

    #[test]
    fn zero_cumulative_volume_yields_zero_ratios() {
        let cfg = StrategyConfig::live();
        let mut q = quote(108.0);
        q.cumulative_volume = 0;
        let snap = compute_snapshot(
            "005930",
            &history(30),
            &q,
            FlowInputs::Live {
                foreign_net_qty: 50_000,
                program_net_qty: -20_000,
            },
            &cfg,
        )
        .unwrap();

        assert_eq!(
            snap.flow,
            FlowReading::Live {
                foreign_ratio: 0.0,
                program_ratio: 0.0
            }
        );
    }

    #[test]
    fn ema_matches_series_with_current_appended() {
        let cfg = StrategyConfig::live();
        let h = history(30);
        let snap = compute_snapshot(
            "005930",
            &h,
            &quote(108.0),
            FlowInputs::Live {
                foreign_net_qty: 0,
                program_net_qty: 0,
            },
            &cfg,
        )
        .unwrap();

        let mut series = h.closes.clone();
        series.push(108.0);
        let expected = *ema_series(&series, cfg.ema_period).last().unwrap();
        assert_approx(snap.ema20, expected, 1e-9);
        assert_approx(snap.deviation, (108.0 - expected) / expected, 1e-12);
    }

    #[test]
    fn insufficient_history_is_rejected() {
        let cfg = StrategyConfig::live();
        let err = compute_snapshot(
            "005930",
            &history(10),
            &quote(108.0),
            FlowInputs::Live {
                foreign_net_qty: 0,
                program_net_qty: 0,
            },
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, InvalidInput::InsufficientHistory { .. }));
    }

    #[test]
    fn negative_volume_is_rejected() {
        let cfg = StrategyConfig::live();
        let mut q = quote(108.0);
        q.cumulative_volume = -5;
        let err = compute_snapshot(
            "005930",
            &history(30),
            &q,
            FlowInputs::Live {
                foreign_net_qty: 0,
                program_net_qty: 0,
            },
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, InvalidInput::NegativeVolume { .. }));
    }

    #[test]
    fn backtest_snapshot_has_obv_flow_and_rolling_reference() {
        let cfg = StrategyConfig::backtest();
        let h = history(30);
        let snap = compute_snapshot("005930", &h, &quote(108.0), FlowInputs::Backtest, &cfg)
            .unwrap();

        assert!(matches!(snap.flow, FlowReading::Backtest { .. }));
        // 19 history sessions + today, all near 1M → reference near 1M.
        assert!(snap.reference_volume > 900_000);
    }

    #[test]
    fn backtest_reference_needs_minimum_sessions() {
        // Window of 20 but only 2 history sessions + today = 3 samples.
        assert_eq!(rolling_volume_reference(&[1_000_000, 1_000_000], 1_000_000, 20), 0);
        // Exactly five samples is enough.
        let hist = [1_000_000; 4];
        assert_eq!(
            rolling_volume_reference(&hist, 1_000_000, 20),
            1_000_000
        );
    }
}
