//! Typed state records and their transition functions.
//!
//! Each record is first-class: the transition from (prior record, current
//! observation) to the successor record is a pure function here, and the
//! store is only the durability layer. The evaluators call these; nothing
//! in this module performs I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry-gate debounce record, keyed by symbol. TTL 15 minutes — a streak
/// that old is stale, and an expired record safely restarts the count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfirmationState {
    /// Did the composite entry predicate hold on the last evaluation?
    pub signal: bool,
    /// Length of the current consecutive-true streak.
    pub consecutive: u32,
    /// Flow ratios recorded for the persistence check on the next tick.
    pub foreign_ratio: f64,
    pub program_ratio: f64,
    pub last_update: DateTime<Utc>,
}

impl EntryConfirmationState {
    /// Advance the streak: a true predicate extends it only if the prior
    /// evaluation was also true; any false observation resets it to zero.
    pub fn advance(prior: Option<&Self>, signal: bool, ratios: (f64, f64)) -> Self {
        let consecutive = if signal {
            match prior {
                Some(p) if p.signal => p.consecutive + 1,
                _ => 1,
            }
        } else {
            0
        };

        Self {
            signal,
            consecutive,
            foreign_ratio: ratios.0,
            program_ratio: ratios.1,
            last_update: Utc::now(),
        }
    }

    /// The ratios the persistence condition compares against.
    pub fn prior_ratios(&self) -> (f64, f64) {
        (self.foreign_ratio, self.program_ratio)
    }
}

/// Consecutive below-EMA counter, keyed by position id. TTL 10 minutes.
/// Deleted (not zeroed) the instant price recovers to the EMA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaBreachState {
    pub count: u32,
    pub last_price: f64,
    pub last_ema: f64,
    pub last_update: DateTime<Utc>,
}

impl EmaBreachState {
    /// One more below-EMA observation.
    pub fn breached(prior: Option<&Self>, price: f64, ema: f64) -> Self {
        Self {
            count: prior.map_or(1, |p| p.count + 1),
            last_price: price,
            last_ema: ema,
            last_update: Utc::now(),
        }
    }
}

/// Last below-EMA sample for deterioration tracking, keyed by position id.
/// TTL 10 minutes. Only exists while price sits below the EMA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendGapState {
    pub last_price: f64,
    /// EMA − price at the last sample.
    pub last_gap: f64,
    pub last_update: DateTime<Utc>,
}

impl TrendGapState {
    pub fn sample(price: f64, gap: f64) -> Self {
        Self {
            last_price: price,
            last_gap: gap,
            last_update: Utc::now(),
        }
    }

    /// Deterioration: price fell AND the below-EMA gap widened.
    pub fn deteriorated(&self, price: f64, gap: f64) -> bool {
        price < self.last_price && gap > self.last_gap
    }
}
