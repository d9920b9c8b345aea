//! Daily bar ingestion from CSV.
//!
//! Expected header: `date,open,high,low,close,volume` with ISO dates.
//! Bars must arrive oldest-first; validation rejects unsorted input and
//! malformed OHLC rather than letting it reach the engine.

use crate::error::RunnerError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl DailyBar {
    fn validate(&self) -> Result<(), String> {
        if !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
        {
            return Err(format!("{}: non-finite price", self.date));
        }
        if self.low <= 0.0 {
            return Err(format!("{}: non-positive low {}", self.date, self.low));
        }
        if self.high < self.low {
            return Err(format!(
                "{}: high {} below low {}",
                self.date, self.high, self.low
            ));
        }
        if self.close < self.low || self.close > self.high {
            return Err(format!(
                "{}: close {} outside [{}, {}]",
                self.date, self.close, self.low, self.high
            ));
        }
        if self.open < self.low || self.open > self.high {
            return Err(format!(
                "{}: open {} outside [{}, {}]",
                self.date, self.open, self.low, self.high
            ));
        }
        if self.volume < 0 {
            return Err(format!("{}: negative volume {}", self.date, self.volume));
        }
        Ok(())
    }
}

/// Load and validate a daily bar series from a CSV file.
pub fn load_bars_csv(path: impl AsRef<Path>) -> Result<Vec<DailyBar>, RunnerError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut bars: Vec<DailyBar> = Vec::new();

    for row in reader.deserialize() {
        let bar: DailyBar = row?;
        bar.validate().map_err(RunnerError::Validation)?;

        if let Some(prev) = bars.last() {
            if bar.date <= prev.date {
                return Err(RunnerError::Validation(format!(
                    "bars out of order: {} after {}",
                    bar.date, prev.date
                )));
            }
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(RunnerError::Validation("no bars in file".into()));
    }

    Ok(bars)
}
