//! PriceBar: one open/high/low/close observation.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// OHLC bar for a single symbol at a single timestamp.
///
/// Daily, weekly and monthly bars carry a midnight timestamp; intraday bars
/// carry the provider's bar time. Filtering always works on the calendar
/// date (`date()`), so both kinds share one key type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// Bar keyed at midnight of `date` (daily and coarser intervals).
    pub fn daily(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp: date.and_time(chrono::NaiveTime::MIN),
            open,
            high,
            low,
            close,
        }
    }

    /// Calendar date of the bar.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }
}
