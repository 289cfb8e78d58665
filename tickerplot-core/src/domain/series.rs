//! PriceSeries and inclusive date-range selection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::PriceBar;
use super::interval::IntervalSelector;

/// Bound format accepted by [`DateRange::parse`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from range parsing and filtering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDateFormat { value: String },
}

/// One of the four price columns of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl PriceField {
    pub const ALL: [PriceField; 4] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
        }
    }

    pub fn value(self, bar: &PriceBar) -> f64 {
        match self {
            Self::Open => bar.open,
            Self::High => bar.high,
            Self::Low => bar.low,
            Self::Close => bar.close,
        }
    }
}

/// Price history for one symbol at one interval.
///
/// Bars are unique per timestamp but carry no ordering guarantee until the
/// series has been through [`PriceSeries::within`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval: IntervalSelector,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, interval: IntervalSelector, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Sorted copy holding only the bars whose date falls inside `range`.
    ///
    /// An absent bound resolves to the series' own min/max date, so an
    /// unbounded range returns the whole series sorted. An empty intersection
    /// yields an empty series.
    pub fn within(&self, range: &DateRange) -> PriceSeries {
        let mut bars = self.bars.clone();
        bars.sort_by_key(|b| b.timestamp);

        if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
            let lower = range.start.unwrap_or_else(|| first.date());
            let upper = range.end.unwrap_or_else(|| last.date());
            bars.retain(|b| lower <= b.date() && b.date() <= upper);
        }

        PriceSeries::new(self.symbol.clone(), self.interval, bars)
    }

    /// Date labels (`YYYY-MM-DD`) in bar order.
    pub fn date_labels(&self) -> Vec<String> {
        self.bars
            .iter()
            .map(|b| b.date().format(DATE_FORMAT).to_string())
            .collect()
    }

    /// One price column in bar order.
    pub fn column(&self, field: PriceField) -> Vec<f64> {
        self.bars.iter().map(|b| field.value(b)).collect()
    }
}

/// Inclusive calendar window; `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse optional `YYYY-MM-DD` bounds.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, FilterError> {
        Ok(Self {
            start: start.map(parse_date_bound).transpose()?,
            end: end.map(parse_date_bound).transpose()?,
        })
    }

    /// False only when both bounds are present and `start > end`.
    pub fn is_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) => s <= e,
            _ => true,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| s <= date) && self.end.map_or(true, |e| date <= e)
    }
}

/// Parse a bound in exactly `YYYY-MM-DD` form (zero-padded, dash separated).
pub fn parse_date_bound(value: &str) -> Result<NaiveDate, FilterError> {
    let invalid = || FilterError::InvalidDateFormat {
        value: value.to_string(),
    };

    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shape_ok {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// Sort `series` and narrow it to `[start, end]` given as `YYYY-MM-DD` strings.
pub fn filter_range(
    series: &PriceSeries,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<PriceSeries, FilterError> {
    let range = DateRange::parse(start, end)?;
    let filtered = series.within(&range);
    tracing::debug!(
        symbol = %series.symbol,
        input = series.len(),
        kept = filtered.len(),
        "filtered series to date range"
    );
    Ok(filtered)
}
