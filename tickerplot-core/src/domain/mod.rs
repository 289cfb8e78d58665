//! Domain types for tickerplot

pub mod bar;
pub mod interval;
pub mod series;

pub use bar::PriceBar;
pub use interval::{IntervalSelector, UnknownInterval};
pub use series::{
    filter_range, parse_date_bound, DateRange, FilterError, PriceField, PriceSeries, DATE_FORMAT,
};

/// Symbol type alias
pub type Symbol = String;
