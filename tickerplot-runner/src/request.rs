//! Chart request: wires together catalog check, pipeline and renderer.
//!
//! One request runs: range check → catalog membership → credential →
//! fetch → filter → render. Every failure comes back as a `RequestError`
//! carrying a one-line message fit to show the user; nothing here panics or
//! aborts the process.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use tickerplot_core::config::{AppConfig, ConfigError};
use tickerplot_core::data::{CatalogUnavailable, DataProvider, FetchError, MarketDataPipeline, SymbolCatalog};
use tickerplot_core::domain::{DateRange, FilterError, IntervalSelector, PriceSeries, DATE_FORMAT};

use crate::render::{write_chart, ChartKind};

/// Errors from a chart request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Catalog(#[from] CatalogUnavailable),

    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("symbol '{0}' is not in the catalog")]
    UnknownSymbol(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("write chart to {}: {source}", dir.display())]
    Render {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RequestError {
    /// Short message for the user.
    ///
    /// Provider failures and empty results keep separate wording, but both
    /// name the symbol and interval that were attempted.
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(_) => "Cannot load symbol list.".into(),
            Self::InvalidRange { .. } => "Start date must be before end date.".into(),
            Self::UnknownSymbol(symbol) => {
                format!("Unknown symbol {symbol}. Please pick one from the symbol list.")
            }
            Self::Config(e) => format!("Configuration error: {e}."),
            Self::Fetch(FetchError::Provider { symbol, interval, .. }) => {
                format!("API call error for {symbol} with time series {interval}.")
            }
            Self::Fetch(FetchError::EmptyResult { symbol, interval }) => {
                format!("No data available for {symbol} with time series {interval}.")
            }
            Self::Filter(FilterError::InvalidDateFormat { value }) => {
                format!("Invalid date '{value}'. Use YYYY-MM-DD.")
            }
            Self::Render { .. } => "Could not write the chart file.".into(),
        }
    }
}

/// One user selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub symbol: String,
    pub interval: IntervalSelector,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub chart_kind: ChartKind,
}

impl ChartRequest {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

/// Result of a rendered chart request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutcome {
    pub artifact: PathBuf,
    pub symbol: String,
    pub interval: IntervalSelector,
    pub chart_kind: ChartKind,
    pub range: DateRange,
    /// Bars in the fetched series before filtering.
    pub fetched_count: usize,
    /// Bars drawn on the chart.
    pub bar_count: usize,
}

impl ChartOutcome {
    /// The requested window did not intersect the fetched data.
    pub fn is_empty_window(&self) -> bool {
        self.bar_count == 0
    }
}

/// Reject an inverted window or a symbol outside the catalog.
///
/// Runs before the credential is resolved or the provider is called.
fn check_selection(catalog: &SymbolCatalog, symbol: &str, range: &DateRange) -> Result<(), RequestError> {
    if !range.is_ordered() {
        if let (Some(start), Some(end)) = (range.start, range.end) {
            return Err(RequestError::InvalidRange { start, end });
        }
    }
    if !catalog.contains(symbol) {
        return Err(RequestError::UnknownSymbol(symbol.to_string()));
    }
    Ok(())
}

/// Fetch the series for `symbol`/`interval` and narrow it to `range`.
///
/// Shared by the chart request and the CSV export path. Returns the fetched
/// bar count alongside the filtered series.
pub fn load_series(
    config: &AppConfig,
    catalog: &SymbolCatalog,
    provider: &dyn DataProvider,
    symbol: &str,
    interval: IntervalSelector,
    range: &DateRange,
) -> Result<(usize, PriceSeries), RequestError> {
    check_selection(catalog, symbol, range)?;

    let credential = config.credential()?;
    let pipeline = MarketDataPipeline::new(provider);
    let series = pipeline.fetch(symbol, &credential, interval)?;

    let start = range.start.map(|d| d.format(DATE_FORMAT).to_string());
    let end = range.end.map(|d| d.format(DATE_FORMAT).to_string());
    let filtered = pipeline.filter_range(&series, start.as_deref(), end.as_deref())?;
    Ok((series.len(), filtered))
}

/// Run a chart request end to end.
pub fn run_chart_request(
    config: &AppConfig,
    catalog: &SymbolCatalog,
    provider: &dyn DataProvider,
    request: &ChartRequest,
) -> Result<ChartOutcome, RequestError> {
    let range = request.range();
    let (fetched_count, filtered) =
        load_series(config, catalog, provider, &request.symbol, request.interval, &range)?;

    if filtered.is_empty() {
        tracing::info!(symbol = %request.symbol, ?range, "no bars fall inside the requested window");
    }

    let dir = &config.output.static_dir;
    let artifact = write_chart(dir, &filtered, request.chart_kind).map_err(|source| {
        RequestError::Render {
            dir: dir.clone(),
            source,
        }
    })?;

    Ok(ChartOutcome {
        artifact,
        symbol: request.symbol.clone(),
        interval: request.interval,
        chart_kind: request.chart_kind,
        range,
        fetched_count,
        bar_count: filtered.len(),
    })
}
