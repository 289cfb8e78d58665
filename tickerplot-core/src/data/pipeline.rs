//! Market data pipeline: fetch a full series, then narrow it to a window.
//!
//! `fetch` makes one blocking provider call and classifies the outcome into
//! a tagged result: success, provider failure, or an empty (but successful)
//! response. The provider's own error is kept so callers can still tell
//! transient failures from permanent ones.

use super::provider::{DataError, DataProvider};
use crate::config::Credential;
use crate::domain::{FilterError, IntervalSelector, PriceSeries};
use thiserror::Error;

/// Failure of a pipeline fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("provider error for {symbol} ({interval}): {source}")]
    Provider {
        symbol: String,
        interval: IntervalSelector,
        #[source]
        source: DataError,
    },

    #[error("no data returned for {symbol} ({interval})")]
    EmptyResult {
        symbol: String,
        interval: IntervalSelector,
    },
}

impl FetchError {
    /// True only for provider failures that may clear up on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Provider { source, .. } => source.is_transient(),
            Self::EmptyResult { .. } => false,
        }
    }
}

/// Fetch-then-filter pipeline over one data provider.
pub struct MarketDataPipeline<'a> {
    provider: &'a dyn DataProvider,
}

impl<'a> MarketDataPipeline<'a> {
    pub fn new(provider: &'a dyn DataProvider) -> Self {
        Self { provider }
    }

    /// Retrieve the full history for `symbol`. Single attempt, no retry.
    ///
    /// The symbol is expected to come from the catalog; only emptiness is
    /// checked here.
    pub fn fetch(
        &self,
        symbol: &str,
        credential: &Credential,
        interval: IntervalSelector,
    ) -> Result<PriceSeries, FetchError> {
        if symbol.trim().is_empty() {
            return Err(FetchError::Provider {
                symbol: symbol.to_string(),
                interval,
                source: DataError::InvalidRequest("empty symbol".into()),
            });
        }

        let bars = self
            .provider
            .fetch_history(symbol, credential, interval)
            .map_err(|source| {
                tracing::warn!(
                    provider = self.provider.name(),
                    symbol,
                    %interval,
                    error = %source,
                    "provider call failed"
                );
                FetchError::Provider {
                    symbol: symbol.to_string(),
                    interval,
                    source,
                }
            })?;

        if bars.is_empty() {
            tracing::warn!(provider = self.provider.name(), symbol, %interval, "provider returned no bars");
            return Err(FetchError::EmptyResult {
                symbol: symbol.to_string(),
                interval,
            });
        }

        tracing::info!(provider = self.provider.name(), symbol, %interval, bars = bars.len(), "fetched series");
        Ok(PriceSeries::new(symbol, interval, bars))
    }

    /// Sort and narrow `series` to inclusive `YYYY-MM-DD` bounds.
    pub fn filter_range(
        &self,
        series: &PriceSeries,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<PriceSeries, FilterError> {
        crate::domain::filter_range(series, start, end)
    }
}
