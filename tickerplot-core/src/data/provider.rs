//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Alpha Vantage, CSV
//! import) so the pipeline can swap implementations and tests can stub them.

use crate::config::Credential;
use crate::domain::{IntervalSelector, PriceBar};
use thiserror::Error;

/// Structured error types for provider calls.
///
/// These are designed to be displayable in CLI output as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request rejected by provider: {0}")]
    Rejected(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Failures that may succeed if the same request is repeated later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkUnreachable(_) | Self::RateLimited(_))
    }
}

/// Trait for data providers (Alpha Vantage, CSV import, etc).
///
/// One call returns the provider's full history for a symbol at the given
/// interval. Providers perform a single attempt: no retry, no caching.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the full bar history for `symbol`. Bars may come back in any order.
    fn fetch_history(
        &self,
        symbol: &str,
        credential: &Credential,
        interval: IntervalSelector,
    ) -> Result<Vec<PriceBar>, DataError>;
}
