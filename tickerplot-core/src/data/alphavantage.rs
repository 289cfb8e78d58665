//! Alpha Vantage data provider.
//!
//! Fetches full bar histories from the `TIME_SERIES_*` query endpoints over
//! blocking HTTP. One attempt per call: no retry, no backoff, and no timeout
//! beyond the client default unless the configuration sets one.
//!
//! Alpha Vantage reports most failures with HTTP 200 and a JSON body keyed by
//! `"Error Message"`, `"Note"` or `"Information"`, so status codes alone are
//! not enough to classify a response.

use super::provider::{DataError, DataProvider};
use crate::config::{Credential, IntervalRouting, ProviderConfig};
use crate::domain::{IntervalSelector, PriceBar};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// One row of a `TIME_SERIES_*` response. Prices arrive as strings.
#[derive(Debug, Deserialize)]
struct SeriesRow {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
}

/// Query function and response key for one interval.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoint {
    function: &'static str,
    series_key: String,
    full_output: bool,
}

impl Endpoint {
    fn for_interval(interval: IntervalSelector, intraday_step: &str) -> Self {
        match interval {
            IntervalSelector::Intraday => Self {
                function: "TIME_SERIES_INTRADAY",
                series_key: format!("Time Series ({intraday_step})"),
                full_output: true,
            },
            IntervalSelector::Daily => Self {
                function: "TIME_SERIES_DAILY",
                series_key: "Time Series (Daily)".into(),
                full_output: true,
            },
            IntervalSelector::Weekly => Self {
                function: "TIME_SERIES_WEEKLY",
                series_key: "Weekly Time Series".into(),
                full_output: false,
            },
            IntervalSelector::Monthly => Self {
                function: "TIME_SERIES_MONTHLY",
                series_key: "Monthly Time Series".into(),
                full_output: false,
            },
        }
    }
}

/// Alpha Vantage data provider.
pub struct AlphaVantageProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    routing: IntervalRouting,
    intraday_step: String,
}

impl AlphaVantageProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, DataError> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("tickerplot/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            routing: config.interval_routing,
            intraday_step: config.intraday_step.clone(),
        })
    }

    /// Interval actually requested from the provider under the routing policy.
    fn effective_interval(&self, requested: IntervalSelector) -> IntervalSelector {
        match self.routing {
            IntervalRouting::PerInterval => requested,
            IntervalRouting::DailyOnly => {
                if requested != IntervalSelector::Daily {
                    tracing::debug!(
                        %requested,
                        "interval routing is daily_only; fetching daily history instead"
                    );
                }
                IntervalSelector::Daily
            }
        }
    }

    /// Query string parameters for one request (the key is appended last).
    fn query_params(
        &self,
        endpoint: &Endpoint,
        symbol: &str,
        credential: &Credential,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("function", endpoint.function.to_string()),
            ("symbol", symbol.to_string()),
        ];
        if endpoint.function == "TIME_SERIES_INTRADAY" {
            params.push(("interval", self.intraday_step.clone()));
        }
        if endpoint.full_output {
            params.push(("outputsize", "full".to_string()));
        }
        params.push(("apikey", credential.expose().to_string()));
        params
    }

    /// Parse a `TIME_SERIES_*` JSON body into bars.
    ///
    /// An empty series object is a successful, empty result.
    fn parse_response(symbol: &str, series_key: &str, body: &str) -> Result<Vec<PriceBar>, DataError> {
        let mut doc: Map<String, Value> = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("invalid JSON for {symbol}: {e}"))
        })?;

        if let Some(msg) = doc.get("Error Message").and_then(Value::as_str) {
            return Err(DataError::InvalidRequest(msg.to_string()));
        }
        if let Some(msg) = doc.get("Note").and_then(Value::as_str) {
            return Err(DataError::RateLimited(msg.to_string()));
        }
        if let Some(msg) = doc.get("Information").and_then(Value::as_str) {
            return Err(DataError::Rejected(msg.to_string()));
        }

        let series = doc.remove(series_key).ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("missing '{series_key}' in response for {symbol}"))
        })?;

        let rows: BTreeMap<String, SeriesRow> = serde_json::from_value(series).map_err(|e| {
            DataError::ResponseFormatChanged(format!("malformed '{series_key}' for {symbol}: {e}"))
        })?;

        rows.into_iter()
            .map(|(key, row)| {
                let bar = PriceBar {
                    timestamp: parse_timestamp(&key)?,
                    open: parse_price(&key, "open", &row.open)?,
                    high: parse_price(&key, "high", &row.high)?,
                    low: parse_price(&key, "low", &row.low)?,
                    close: parse_price(&key, "close", &row.close)?,
                };
                if bar.is_void() {
                    return Err(DataError::ResponseFormatChanged(format!("NaN price at {key} for {symbol}")));
                }
                Ok(bar)
            })
            .collect()
    }
}

/// Series keys are `YYYY-MM-DD` for daily and coarser, `YYYY-MM-DD HH:MM:SS` intraday.
fn parse_timestamp(key: &str) -> Result<NaiveDateTime, DataError> {
    if key.len() == 10 {
        NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .map_err(|e| DataError::ResponseFormatChanged(format!("invalid date key '{key}': {e}")))
    } else {
        NaiveDateTime::parse_from_str(key, "%Y-%m-%d %H:%M:%S").map_err(|e| {
            DataError::ResponseFormatChanged(format!("invalid timestamp key '{key}': {e}"))
        })
    }
}

fn parse_price(key: &str, field: &str, raw: &str) -> Result<f64, DataError> {
    raw.trim().parse::<f64>().map_err(|_| {
        DataError::ResponseFormatChanged(format!("non-numeric {field} '{raw}' at {key}"))
    })
}

impl DataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        credential: &Credential,
        interval: IntervalSelector,
    ) -> Result<Vec<PriceBar>, DataError> {
        let endpoint = Endpoint::for_interval(self.effective_interval(interval), &self.intraday_step);
        let url = format!("{}/query", self.base_url);
        tracing::debug!(symbol, function = endpoint.function, "requesting Alpha Vantage series");

        // Errors are stripped of their URL so the API key never reaches logs.
        let resp = self
            .client
            .get(&url)
            .query(&self.query_params(&endpoint, symbol, credential))
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.without_url().to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired(format!("HTTP {status} for {symbol}")));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited(format!("HTTP {status} for {symbol}")));
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        let body = resp.text().map_err(|e| {
            DataError::ResponseFormatChanged(format!(
                "failed to read response for {symbol}: {}",
                e.without_url()
            ))
        })?;

        Self::parse_response(symbol, &endpoint.series_key, &body)
    }
}
