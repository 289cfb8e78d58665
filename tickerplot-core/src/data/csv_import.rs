//! CSV import provider.
//!
//! Reads `{dir}/{SYMBOL}.csv` files with a `date,open,high,low,close` header
//! (extra columns are ignored). `date` is `YYYY-MM-DD` or
//! `YYYY-MM-DD HH:MM:SS`. Used for offline runs and test fixtures; the
//! interval selector and credential are ignored.

use super::provider::{DataError, DataProvider};
use crate::config::Credential;
use crate::domain::{IntervalSelector, PriceBar};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

/// Provider backed by a directory of per-symbol CSV files.
pub struct CsvImportProvider {
    dir: PathBuf,
}

impl CsvImportProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File for `symbol`. The symbol must be a single plain path component.
    fn symbol_path(&self, symbol: &str) -> Result<PathBuf, DataError> {
        let mut components = Path::new(symbol).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(format!("{symbol}.csv"))),
            _ => Err(DataError::InvalidRequest(format!("'{symbol}' is not a plain symbol name"))),
        }
    }

    fn read_bars(path: &Path) -> Result<Vec<PriceBar>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::Other(format!("open {}: {e}", path.display())))?;

        let mut seen = HashSet::new();
        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| {
                DataError::ResponseFormatChanged(format!("{} row {}: {e}", path.display(), line + 1))
            })?;
            let timestamp = parse_row_date(&row.date)?;
            if !seen.insert(timestamp) {
                return Err(DataError::ResponseFormatChanged(format!(
                    "{}: duplicate bar for {}",
                    path.display(),
                    row.date
                )));
            }
            let bar = PriceBar {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
            };
            if bar.is_void() {
                return Err(DataError::ResponseFormatChanged(format!(
                    "{}: NaN price for {}",
                    path.display(),
                    row.date
                )));
            }
            bars.push(bar);
        }
        Ok(bars)
    }
}

fn parse_row_date(raw: &str) -> Result<NaiveDateTime, DataError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN)))
        .map_err(|_| DataError::ResponseFormatChanged(format!("invalid date '{raw}'")))
}

impl DataProvider for CsvImportProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        _credential: &Credential,
        _interval: IntervalSelector,
    ) -> Result<Vec<PriceBar>, DataError> {
        let path = self.symbol_path(symbol)?;
        if !path.is_file() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        tracing::debug!(symbol, path = %path.display(), "reading CSV series");
        Self::read_bars(&path)
    }
}
