//! Series export: CSV and JSON for external analysis tools.

use anyhow::{Context, Result};
use tickerplot_core::domain::{PriceSeries, DATE_FORMAT};

// ─── CSV export ─────────────────────────────────────────────────────

/// Export a series as CSV in bar order.
///
/// Columns: date, open, high, low, close. Intraday bars keep their time
/// (`YYYY-MM-DD HH:MM:SS`); all other intervals print the date only.
pub fn export_series_csv(series: &PriceSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["date", "open", "high", "low", "close"])?;

    for bar in &series.bars {
        let date = if bar.timestamp.time() == chrono::NaiveTime::MIN {
            bar.date().format(DATE_FORMAT).to_string()
        } else {
            bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
        };
        wtr.write_record([
            date,
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a series to pretty JSON.
pub fn export_series_json(series: &PriceSeries) -> Result<String> {
    serde_json::to_string_pretty(series).context("failed to serialize PriceSeries to JSON")
}
