//! Chart rendering to SVG artifacts.

pub mod svg;

pub use svg::SvgChart;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use tickerplot_core::domain::{IntervalSelector, PriceSeries};

/// Chart style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid chart type selected: '{0}' (valid: line, bar)")]
pub struct UnknownChartKind(pub String);

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            _ => Err(UnknownChartKind(s.to_string())),
        }
    }
}

/// `{SYMBOL}_{interval code}_{kind}.svg`, with path-unsafe symbol characters replaced.
pub fn artifact_file_name(symbol: &str, interval: IntervalSelector, kind: ChartKind) -> String {
    let safe: String = symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("{safe}_{}_{kind}.svg", interval.code())
}

/// Render `series` and write it into `dir`. Returns the artifact path.
///
/// Writes go to a `.tmp` sibling first and are renamed into place, so a
/// reader never sees a half-written chart.
pub fn write_chart(dir: &Path, series: &PriceSeries, kind: ChartKind) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(artifact_file_name(&series.symbol, series.interval, kind));
    let tmp = path.with_extension("svg.tmp");

    std::fs::write(&tmp, SvgChart::new(series, kind).render())?;
    std::fs::rename(&tmp, &path)?;

    tracing::info!(path = %path.display(), bars = series.len(), %kind, "chart written");
    Ok(path)
}
