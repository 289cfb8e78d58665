//! tickerplot runner: chart request orchestration, rendering, session.
//!
//! This crate builds on `tickerplot-core` to provide:
//! - Chart requests: range check, catalog membership, fetch, filter, render
//! - User-facing messages for every request failure
//! - SVG line and bar charts written as standalone artifacts
//! - The last-chart session file
//! - CSV / JSON export of filtered series

pub mod export;
pub mod render;
pub mod request;
pub mod session;

pub use export::{export_series_csv, export_series_json};
pub use render::{artifact_file_name, write_chart, ChartKind, SvgChart, UnknownChartKind};
pub use request::{load_series, run_chart_request, ChartOutcome, ChartRequest, RequestError};
pub use session::LastChart;
