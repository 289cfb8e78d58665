//! End-to-end chart requests against the CSV import provider.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use tempfile::TempDir;

use tickerplot_core::config::{AppConfig, Credential, ProviderKind};
use tickerplot_core::data::{build_provider, CsvImportProvider, DataError, DataProvider, SymbolCatalog};
use tickerplot_core::domain::{DateRange, IntervalSelector, PriceBar};
use tickerplot_runner::request::{load_series, run_chart_request, ChartRequest, RequestError};
use tickerplot_runner::session::{self, LastChart};
use tickerplot_runner::ChartKind;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
}

fn csv_config(out: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.catalog.path = fixtures().join("stocks.csv");
    config.provider.kind = ProviderKind::CsvImport;
    config.provider.csv_dir = fixtures().join("data");
    config.output.static_dir = out.path().join("static");
    config.output.session_file = out.path().join("session.json");
    config
}

fn request(symbol: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> ChartRequest {
    ChartRequest {
        symbol: symbol.into(),
        interval: IntervalSelector::Daily,
        start,
        end,
        chart_kind: ChartKind::Line,
    }
}

/// Provider that records how often it was asked for data.
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

impl DataProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    fn fetch_history(
        &self,
        _symbol: &str,
        _credential: &Credential,
        _interval: IntervalSelector,
    ) -> Result<Vec<PriceBar>, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![PriceBar::daily(d(1), 1.0, 2.0, 0.5, 1.5)])
    }
}

#[test]
fn daily_request_writes_svg_for_window() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::from_file(&config.catalog.path).unwrap();
    let provider = build_provider(&config.provider).unwrap();

    let outcome = run_chart_request(
        &config,
        &catalog,
        provider.as_ref(),
        &request("IBM", Some(d(3)), Some(d(6))),
    )
    .unwrap();

    assert_eq!(outcome.fetched_count, 10);
    assert_eq!(outcome.bar_count, 4);
    assert!(!outcome.is_empty_window());
    assert!(outcome.artifact.starts_with(&config.output.static_dir));

    let svg = std::fs::read_to_string(&outcome.artifact).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Stock Data for IBM"));
    assert!(svg.contains("2020-01-03"));
    assert!(svg.contains("2020-01-06"));
    assert!(!svg.contains("2020-01-07"));
}

#[test]
fn inverted_range_fails_before_any_fetch() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::new(vec!["IBM".into()]);
    let provider = CountingProvider::default();

    let err = run_chart_request(&config, &catalog, &provider, &request("IBM", Some(d(9)), Some(d(2))))
        .unwrap_err();

    assert!(matches!(err, RequestError::InvalidRange { .. }));
    assert_eq!(err.user_message(), "Start date must be before end date.");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert!(!config.output.static_dir.exists());
}

#[test]
fn unknown_symbol_fails_before_any_fetch() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::new(vec!["IBM".into()]);
    let provider = CountingProvider::default();

    let err = run_chart_request(&config, &catalog, &provider, &request("MSFT", None, None)).unwrap_err();

    assert!(matches!(err, RequestError::UnknownSymbol(ref s) if s == "MSFT"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn equal_bounds_are_not_an_inverted_range() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::new(vec!["IBM".into()]);
    let provider = CountingProvider::default();

    let outcome =
        run_chart_request(&config, &catalog, &provider, &request("IBM", Some(d(1)), Some(d(1)))).unwrap();

    assert_eq!(outcome.bar_count, 1);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn disjoint_window_still_renders_a_placeholder() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::from_file(&config.catalog.path).unwrap();
    let provider = CsvImportProvider::new(&config.provider.csv_dir);

    let future = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
    let outcome =
        run_chart_request(&config, &catalog, &provider, &request("IBM", Some(future), None)).unwrap();

    assert!(outcome.is_empty_window());
    assert_eq!(outcome.fetched_count, 10);
    let svg = std::fs::read_to_string(&outcome.artifact).unwrap();
    assert!(svg.contains("No data"));
}

#[test]
fn header_only_file_reports_no_data() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::from_file(&config.catalog.path).unwrap();
    let provider = CsvImportProvider::new(&config.provider.csv_dir);

    let mut req = request("EMPTY", None, None);
    req.interval = IntervalSelector::Weekly;
    let err = run_chart_request(&config, &catalog, &provider, &req).unwrap_err();

    assert_eq!(err.user_message(), "No data available for EMPTY with time series weekly.");
}

#[test]
fn missing_import_file_is_an_api_call_error() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::from_file(&config.catalog.path).unwrap();
    let provider = CsvImportProvider::new(&config.provider.csv_dir);

    let err = run_chart_request(&config, &catalog, &provider, &request("MISSING", None, None)).unwrap_err();

    assert_eq!(err.user_message(), "API call error for MISSING with time series daily.");
}

#[test]
fn rendered_chart_survives_a_session_round_trip() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::from_file(&config.catalog.path).unwrap();
    let provider = CsvImportProvider::new(&config.provider.csv_dir);

    let mut req = request("IBM", None, None);
    req.chart_kind = ChartKind::Bar;
    let outcome = run_chart_request(&config, &catalog, &provider, &req).unwrap();

    assert!(session::load(&config.output.session_file).is_none());

    let rendered_at = d(11).and_hms_opt(9, 30, 0).unwrap();
    let last = LastChart::from_outcome(&outcome, rendered_at);
    session::save(&config.output.session_file, &last).unwrap();

    let loaded = session::load(&config.output.session_file).unwrap();
    assert_eq!(loaded, last);
    assert_eq!(loaded.chart_kind, ChartKind::Bar);
    assert_eq!(loaded.bar_count, 10);
    assert!(loaded.artifact.exists());
}

#[test]
fn series_load_rejects_symbols_outside_the_catalog() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::new(vec!["IBM".into()]);
    let provider = CountingProvider::default();

    for symbol in ["MSFT", "../secret", ""] {
        let err = load_series(
            &config,
            &catalog,
            &provider,
            symbol,
            IntervalSelector::Daily,
            &DateRange::unbounded(),
        )
        .unwrap_err();
        assert!(matches!(err, RequestError::UnknownSymbol(ref s) if s == symbol), "{symbol:?}");
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn series_load_never_reads_files_beside_the_import_dir() {
    let root = TempDir::new().unwrap();
    let data = root.path().join("data");
    std::fs::create_dir(&data).unwrap();
    std::fs::write(root.path().join("secret.csv"), "date,open,high,low,close\n2020-01-02,1,2,0.5,1.5\n").unwrap();

    let mut config = csv_config(&root);
    config.provider.csv_dir = data.clone();
    let catalog = SymbolCatalog::new(vec!["IBM".into()]);
    let provider = CsvImportProvider::new(&data);

    let err = load_series(
        &config,
        &catalog,
        &provider,
        "../secret",
        IntervalSelector::Daily,
        &DateRange::unbounded(),
    )
    .unwrap_err();
    assert!(matches!(err, RequestError::UnknownSymbol(_)));
    assert_eq!(err.user_message(), "Unknown symbol ../secret. Please pick one from the symbol list.");
}

#[test]
fn series_load_checks_range_before_catalog() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::new(vec!["IBM".into()]);
    let provider = CountingProvider::default();

    let err = load_series(
        &config,
        &catalog,
        &provider,
        "MSFT",
        IntervalSelector::Daily,
        &DateRange::new(Some(d(9)), Some(d(2))),
    )
    .unwrap_err();
    assert!(matches!(err, RequestError::InvalidRange { .. }));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn series_load_filters_catalog_symbol() {
    let out = TempDir::new().unwrap();
    let config = csv_config(&out);
    let catalog = SymbolCatalog::from_file(&config.catalog.path).unwrap();
    let provider = CsvImportProvider::new(&config.provider.csv_dir);

    let (fetched, series) = load_series(
        &config,
        &catalog,
        &provider,
        "IBM",
        IntervalSelector::Daily,
        &DateRange::new(None, Some(d(5))),
    )
    .unwrap();
    assert_eq!(fetched, 10);
    assert_eq!(series.len(), 5);
    assert!(series.bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}
