//! tickerplot CLI: symbol listing, chart rendering and series export.
//!
//! Commands:
//! - `symbols`: list the symbols in the catalog file
//! - `chart`: fetch, filter and render one symbol to an SVG artifact
//! - `results`: show the most recently rendered chart
//! - `series`: print the filtered series as CSV or JSON

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tickerplot_core::config::AppConfig;
use tickerplot_core::data::{build_provider, DataProvider, SymbolCatalog};
use tickerplot_core::domain::{DateRange, IntervalSelector};
use tickerplot_runner::request::{load_series, run_chart_request, ChartRequest, RequestError};
use tickerplot_runner::session::{self, LastChart};
use tickerplot_runner::{export_series_csv, export_series_json, ChartKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tickerplot",
    about = "tickerplot: fetch stock price history and render it as a chart"
)]
struct Cli {
    /// Path to the TOML config file. Defaults apply when it is missing.
    #[arg(long, global = true, default_value = "tickerplot.toml")]
    config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the symbols in the catalog.
    Symbols,
    /// Render a chart for one symbol.
    Chart {
        /// Symbol from the catalog (e.g., IBM).
        #[arg(long)]
        symbol: String,

        /// Time series: intraday, daily, weekly, monthly (or 1-4).
        #[arg(long, default_value = "daily")]
        interval: IntervalSelector,

        /// First date to include (YYYY-MM-DD). Defaults to the earliest bar.
        #[arg(long)]
        start: Option<String>,

        /// Last date to include (YYYY-MM-DD). Defaults to the latest bar.
        #[arg(long)]
        end: Option<String>,

        /// Chart type: line or bar.
        #[arg(long, default_value = "line")]
        kind: ChartKind,
    },
    /// Show the most recently rendered chart.
    Results,
    /// Print the filtered series for external tools.
    Series {
        /// Symbol from the catalog (e.g., IBM).
        #[arg(long)]
        symbol: String,

        /// Time series: intraday, daily, weekly, monthly (or 1-4).
        #[arg(long, default_value = "daily")]
        interval: IntervalSelector,

        /// First date to include (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Last date to include (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = SeriesFormat::Csv)]
        format: SeriesFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SeriesFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Symbols => run_symbols(&config),
        Commands::Chart {
            symbol,
            interval,
            start,
            end,
            kind,
        } => run_chart(&config, symbol, interval, start, end, kind),
        Commands::Results => run_results(&config.output.session_file),
        Commands::Series {
            symbol,
            interval,
            start,
            end,
            format,
        } => run_series(&config, &symbol, interval, start, end, format),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the user-facing message and exit non-zero.
fn fail(err: RequestError) -> ! {
    tracing::debug!(error = ?err, "request failed");
    eprintln!("{}", err.user_message());
    std::process::exit(1);
}

fn open_catalog(config: &AppConfig) -> SymbolCatalog {
    SymbolCatalog::from_file(&config.catalog.path).unwrap_or_else(|e| fail(e.into()))
}

fn open_provider(config: &AppConfig) -> Result<Box<dyn DataProvider>> {
    Ok(build_provider(&config.provider)?)
}

fn run_symbols(config: &AppConfig) -> Result<()> {
    let catalog = open_catalog(config);
    if catalog.is_empty() {
        println!("Catalog {} lists no symbols.", config.catalog.path.display());
        return Ok(());
    }
    for symbol in catalog.symbols() {
        println!("{symbol}");
    }
    Ok(())
}

fn run_chart(
    config: &AppConfig,
    symbol: String,
    interval: IntervalSelector,
    start: Option<String>,
    end: Option<String>,
    chart_kind: ChartKind,
) -> Result<()> {
    let range = DateRange::parse(start.as_deref(), end.as_deref()).unwrap_or_else(|e| fail(e.into()));
    let catalog = open_catalog(config);
    let provider = open_provider(config)?;

    let request = ChartRequest {
        symbol,
        interval,
        start: range.start,
        end: range.end,
        chart_kind,
    };

    let outcome = run_chart_request(config, &catalog, provider.as_ref(), &request)
        .unwrap_or_else(|e| fail(e));

    if outcome.is_empty_window() {
        println!(
            "No bars for {} between the selected dates ({} fetched). Empty chart written.",
            outcome.symbol, outcome.fetched_count
        );
    } else {
        println!(
            "{} {} chart: {} of {} bars.",
            outcome.symbol, outcome.chart_kind, outcome.bar_count, outcome.fetched_count
        );
    }
    println!("Chart saved to: {}", outcome.artifact.display());

    let last = LastChart::from_outcome(&outcome, chrono::Local::now().naive_local());
    if let Err(e) = session::save(&config.output.session_file, &last) {
        tracing::warn!(error = %e, "could not save session");
    }

    Ok(())
}

fn run_results(session_file: &Path) -> Result<()> {
    match session::load(session_file) {
        Some(last) if last.artifact.exists() => {
            println!("Symbol:    {}", last.symbol);
            println!("Interval:  {}", last.interval);
            println!("Chart:     {}", last.chart_kind);
            println!("Bars:      {}", last.bar_count);
            println!("Rendered:  {}", last.rendered_at.format("%Y-%m-%d %H:%M:%S"));
            println!("Artifact:  {}", last.artifact.display());
        }
        _ => println!("No data to display. Please make a new selection."),
    }
    Ok(())
}

fn run_series(
    config: &AppConfig,
    symbol: &str,
    interval: IntervalSelector,
    start: Option<String>,
    end: Option<String>,
    format: SeriesFormat,
) -> Result<()> {
    let range = DateRange::parse(start.as_deref(), end.as_deref()).unwrap_or_else(|e| fail(e.into()));
    let catalog = open_catalog(config);
    let provider = open_provider(config)?;
    let (_, series) = load_series(config, &catalog, provider.as_ref(), symbol, interval, &range)
        .unwrap_or_else(|e| fail(e));

    let out = match format {
        SeriesFormat::Csv => export_series_csv(&series)?,
        SeriesFormat::Json => export_series_json(&series)?,
    };
    print!("{out}");
    Ok(())
}
