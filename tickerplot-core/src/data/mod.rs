//! Symbol catalog, data providers and the fetch/filter pipeline

pub mod alphavantage;
pub mod catalog;
pub mod csv_import;
pub mod pipeline;
pub mod provider;

pub use alphavantage::AlphaVantageProvider;
pub use catalog::{list_symbols, CatalogUnavailable, SymbolCatalog};
pub use csv_import::CsvImportProvider;
pub use pipeline::{FetchError, MarketDataPipeline};
pub use provider::{DataError, DataProvider};

use crate::config::{ProviderConfig, ProviderKind};

/// Build the provider selected by the configuration.
pub fn build_provider(config: &ProviderConfig) -> Result<Box<dyn DataProvider>, DataError> {
    let provider: Box<dyn DataProvider> = match config.kind {
        ProviderKind::AlphaVantage => Box::new(AlphaVantageProvider::new(config)?),
        ProviderKind::CsvImport => Box::new(CsvImportProvider::new(&config.csv_dir)),
    };
    Ok(provider)
}
