//! Symbol catalog: the list of tickers a user may chart.
//!
//! The catalog is a CSV reference file with a `Symbol` column. Only that
//! column is read; order and duplicates are kept exactly as in the file.

use crate::domain::Symbol;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the required column in the reference file.
pub const SYMBOL_COLUMN: &str = "Symbol";

/// The reference file is missing, unreadable, malformed or lacks `Symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot load symbol list from {}: {reason}", path.display())]
pub struct CatalogUnavailable {
    pub path: PathBuf,
    pub reason: String,
}

impl CatalogUnavailable {
    fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Read the `Symbol` column of `source_path` in file order.
///
/// Values are trimmed. Rows whose `Symbol` cell is blank are skipped;
/// duplicates are kept.
pub fn list_symbols(source_path: &Path) -> Result<Vec<Symbol>, CatalogUnavailable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(source_path)
        .map_err(|e| CatalogUnavailable::new(source_path, e.to_string()))?;

    let column = reader
        .headers()
        .map_err(|e| CatalogUnavailable::new(source_path, e.to_string()))?
        .iter()
        .position(|h| h.trim() == SYMBOL_COLUMN)
        .ok_or_else(|| CatalogUnavailable::new(source_path, format!("no '{SYMBOL_COLUMN}' column")))?;

    let mut symbols = Vec::new();
    let mut blank = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| CatalogUnavailable::new(source_path, e.to_string()))?;
        let value = record.get(column).unwrap_or_default().trim();
        if value.is_empty() {
            blank += 1;
            continue;
        }
        symbols.push(value.to_string());
    }

    tracing::debug!(path = %source_path.display(), count = symbols.len(), blank, "loaded symbol catalog");
    Ok(symbols)
}

/// Loaded catalog with membership checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Load a catalog from a reference file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogUnavailable> {
        list_symbols(path).map(Self::new)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
