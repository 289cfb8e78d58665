//! tickerplot core: symbol catalog, market data pipeline, providers, config.
//!
//! This crate holds everything between the user's selection and the chart:
//! - Domain types (price bars, series, interval selector, date ranges)
//! - Symbol catalog loaded from a CSV reference file
//! - Data providers (Alpha Vantage over blocking HTTP, local CSV import)
//! - The fetch → filter pipeline with tagged error results
//! - Application configuration

pub mod config;
pub mod data;
pub mod domain;
