//! Application configuration.
//!
//! Loaded once at startup from a TOML file and passed by reference to the
//! components that need it. Every section has defaults, so a missing file or
//! a partial file is valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading configuration or resolving the provider credential.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no API key: set provider.api_key or the {env_var} environment variable")]
    MissingCredential { env_var: String },
}

/// Opaque provider API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Placeholder for providers that ignore credentials.
    pub fn anonymous() -> Self {
        Self(String::new())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Which data provider backs the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    AlphaVantage,
    CsvImport,
}

/// How the interval selector maps onto provider endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalRouting {
    /// Each selector calls its own endpoint (intraday / daily / weekly / monthly).
    PerInterval,
    /// Every selector fetches the full daily history.
    #[default]
    DailyOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stocks.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    /// Explicit key; wins over `api_key_env`.
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub interval_routing: IntervalRouting,
    /// Bar step for intraday requests (`1min`, `5min`, `15min`, `30min`, `60min`).
    pub intraday_step: String,
    /// Request timeout. Unset leaves the HTTP client default in place.
    pub timeout_secs: Option<u64>,
    /// Directory of `{SYMBOL}.csv` files for the CSV import provider.
    pub csv_dir: PathBuf,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::AlphaVantage,
            base_url: "https://www.alphavantage.co".into(),
            api_key: None,
            api_key_env: "ALPHAVANTAGE_API_KEY".into(),
            interval_routing: IntervalRouting::DailyOnly,
            intraday_step: "5min".into(),
            timeout_secs: None,
            csv_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory rendered charts are written into.
    pub static_dir: PathBuf,
    /// JSON file holding the last rendered chart reference.
    pub session_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            session_file: PathBuf::from(".tickerplot/session.json"),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub provider: ProviderConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Resolve the provider credential.
    ///
    /// The CSV import provider needs none; Alpha Vantage takes the explicit
    /// key first, then the configured environment variable.
    pub fn credential(&self) -> Result<Credential, ConfigError> {
        self.credential_with(|name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::credential`] with an injectable environment lookup.
    pub fn credential_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Credential, ConfigError> {
        if self.provider.kind == ProviderKind::CsvImport {
            return Ok(Credential::anonymous());
        }
        if let Some(key) = self.provider.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(Credential::new(key));
        }
        env(&self.provider.api_key_env)
            .filter(|k| !k.is_empty())
            .map(Credential::new)
            .ok_or_else(|| ConfigError::MissingCredential {
                env_var: self.provider.api_key_env.clone(),
            })
    }
}
