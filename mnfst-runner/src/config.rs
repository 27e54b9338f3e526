//! Serializable replay configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use mnfst_core::{ConfigError, SignalConfig};

/// Unique identifier for a replay run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum RunConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid signal parameters: {0}")]
    Signal(#[from] ConfigError),

    #[error("unknown output format '{0}' (expected csv or json)")]
    UnknownFormat(String),
}

/// Output format for the record stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = RunConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(RunConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

/// Everything needed to reproduce a replay over a bar file.
///
/// ```toml
/// symbols = ["ES", "NQ"]
/// format = "json"
///
/// [signal]
/// vwap_lookback = 34
/// obv_ema_period = 34
/// cei_lookback = 21
///
/// [signal.session]
/// start = 745
/// end = 1100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub signal: SignalConfig,
    /// Instruments to replay. Empty means every instrument in the input.
    pub symbols: Vec<String>,
    pub format: ExportFormat,
}

impl RunConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, RunConfigError> {
        let config: Self = toml::from_str(s)?;
        config.signal.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, RunConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| RunConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Whether `symbol` passes the instrument filter.
    pub fn includes(&self, symbol: &str) -> bool {
        self.symbols.is_empty() || self.symbols.iter().any(|s| s == symbol)
    }

    /// Deterministic hash over signal parameters and instrument filter.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
