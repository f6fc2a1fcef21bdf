//! CLI command implementations.

pub mod quote;
pub mod status;
pub mod weigh;

use driftwood_orders::LedgerError;
use driftwood_shipping::{ConfigError, ShippingError};
use thiserror::Error;

/// Errors that can occur while running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A fixture file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// A fixture file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file that could not be parsed.
        path: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Shipping calculation failed.
    #[error("shipping error: {0}")]
    Shipping(#[from] ShippingError),

    /// Ledger validation failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Settings could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Read and parse a JSON fixture file.
pub(crate) fn load_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Parse {
        path: path.to_string(),
        source,
    })
}
