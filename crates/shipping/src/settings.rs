//! Shipping defaults loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `DRIFTWOOD_CURRENCY` - default currency for quotes (default: USD)
//! - `DRIFTWOOD_WEIGHT_ATTRIBUTE` - product attribute holding weights
//!   (default: weight)
//! - `DRIFTWOOD_DEFAULT_WEIGHT_KG` - weight assumed for products without the
//!   attribute; unset means weighing such a product is an error
//!
//! Calculators and ledgers never read the environment themselves; settings
//! are loaded once and passed in at construction.

use driftwood_core::{CurrencyCode, Weight};
use thiserror::Error;

use crate::methods::DEFAULT_WEIGHT_ATTRIBUTE;
use crate::scale::Scale;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    /// An environment variable was set to an unusable value.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Ambient defaults for shipping calculation.
#[derive(Debug, Clone)]
pub struct ShippingSettings {
    /// Currency quotes default to when a basket does not carry one.
    pub currency: CurrencyCode,
    /// Product attribute code holding weights.
    pub weight_attribute: String,
    /// Weight assumed for products without the attribute.
    pub default_weight: Option<Weight>,
}

impl Default for ShippingSettings {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::USD,
            weight_attribute: DEFAULT_WEIGHT_ATTRIBUTE.to_string(),
            default_weight: None,
        }
    }
}

impl ShippingSettings {
    /// Load settings from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to a value that does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let currency = get_env_or_default("DRIFTWOOD_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("DRIFTWOOD_CURRENCY".to_string(), e))?;
        let weight_attribute =
            get_env_or_default("DRIFTWOOD_WEIGHT_ATTRIBUTE", DEFAULT_WEIGHT_ATTRIBUTE);
        let default_weight = match get_optional_env("DRIFTWOOD_DEFAULT_WEIGHT_KG") {
            Some(raw) => Some(raw.parse::<Weight>().map_err(|e| {
                ConfigError::InvalidEnvVar("DRIFTWOOD_DEFAULT_WEIGHT_KG".to_string(), e.to_string())
            })?),
            None => None,
        };

        Ok(Self {
            currency,
            weight_attribute,
            default_weight,
        })
    }

    /// A scale configured with these settings.
    #[must_use]
    pub fn scale(&self) -> Scale {
        Scale::new(self.weight_attribute.clone(), self.default_weight)
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ShippingSettings::default();
        assert_eq!(settings.currency, CurrencyCode::USD);
        assert_eq!(settings.weight_attribute, "weight");
        assert!(settings.default_weight.is_none());
    }

    #[test]
    fn test_scale_uses_configured_attribute() {
        let settings = ShippingSettings {
            weight_attribute: "mass".to_string(),
            ..ShippingSettings::default()
        };
        assert_eq!(settings.scale().attribute_code(), "mass");
    }
}
