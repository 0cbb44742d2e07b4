//! Defaults for the command-line surface.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_limit() -> u32 {
    20
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Row limit for `request list` and `request inbox` when none is given.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Currency used by `request create` when `--currency` is omitted.
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            default_currency: default_currency(),
        }
    }
}

impl GeneralConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` unless `default_currency` is three ASCII letters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let code = self.default_currency.trim();
        if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue {
                field: "general.default_currency".to_string(),
                reason: format!("expected a three-letter code, got '{code}'"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.default_currency, "USD");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_currency_is_rejected() {
        let config = GeneralConfig {
            default_currency: "dollars".to_string(),
            ..GeneralConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "general.default_currency"
        ));
    }
}
