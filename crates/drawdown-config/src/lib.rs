//! # drawdown-config
//!
//! Layered configuration loading for Drawdown using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DRAWDOWN_*` prefix, `__` as separator)
//! 2. Project-level `.drawdown/config.toml`
//! 3. User-level `~/.config/drawdown/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DRAWDOWN_DATABASE__PATH` -> `database.path`,
//! `DRAWDOWN_WORKFLOW__ASSIGNMENT_POLICY` -> `workflow.assignment_policy`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use drawdown_config::DrawdownConfig;
//!
//! let config = DrawdownConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod workflow;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use workflow::WorkflowConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DrawdownConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl DrawdownConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or a value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.workflow.validate()?;
        config.general.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".drawdown/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DRAWDOWN_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("drawdown").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawdown_core::enums::AssignmentPolicy;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_loads() {
        let config = DrawdownConfig::default();
        assert_eq!(config.database.path, ".drawdown/drawdown.db");
        assert_eq!(
            config.workflow.assignment_policy,
            AssignmentPolicy::LeastRecentlyAssigned
        );
        assert_eq!(config.general.default_limit, 20);
    }

    #[test]
    fn project_toml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_dir(".drawdown")?;
            jail.create_file(
                ".drawdown/config.toml",
                r#"
                [workflow]
                assignment_policy = "first_by_id"
                allow_any_active_fallback = false
                "#,
            )?;
            let config = DrawdownConfig::load().expect("config should load");
            assert_eq!(config.workflow.assignment_policy, AssignmentPolicy::FirstById);
            assert!(!config.workflow.allow_any_active_fallback);
            assert_eq!(config.workflow.history_limit, 50);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_dir(".drawdown")?;
            jail.create_file(
                ".drawdown/config.toml",
                r#"
                [database]
                path = "from-toml.db"
                "#,
            )?;
            jail.set_env("DRAWDOWN_DATABASE__PATH", ":memory:");
            let config = DrawdownConfig::load().expect("config should load");
            assert!(config.database.is_in_memory());
            Ok(())
        });
    }

    #[test]
    fn invalid_history_limit_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("DRAWDOWN_WORKFLOW__HISTORY_LIMIT", "0");
            let result = DrawdownConfig::load();
            assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
            Ok(())
        });
    }

    #[test]
    fn extra_toml_layer_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ops.toml");
        std::fs::write(
            &path,
            r#"
            [general]
            default_limit = 5
            default_currency = "EUR"

            [database]
            path = "/srv/drawdown/ops.db"
            "#,
        )
        .unwrap();

        let figment = Figment::from(Serialized::defaults(DrawdownConfig::default()))
            .merge(Toml::file(&path));
        let config = DrawdownConfig::from_figment(&figment).expect("config should load");
        assert_eq!(config.general.default_limit, 5);
        assert_eq!(config.general.default_currency, "EUR");
        assert_eq!(config.database.path, "/srv/drawdown/ops.db");
        assert_eq!(config.workflow.history_limit, 50);
    }

    #[test]
    fn bad_currency_in_toml_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[general]\ndefault_currency = \"euro\"\n").unwrap();

        let figment = Figment::from(Serialized::defaults(DrawdownConfig::default()))
            .merge(Toml::file(&path));
        assert!(matches!(
            DrawdownConfig::from_figment(&figment),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn default_currency_comes_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("DRAWDOWN_GENERAL__DEFAULT_CURRENCY", "KES");
            let config = DrawdownConfig::load().expect("config should load");
            assert_eq!(config.general.default_currency, "KES");
            Ok(())
        });
    }

    #[test]
    fn unknown_policy_is_a_figment_error() {
        Jail::expect_with(|jail| {
            jail.set_env("DRAWDOWN_WORKFLOW__ASSIGNMENT_POLICY", "round_robin");
            let result = DrawdownConfig::load();
            assert!(matches!(result, Err(ConfigError::Figment(_))));
            Ok(())
        });
    }
}
