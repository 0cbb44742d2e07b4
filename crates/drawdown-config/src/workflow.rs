//! Workflow engine tuning.

use drawdown_core::enums::AssignmentPolicy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_allow_any_active_fallback() -> bool {
    true
}

const fn default_history_limit() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// How to pick among equally qualified assignees.
    #[serde(default)]
    pub assignment_policy: AssignmentPolicy,

    /// Whether the last fallback step (any active user) is attempted once
    /// neither a role match nor an admin is available.
    #[serde(default = "default_allow_any_active_fallback")]
    pub allow_any_active_fallback: bool,

    /// Maximum audit entries returned by history lookups.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            assignment_policy: AssignmentPolicy::default(),
            allow_any_active_fallback: default_allow_any_active_fallback(),
            history_limit: default_history_limit(),
        }
    }
}

impl WorkflowConfig {
    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `history_limit` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workflow.history_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = WorkflowConfig::default();
        assert_eq!(
            config.assignment_policy,
            AssignmentPolicy::LeastRecentlyAssigned
        );
        assert!(config.allow_any_active_fallback);
        assert_eq!(config.history_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_history_limit_is_invalid() {
        let config = WorkflowConfig {
            history_limit: 0,
            ..WorkflowConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
