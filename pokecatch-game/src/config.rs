//! Session tuning configuration.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    CATCH_THRESHOLD, FLEE_AFTER_FAILURES, FLEE_DELAY_MS, MAX_CREATURE_ID, MIN_CREATURE_ID,
};
use crate::error::ConfigError;

/// Tunables for encounters and throws. Every field falls back to the stock
/// value when omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lowest creature id an encounter may draw (inclusive).
    pub min_creature_id: u16,
    /// Highest creature id an encounter may draw (inclusive).
    pub max_creature_id: u16,
    /// A throw succeeds when the roll is strictly above this value.
    pub catch_threshold: f64,
    /// Failed throws on one encounter before the creature flees.
    pub flee_after_failures: u8,
    /// Delay between "ran away" and the encounter clearing.
    pub flee_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_creature_id: MIN_CREATURE_ID,
            max_creature_id: MAX_CREATURE_ID,
            catch_threshold: CATCH_THRESHOLD,
            flee_after_failures: FLEE_AFTER_FAILURES,
            flee_delay_ms: FLEE_DELAY_MS,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values fail
    /// [`SessionConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the ranges the session relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_creature_id == 0 {
            return Err(ConfigError::Invalid(
                "min_creature_id must be at least 1".to_string(),
            ));
        }
        if self.min_creature_id > self.max_creature_id {
            return Err(ConfigError::Invalid(format!(
                "min_creature_id {} exceeds max_creature_id {}",
                self.min_creature_id, self.max_creature_id
            )));
        }
        if !(0.0..1.0).contains(&self.catch_threshold) {
            return Err(ConfigError::Invalid(format!(
                "catch_threshold {} must lie in [0, 1)",
                self.catch_threshold
            )));
        }
        if self.flee_after_failures == 0 {
            return Err(ConfigError::Invalid(
                "flee_after_failures must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub const fn flee_delay(&self) -> Duration {
        Duration::from_millis(self.flee_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_rules() {
        let config = SessionConfig::default();
        assert_eq!(config.min_creature_id, 1);
        assert_eq!(config.max_creature_id, 151);
        assert_eq!(config.flee_after_failures, 2);
        assert_eq!(config.flee_delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SessionConfig::from_json(r#"{"max_creature_id": 251}"#).unwrap();
        assert_eq!(config.max_creature_id, 251);
        assert_eq!(config.min_creature_id, 1);
        assert_eq!(config.flee_delay_ms, 1_000);
    }

    #[test]
    fn rejects_inverted_id_range() {
        let err = SessionConfig::from_json(r#"{"min_creature_id": 10, "max_creature_id": 5}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let err = SessionConfig::from_json(r#"{"catch_threshold": 1.0}"#).unwrap_err();
        assert!(err.to_string().contains("catch_threshold"));
    }

    #[test]
    fn rejects_zero_flee_threshold() {
        assert!(SessionConfig::from_json(r#"{"flee_after_failures": 0}"#).is_err());
        assert!(SessionConfig::from_json("not json").is_err());
    }
}
