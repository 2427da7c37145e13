//! Configuration for the credential rotator

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate-limit parameters shared by every credential in the pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotatorConfig {
    /// Provider-imposed requests per window for one credential
    pub hard_limit: u32,

    /// Fraction of `hard_limit` used as the early throttling threshold
    pub safe_ratio: f64,

    /// Sliding window length
    pub window: Duration,

    /// Maximum usage instants retained per credential. Must be at least
    /// the safe limit or window counts could never reach it.
    pub history_capacity: usize,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            // Free-tier generative API: 15 requests per minute
            hard_limit: 15,
            safe_ratio: 0.8,
            window: Duration::from_secs(60),
            history_capacity: 30,
        }
    }
}

impl RotatorConfig {
    /// Create a new builder for rotator configuration
    pub fn builder() -> RotatorConfigBuilder {
        RotatorConfigBuilder::default()
    }

    /// Per-credential admission threshold, never below one
    pub fn safe_limit(&self) -> usize {
        ((self.hard_limit as f64 * self.safe_ratio).floor() as usize).max(1)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.hard_limit == 0 {
            return Err("hard_limit must be greater than 0".to_string());
        }

        if !(self.safe_ratio > 0.0 && self.safe_ratio <= 1.0) {
            return Err("safe_ratio must be in (0.0, 1.0]".to_string());
        }

        if self.window.is_zero() {
            return Err("window must be greater than 0".to_string());
        }

        if self.history_capacity < self.safe_limit() {
            return Err(format!(
                "history_capacity ({}) must be at least the safe limit ({})",
                self.history_capacity,
                self.safe_limit()
            ));
        }

        Ok(())
    }
}

/// Builder for rotator configuration
#[derive(Debug, Default)]
pub struct RotatorConfigBuilder {
    hard_limit: Option<u32>,
    safe_ratio: Option<f64>,
    window: Option<Duration>,
    history_capacity: Option<usize>,
}

impl RotatorConfigBuilder {
    /// Set the provider's per-window request limit
    pub fn hard_limit(mut self, limit: u32) -> Self {
        self.hard_limit = Some(limit);
        self
    }

    /// Set the safe fraction of the hard limit
    pub fn safe_ratio(mut self, ratio: f64) -> Self {
        self.safe_ratio = Some(ratio);
        self
    }

    pub fn window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }

    /// Set retained history per credential
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    /// Build the configuration. History capacity defaults to twice the
    /// hard limit when not set explicitly.
    pub fn build(self) -> RotatorConfig {
        let defaults = RotatorConfig::default();
        let hard_limit = self.hard_limit.unwrap_or(defaults.hard_limit);

        RotatorConfig {
            hard_limit,
            safe_ratio: self.safe_ratio.unwrap_or(defaults.safe_ratio),
            window: self.window.unwrap_or(defaults.window),
            history_capacity: self
                .history_capacity
                .unwrap_or((hard_limit as usize).saturating_mul(2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RotatorConfig::default();
        assert_eq!(config.safe_limit(), 12);
        assert_eq!(config.window, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_safe_limit_floor_and_minimum() {
        let config = RotatorConfig::builder().hard_limit(10).safe_ratio(0.85).build();
        assert_eq!(config.safe_limit(), 8);

        let tiny = RotatorConfig::builder().hard_limit(1).safe_ratio(0.5).build();
        assert_eq!(tiny.safe_limit(), 1);
    }

    #[test]
    fn test_builder_capacity_follows_hard_limit() {
        let config = RotatorConfig::builder().hard_limit(60).build();
        assert_eq!(config.history_capacity, 120);
    }

    #[test]
    fn test_config_validation() {
        assert!(RotatorConfig::builder().hard_limit(0).build().validate().is_err());
        assert!(RotatorConfig::builder().safe_ratio(0.0).build().validate().is_err());
        assert!(RotatorConfig::builder().safe_ratio(1.5).build().validate().is_err());
        assert!(RotatorConfig::builder()
            .window(Duration::ZERO)
            .build()
            .validate()
            .is_err());
        assert!(RotatorConfig::builder()
            .hard_limit(20)
            .history_capacity(5)
            .build()
            .validate()
            .is_err());
    }
}
