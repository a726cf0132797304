//! Scheduler configuration for the expiration sweep.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Scheduler configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// How often the expiration sweep runs, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Days after which a pending subscription with no validated payment
    /// is abandoned. When unset, pending subscriptions only die at the
    /// end of their billing window.
    #[serde(default)]
    pub pending_ttl_days: Option<u32>,
}

impl SchedulerConfig {
    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        if self.pending_ttl_days == Some(0) {
            return Err(ValidationError::InvalidPendingTtl);
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
            pending_ttl_days: None,
        }
    }
}

fn default_sweep_interval() -> u64 {
    // Daily. Expiration is calendar-based so finer granularity buys
    // nothing beyond tighter staleness bounds.
    24 * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_daily_sweep_without_abandonment() {
        let config = SchedulerConfig::default();
        assert_eq!(config.sweep_interval(), Duration::from_secs(86_400));
        assert!(config.pending_ttl_days.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_interval_fails_validation() {
        let config = SchedulerConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_ttl_fails_validation() {
        let config = SchedulerConfig {
            pending_ttl_days: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
