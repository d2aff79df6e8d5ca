//! Polling settings for asynchronous jobs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the polling controller keeps asking about a pending job.
///
/// Polling is fixed-interval: every non-terminal status check is followed by
/// the same delay, with no backoff growth.
///
/// # Examples
///
/// ```
/// use atelier_core::PollingConfig;
/// use std::time::Duration;
///
/// let fast = PollingConfig::builder()
///     .max_attempts(5)
///     .interval_ms(250)
///     .build();
/// assert_eq!(fast.interval(), Duration::from_millis(250));
///
/// let defaults = PollingConfig::default();
/// assert_eq!(*defaults.max_attempts(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Status checks before giving up (default 30).
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,

    /// Delay between status checks in milliseconds (default 2000).
    #[serde(default = "default_interval_ms")]
    interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    30
}

fn default_interval_ms() -> u64 {
    2000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl PollingConfig {
    /// Creates a new polling config builder.
    pub fn builder() -> PollingConfigBuilder {
        PollingConfigBuilder::default()
    }

    /// Delay between status checks.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_attempts` is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Builder for `PollingConfig`.
#[derive(Debug, Default)]
pub struct PollingConfigBuilder {
    max_attempts: Option<u32>,
    interval_ms: Option<u64>,
}

impl PollingConfigBuilder {
    /// Sets the maximum number of status checks.
    pub fn max_attempts(mut self, value: u32) -> Self {
        self.max_attempts = Some(value);
        self
    }

    /// Sets the delay between status checks.
    pub fn interval_ms(mut self, value: u64) -> Self {
        self.interval_ms = Some(value);
        self
    }

    /// Builds the `PollingConfig`.
    pub fn build(self) -> PollingConfig {
        PollingConfig {
            max_attempts: self.max_attempts.unwrap_or_else(default_max_attempts),
            interval_ms: self.interval_ms.unwrap_or_else(default_interval_ms),
        }
    }
}
