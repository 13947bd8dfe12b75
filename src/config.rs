//! Circuit breaker configuration.
//!
//! Two layers: [`CircuitBreakerSettings`] is the serde-facing shape with
//! integer millisecond fields and per-field defaults, meant to be embedded
//! in a host application's configuration tree; [`CircuitBreakerConfig`] is
//! the validated, `Duration`-typed form the breaker consumes. `build()`
//! converts the former into the latter and is the single place invalid
//! values are rejected.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Validated configuration consumed by [`CircuitBreaker`].
///
/// Construct directly when values are known-good (tests, hardcoded
/// defaults), or go through [`CircuitBreakerSettings::build`] for anything
/// that came from a config file.
///
/// [`CircuitBreaker`]: crate::CircuitBreaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures in the closed state before opening the circuit
    pub failure_threshold: usize,

    /// Consecutive half-open probe successes required to close the circuit
    pub success_threshold: usize,

    /// Time to wait in the open state before allowing a probe
    pub open_timeout: Duration,

    /// Wall-clock budget for the half-open probe window; a probe failure
    /// past this point re-opens the circuit regardless of failure count
    pub half_open_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            success_threshold: default_failure_threshold(),
            open_timeout: Duration::from_millis(default_open_timeout_ms()),
            half_open_timeout: Duration::from_millis(default_half_open_timeout_ms()),
        }
    }
}

/// Configuration error raised when building a config from settings
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("failure_threshold must be at least 1")]
    ZeroFailureThreshold,

    #[error("success_threshold must be at least 1")]
    ZeroSuccessThreshold,

    #[error("open_timeout_ms must be positive")]
    ZeroOpenTimeout,

    #[error("half_open_timeout_ms must be positive")]
    ZeroHalfOpenTimeout,
}

/// Serde-facing circuit breaker settings from YAML/JSON configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CircuitBreakerSettings {
    /// Number of consecutive failures before opening the circuit
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: usize,

    /// Consecutive half-open probe successes to close the circuit.
    /// Falls back to `failure_threshold` when absent.
    #[serde(default)]
    pub success_threshold: Option<usize>,

    /// Time to stay open before allowing a probe, in milliseconds
    #[serde(default = "default_open_timeout_ms")]
    pub open_timeout_ms: u64,

    /// Half-open probe window budget, in milliseconds
    #[serde(default = "default_half_open_timeout_ms")]
    pub half_open_timeout_ms: u64,
}

fn default_failure_threshold() -> usize {
    5
}

fn default_open_timeout_ms() -> u64 {
    30_000
}

fn default_half_open_timeout_ms() -> u64 {
    10_000
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            success_threshold: None,
            open_timeout_ms: default_open_timeout_ms(),
            half_open_timeout_ms: default_half_open_timeout_ms(),
        }
    }
}

impl CircuitBreakerSettings {
    /// Validate and convert to the `Duration`-typed config the breaker uses
    pub fn build(&self) -> Result<CircuitBreakerConfig, ConfigError> {
        if self.failure_threshold == 0 {
            return Err(ConfigError::ZeroFailureThreshold);
        }

        let success_threshold = self.success_threshold.unwrap_or(self.failure_threshold);
        if success_threshold == 0 {
            return Err(ConfigError::ZeroSuccessThreshold);
        }

        if self.open_timeout_ms == 0 {
            return Err(ConfigError::ZeroOpenTimeout);
        }

        if self.half_open_timeout_ms == 0 {
            return Err(ConfigError::ZeroHalfOpenTimeout);
        }

        Ok(CircuitBreakerConfig {
            failure_threshold: self.failure_threshold,
            success_threshold,
            open_timeout: Duration::from_millis(self.open_timeout_ms),
            half_open_timeout: Duration::from_millis(self.half_open_timeout_ms),
        })
    }
}
