//! Call outcome accounting for a single circuit breaker.
//!
//! Snapshot-only: counters accumulate inside the breaker's critical section
//! and [`CircuitBreaker::metrics`] clones them out with the derived rates
//! filled in. Exporting them anywhere is the embedder's concern.
//!
//! [`CircuitBreaker::metrics`]: crate::CircuitBreaker::metrics

use crate::circuit_breaker::CircuitState;
use serde::Serialize;
use std::time::Duration;

/// Point-in-time metrics snapshot for a circuit breaker
#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerMetrics {
    /// Operations actually invoked (successes plus failures); calls
    /// rejected by the breaker count under `rejected_count` instead
    pub total_calls: u64,

    /// Operations that completed successfully
    pub success_count: u64,

    /// Operations that completed with a failure
    pub failure_count: u64,

    /// Calls rejected without invoking the operation
    pub rejected_count: u64,

    /// Current consecutive-failure streak
    pub consecutive_failures: usize,

    /// Current consecutive-success streak (meaningful while half-open)
    pub consecutive_successes: usize,

    /// State at snapshot time
    pub current_state: CircuitState,

    /// Accumulated wall-clock time spent in operations
    pub total_duration: Duration,

    /// Derived: failure_count / total_calls
    pub failure_rate: f64,

    /// Derived: success_count / total_calls
    pub success_rate: f64,

    /// Derived: total_duration / success_count
    pub average_duration: Duration,
}

impl CircuitBreakerMetrics {
    /// Create a zeroed metrics record for a freshly constructed breaker
    pub fn new() -> Self {
        Self {
            total_calls: 0,
            success_count: 0,
            failure_count: 0,
            rejected_count: 0,
            consecutive_failures: 0,
            consecutive_successes: 0,
            current_state: CircuitState::Closed,
            total_duration: Duration::ZERO,
            failure_rate: 0.0,
            success_rate: 0.0,
            average_duration: Duration::ZERO,
        }
    }
}

impl Default for CircuitBreakerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metrics_start_zeroed_and_closed() {
        let metrics = CircuitBreakerMetrics::new();
        assert_eq!(metrics.total_calls, 0);
        assert_eq!(metrics.failure_count, 0);
        assert_eq!(metrics.rejected_count, 0);
        assert_eq!(metrics.current_state, CircuitState::Closed);
        assert_eq!(metrics.total_duration, Duration::ZERO);
    }

    #[test]
    fn metrics_serialize_for_health_endpoints() {
        let metrics = CircuitBreakerMetrics::new();
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["total_calls"], 0);
        assert_eq!(json["current_state"], "Closed");
    }
}
