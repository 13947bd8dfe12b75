//! # Circuit Breaker Implementation
//!
//! Provides fault isolation to prevent cascade failures when a downstream
//! dependency is degraded. This implementation follows the classic circuit
//! breaker pattern with three states: Closed (normal operation), Open
//! (failing fast), and Half-Open (testing recovery).
//!
//! ## State Transitions
//!
//! ```text
//! Closed → Open: consecutive failures reach failure_threshold
//! Open → Half-Open: open_timeout elapsed, evaluated on the next call
//! Half-Open → Closed: consecutive probe successes reach success_threshold
//! Half-Open → Open: consecutive probe failures reach failure_threshold,
//!                   or a probe fails after half_open_timeout has elapsed
//! ```
//!
//! ## Design Decisions
//!
//! - No background timer: the `Open → Half-Open` transition is evaluated
//!   lazily when the next call arrives. A breaker that receives no traffic
//!   while Open stays Open until traffic resumes.
//! - One critical section per call: state inspection, operation invocation,
//!   and the outcome update happen under a single lock, so no two callers
//!   can race a transition or double-trip on one threshold crossing. The
//!   wrapped operation runs while the lock is held; bounding its latency is
//!   the caller's contract, not the breaker's.

use crate::config::CircuitBreakerConfig;
use crate::error::CircuitBreakerError;
use crate::metrics::CircuitBreakerMetrics;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Circuit breaker states representing the current operational mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitState {
    /// Normal operation - all calls are allowed through
    Closed = 0,
    /// Failure mode - all calls fail fast without executing
    Open = 1,
    /// Testing recovery - each call is a single probe against the dependency
    HalfOpen = 2,
}

impl From<u8> for CircuitState {
    fn from(value: u8) -> Self {
        match value {
            0 => CircuitState::Closed,
            1 => CircuitState::Open,
            2 => CircuitState::HalfOpen,
            _ => CircuitState::Open, // Default to safest state
        }
    }
}

/// Mutable breaker interior, guarded by a single lock.
#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    consecutive_failures: usize,
    consecutive_successes: usize,
    last_transition: Instant,
    metrics: CircuitBreakerMetrics,
}

/// Core circuit breaker, one instance per protected dependency.
///
/// The breaker owns its state and counters; the guarded operation is passed
/// per call and never stored.
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Component name for logging and error reporting
    name: String,

    /// Configuration parameters, fixed at construction
    config: CircuitBreakerConfig,

    /// Lock-free mirror of the current state; the mutex-guarded value is
    /// authoritative and the mirror is updated inside the critical section
    state: AtomicU8,

    /// State, counters, and metrics behind one lock
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given name and configuration
    pub fn new(name: String, config: CircuitBreakerConfig) -> Self {
        info!(
            component = %name,
            failure_threshold = config.failure_threshold,
            success_threshold = config.success_threshold,
            open_timeout_ms = config.open_timeout.as_millis() as u64,
            half_open_timeout_ms = config.half_open_timeout.as_millis() as u64,
            "🛡️ Circuit breaker initialized"
        );

        Self {
            name,
            config,
            state: AtomicU8::new(CircuitState::Closed as u8),
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                consecutive_successes: 0,
                last_transition: Instant::now(),
                metrics: CircuitBreakerMetrics::new(),
            }),
        }
    }

    /// Get current circuit state
    pub fn state(&self) -> CircuitState {
        CircuitState::from(self.state.load(Ordering::Acquire))
    }

    /// Get component name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute an operation with circuit breaker protection.
    ///
    /// While Closed the operation runs and its outcome drives the failure
    /// counter. While Open the call is rejected with
    /// [`CircuitBreakerError::CircuitOpen`] until `open_timeout` has elapsed;
    /// the first call after the cooldown becomes the first Half-Open probe.
    /// While Half-Open each call is a single probe: enough consecutive
    /// successes close the circuit, and a probe failure that exhausts the
    /// failure or time budget re-opens it with
    /// [`CircuitBreakerError::ProbeBudgetExceeded`].
    ///
    /// The operation's successful value is returned untouched; its failure
    /// is propagated as [`CircuitBreakerError::OperationFailed`] after the
    /// breaker's bookkeeping.
    pub async fn call<F, T, E, Fut>(&self, operation: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut inner = self.inner.lock().await;

        if inner.state == CircuitState::Open {
            if inner.last_transition.elapsed() < self.config.open_timeout {
                inner.metrics.rejected_count += 1;
                debug!(component = %self.name, "⛔ Call rejected, circuit open");
                return Err(CircuitBreakerError::CircuitOpen {
                    component: self.name.clone(),
                });
            }
            // Cooldown elapsed, this same call becomes the first probe.
            self.transition(&mut inner, CircuitState::HalfOpen);
        }

        let start = Instant::now();
        let result = operation().await;
        let duration = start.elapsed();

        match result {
            Ok(value) => {
                self.record_success(&mut inner, duration);
                Ok(value)
            }
            Err(err) => Err(self.record_failure(&mut inner, duration, err)),
        }
    }

    /// Record a successful operation and apply state transitions
    fn record_success(&self, inner: &mut BreakerInner, duration: Duration) {
        inner.metrics.total_calls += 1;
        inner.metrics.success_count += 1;
        inner.metrics.total_duration += duration;

        debug!(
            component = %self.name,
            duration_ms = duration.as_millis() as u64,
            "🟢 Operation succeeded"
        );

        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures = 0;
            }
            CircuitState::HalfOpen => {
                inner.consecutive_successes += 1;
                if inner.consecutive_successes >= self.config.success_threshold {
                    self.transition(inner, CircuitState::Closed);
                }
            }
            CircuitState::Open => {
                // Not reachable through call(), which settles Open before invoking
                warn!(component = %self.name, "Success recorded while circuit is open");
            }
        }
    }

    /// Record a failed operation, apply state transitions, and classify the
    /// failure the caller sees
    fn record_failure<E>(
        &self,
        inner: &mut BreakerInner,
        duration: Duration,
        err: E,
    ) -> CircuitBreakerError<E> {
        inner.metrics.total_calls += 1;
        inner.metrics.failure_count += 1;
        inner.metrics.total_duration += duration;

        error!(
            component = %self.name,
            duration_ms = duration.as_millis() as u64,
            "🔴 Operation failed"
        );

        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    self.transition(inner, CircuitState::Open);
                }
                CircuitBreakerError::OperationFailed(err)
            }
            CircuitState::HalfOpen => {
                inner.consecutive_failures += 1;
                // The probe budget is spent by consecutive failures or by the
                // probe window's wall-clock allowance, whichever comes first.
                let budget_spent = inner.consecutive_failures >= self.config.failure_threshold
                    || inner.last_transition.elapsed() > self.config.half_open_timeout;
                if budget_spent {
                    self.transition(inner, CircuitState::Open);
                    CircuitBreakerError::ProbeBudgetExceeded {
                        component: self.name.clone(),
                    }
                } else {
                    CircuitBreakerError::OperationFailed(err)
                }
            }
            CircuitState::Open => {
                // Not reachable through call(), which settles Open before invoking
                warn!(component = %self.name, "Failure recorded while circuit is open");
                CircuitBreakerError::OperationFailed(err)
            }
        }
    }

    /// Apply a state transition: reset both counters, stamp the transition
    /// time, refresh the lock-free mirror, and log the change
    fn transition(&self, inner: &mut BreakerInner, next: CircuitState) {
        let from = inner.state;
        inner.state = next;
        inner.consecutive_failures = 0;
        inner.consecutive_successes = 0;
        inner.last_transition = Instant::now();
        self.state.store(next as u8, Ordering::Release);

        match next {
            CircuitState::Open => {
                error!(
                    component = %self.name,
                    from = ?from,
                    open_timeout_ms = self.config.open_timeout.as_millis() as u64,
                    "🔴 Circuit breaker opened (failing fast)"
                );
            }
            CircuitState::HalfOpen => {
                info!(
                    component = %self.name,
                    success_threshold = self.config.success_threshold,
                    "🟡 Circuit breaker half-open (testing recovery)"
                );
            }
            CircuitState::Closed => {
                info!(
                    component = %self.name,
                    total_calls = inner.metrics.total_calls,
                    "🟢 Circuit breaker closed (recovered)"
                );
            }
        }
    }

    /// Force circuit to open state (for emergency situations)
    pub async fn force_open(&self) {
        warn!(component = %self.name, "🚨 Circuit breaker forced open");
        let mut inner = self.inner.lock().await;
        self.transition(&mut inner, CircuitState::Open);
    }

    /// Force circuit to closed state (for emergency recovery)
    pub async fn force_closed(&self) {
        warn!(component = %self.name, "🚨 Circuit breaker forced closed");
        let mut inner = self.inner.lock().await;
        self.transition(&mut inner, CircuitState::Closed);
    }

    /// Get current metrics snapshot
    pub async fn metrics(&self) -> CircuitBreakerMetrics {
        let inner = self.inner.lock().await;
        let mut snapshot = inner.metrics.clone();

        snapshot.current_state = inner.state;
        snapshot.consecutive_failures = inner.consecutive_failures;
        snapshot.consecutive_successes = inner.consecutive_successes;

        // Calculate derived metrics
        if snapshot.total_calls > 0 {
            snapshot.failure_rate = snapshot.failure_count as f64 / snapshot.total_calls as f64;
            snapshot.success_rate = snapshot.success_count as f64 / snapshot.total_calls as f64;

            if snapshot.success_count > 0 {
                snapshot.average_duration = snapshot.total_duration / snapshot.success_count as u32;
            }
        }

        snapshot
    }

    /// Check if circuit is healthy (closed state with low failure rate)
    pub async fn is_healthy(&self) -> bool {
        if self.state() != CircuitState::Closed {
            return false;
        }

        let inner = self.inner.lock().await;
        if inner.metrics.total_calls < 10 {
            // Too few calls to determine health
            return true;
        }

        let failure_rate = inner.metrics.failure_count as f64 / inner.metrics.total_calls as f64;
        failure_rate < 0.1
    }
}
