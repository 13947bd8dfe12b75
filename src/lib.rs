#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Fusebox
//!
//! A circuit breaker for guarding calls to remote or unreliable
//! dependencies. Once a dependency fails persistently the breaker stops
//! issuing calls, then automatically probes for recovery after a cooldown,
//! protecting the caller from cascade failures and the dependency from
//! wasted load while it is struggling.
//!
//! ## Architecture
//!
//! - **State machine**: Closed (normal operation), Open (failing fast),
//!   Half-Open (probing for recovery), driven by consecutive-count
//!   thresholds
//! - **Lazy recovery**: no background timer; the `Open → Half-Open`
//!   transition happens on the next call after the cooldown elapses
//! - **Error taxonomy**: breaker rejections are distinct from propagated
//!   operation failures so callers can pick different fallback policies
//! - **Metrics**: per-breaker counters exposed as snapshots for health
//!   reporting
//!
//! The breaker imposes nothing on the wrapped operation: no retries, no
//! backoff, no timeout on the call itself. Bounding operation latency is
//! the operation's own contract.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fusebox::{CircuitBreaker, CircuitBreakerConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a circuit breaker for an external API
//! let config = CircuitBreakerConfig {
//!     failure_threshold: 5,
//!     success_threshold: 2,
//!     open_timeout: Duration::from_secs(30),
//!     half_open_timeout: Duration::from_secs(10),
//! };
//!
//! let breaker = CircuitBreaker::new("payments_api".to_string(), config);
//!
//! // Use the breaker to guard calls
//! let result = breaker.call(|| async {
//!     // Remote call here
//!     Ok::<&str, Box<dyn std::error::Error + Send + Sync>>("success")
//! }).await;
//! # Ok(())
//! # }
//! ```
//!
//! Configuration can also come from a host application's config tree via
//! the serde-facing [`CircuitBreakerSettings`], which validates on
//! [`build()`](CircuitBreakerSettings::build).

pub mod circuit_breaker;
pub mod config;
pub mod error;
pub mod metrics;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use config::{CircuitBreakerConfig, CircuitBreakerSettings, ConfigError};
pub use error::CircuitBreakerError;
pub use metrics::CircuitBreakerMetrics;
