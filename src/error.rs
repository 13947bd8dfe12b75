//! Error taxonomy for gated calls.
//!
//! Breaker-synthesized rejections are distinct variants from a propagated
//! operation failure so callers can apply different fallback policies:
//! `CircuitOpen` usually means "do not retry now" while
//! `ProbeBudgetExceeded` means "the breaker re-opened, back off".

/// Errors that can occur during circuit breaker operation
#[derive(Debug, thiserror::Error)]
pub enum CircuitBreakerError<E> {
    /// Circuit is open, call rejected without invoking the operation
    #[error("circuit breaker is open for {component}")]
    CircuitOpen { component: String },

    /// A half-open probe failed and exhausted the failure or time budget;
    /// the circuit re-opened as a side effect of reporting this
    #[error("too many failed probe requests for {component}")]
    ProbeBudgetExceeded { component: String },

    /// Operation failed and was recorded
    #[error("operation failed: {0}")]
    OperationFailed(E),
}

impl<E> CircuitBreakerError<E> {
    /// True for outcomes synthesized by the breaker itself, false when the
    /// wrapped operation's own failure is being propagated
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::CircuitOpen { .. } | Self::ProbeBudgetExceeded { .. }
        )
    }

    /// The operation's own error, when this is a propagated failure
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            Self::OperationFailed(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_distinguishable_from_operation_failures() {
        let open: CircuitBreakerError<String> = CircuitBreakerError::CircuitOpen {
            component: "db".to_string(),
        };
        let budget: CircuitBreakerError<String> = CircuitBreakerError::ProbeBudgetExceeded {
            component: "db".to_string(),
        };
        let failed = CircuitBreakerError::OperationFailed("timeout".to_string());

        assert!(open.is_rejection());
        assert!(budget.is_rejection());
        assert!(!failed.is_rejection());

        assert_eq!(failed.into_operation_error(), Some("timeout".to_string()));
        assert_eq!(open.into_operation_error(), None);
    }

    #[test]
    fn display_includes_component() {
        let err: CircuitBreakerError<String> = CircuitBreakerError::CircuitOpen {
            component: "payments_api".to_string(),
        };
        assert_eq!(err.to_string(), "circuit breaker is open for payments_api");
    }
}
