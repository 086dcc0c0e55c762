//! Error handling for the reconstruction engine
//!
//! Library code returns the typed [`ChartError`]; the application layer
//! (CLI, config and input loading) uses anyhow for context chaining.

use thiserror::Error;

/// Core error types for chart generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    /// Bucket identifier outside the fixed table
    #[error("unknown bucket: {0}")]
    UnknownBucket(String),

    /// Interpolated series built from zero points
    #[error("precondition violated: interpolator requires at least one point")]
    EmptyInterpolator,

    /// Fees chart requested for a position that never harvested
    #[error("precondition violated: fees chart requires at least one harvest")]
    EmptyHarvests,

    #[error("invalid moving average window: {0}")]
    InvalidWindow(usize),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl ChartError {
    /// Programmer errors that production callers are expected to gate against
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, ChartError::EmptyInterpolator | ChartError::EmptyHarvests)
    }
}

/// Result type alias for application-level operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = ChartError::UnknownBucket("2h_1d".to_string());
        assert_eq!(err.to_string(), "unknown bucket: 2h_1d");
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> =
            Err(ChartError::EmptyHarvests).context("failed to build fees chart");
        match result {
            Err(e) => {
                assert!(e.to_string().contains("failed to build fees chart"));
                let debug_msg = format!("{:?}", e);
                assert!(debug_msg.contains("at least one harvest"));
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn test_precondition_classification() {
        assert!(ChartError::EmptyInterpolator.is_precondition_violation());
        assert!(ChartError::EmptyHarvests.is_precondition_violation());
        assert!(!ChartError::UnknownBucket("x".to_string()).is_precondition_violation());
        assert!(!ChartError::InvalidWindow(0).is_precondition_violation());
    }
}
