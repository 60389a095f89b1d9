//! Service-level error types.
//!
//! [`DistributionError`] is the single error type returned by every service
//! operation. It wraps the HTTP-layer taxonomy and adds the shapes specific
//! to this API: parameter validation, poll timeout, and server-reported
//! operation failure. A timeout is always distinguishable from a failure
//! the server reported, so callers can decide whether to re-query status
//! manually.

use thiserror::Error;

use crate::clients::errors::{HttpError, UnexpectedStatusError};

/// Unified error type for Distribution service operations.
#[derive(Debug, Error)]
pub enum DistributionError {
    /// HTTP-layer error (transport, unexpected status, auth retry bound).
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A caller-supplied parameter combination is invalid. Detected before
    /// any network call.
    #[error("{reason}")]
    InvalidParameter {
        /// Why the parameters are invalid.
        reason: String,
    },

    /// The deadline elapsed while the operation was still in progress.
    #[error("Timeout for sync {operation}")]
    PollTimeout {
        /// The operation that timed out (e.g. `distribution`).
        operation: String,
    },

    /// The server reported the operation reached a terminal failure state.
    #[error("Distribution failed: {payload}")]
    OperationFailed {
        /// The serialized final status payload, for diagnostics.
        payload: String,
    },

    /// A request body could not be encoded or a response could not be
    /// parsed.
    #[error("couldn't parse Distribution server response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<UnexpectedStatusError> for DistributionError {
    fn from(err: UnexpectedStatusError) -> Self {
        Self::Http(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message_is_the_reason() {
        let error = DistributionError::InvalidParameter {
            reason: "missing distribution name parameter".to_string(),
        };
        assert_eq!(error.to_string(), "missing distribution name parameter");
    }

    #[test]
    fn test_poll_timeout_message_names_the_operation() {
        let error = DistributionError::PollTimeout {
            operation: "distribution".to_string(),
        };
        assert_eq!(error.to_string(), "Timeout for sync distribution");
    }

    #[test]
    fn test_operation_failed_carries_payload() {
        let error = DistributionError::OperationFailed {
            payload: r#"[{"status":"Failed"}]"#.to_string(),
        };
        let message = error.to_string();
        assert!(message.starts_with("Distribution failed:"));
        assert!(message.contains("Failed"));
    }

    #[test]
    fn test_timeout_and_failure_are_distinct_variants() {
        let timeout = DistributionError::PollTimeout {
            operation: "distribution".to_string(),
        };
        let failed = DistributionError::OperationFailed {
            payload: String::new(),
        };
        assert!(matches!(timeout, DistributionError::PollTimeout { .. }));
        assert!(matches!(failed, DistributionError::OperationFailed { .. }));
    }
}
