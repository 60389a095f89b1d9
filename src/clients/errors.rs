//! HTTP-specific error types.
//!
//! The SDK distinguishes three HTTP-layer failure shapes:
//!
//! - [`UnexpectedStatusError`]: the server answered with a status code
//!   outside the operation's accepted set
//! - [`AuthTokenExpiredError`]: the token kept being reported expired even
//!   after a refresh (the retry bound was exhausted)
//! - [`HttpError::Network`]: the transport itself failed
//!
//! All carry enough context (status line, indented body) to be surfaced to
//! the caller without a follow-up query.

use thiserror::Error;

use crate::auth::AuthError;

/// Error returned when a response status code is outside the accepted set
/// for the operation.
///
/// The message mirrors the server's own diagnostics: status line followed by
/// the indented JSON body.
#[derive(Debug, Error)]
#[error("Distribution response: {status}\n{body}")]
pub struct UnexpectedStatusError {
    /// The HTTP status code.
    pub code: u16,
    /// The HTTP status line (e.g. `404 Not Found`).
    pub status: String,
    /// The response body, indented when it is valid JSON.
    pub body: String,
}

/// Error returned when the authentication token is still reported expired
/// after the refresh retry.
///
/// The executor performs at most two attempts per logical request; if the
/// second attempt still triggers a refresh, this error carries the last
/// response's status line.
#[derive(Debug, Error)]
#[error("failed to obtain a new authentication token after one has expired; {status}")]
pub struct AuthTokenExpiredError {
    /// The status line of the last response.
    pub status: String,
}

/// Unified error type for HTTP operations.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Response status code outside the accepted set.
    #[error(transparent)]
    UnexpectedStatus(#[from] UnexpectedStatusError),

    /// Token still expired after the refresh retry bound.
    #[error(transparent)]
    AuthTokenExpired(#[from] AuthTokenExpiredError),

    /// Token refresh itself failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Network or connection error. Never retried by the auth layer.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_error_message_includes_status_and_body() {
        let error = UnexpectedStatusError {
            code: 404,
            status: "404 Not Found".to_string(),
            body: "{\n  \"message\": \"not found\"\n}".to_string(),
        };
        let message = error.to_string();
        assert!(message.starts_with("Distribution response: 404 Not Found"));
        assert!(message.contains("not found"));
    }

    #[test]
    fn test_auth_token_expired_error_message_carries_status_line() {
        let error = AuthTokenExpiredError {
            status: "401 Unauthorized".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("failed to obtain a new authentication token"));
        assert!(message.contains("401 Unauthorized"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let unexpected: &dyn std::error::Error = &UnexpectedStatusError {
            code: 400,
            status: "400 Bad Request".to_string(),
            body: String::new(),
        };
        let _ = unexpected;

        let expired: &dyn std::error::Error = &AuthTokenExpiredError {
            status: "401 Unauthorized".to_string(),
        };
        let _ = expired;
    }
}
