//! Error types for SDK configuration.
//!
//! All constructors that take caller-supplied configuration return
//! `Result<T, ConfigError>` to enable fail-fast validation before any
//! network activity.
//!
//! # Example
//!
//! ```rust
//! use distribution_api::{auth::AccessTokenAuth, ConfigError};
//!
//! let result = AccessTokenAuth::new("", "my-token");
//! assert!(matches!(result, Err(ConfigError::EmptyUrl)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the SDK.
///
/// Each variant carries a clear, actionable message describing what the
/// caller must fix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The Distribution server URL cannot be empty.
    #[error("Distribution server URL cannot be empty. Please provide the base URL of the Distribution service.")]
    EmptyUrl,

    /// The Distribution server URL is invalid.
    #[error("Invalid Distribution server URL '{url}'. Expected an http:// or https:// URL.")]
    InvalidUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a valid access token.")]
    EmptyAccessToken,

    /// The username cannot be empty.
    #[error("Username cannot be empty. Please provide a valid username for basic authentication.")]
    EmptyUsername,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the client.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url_error_message() {
        let error = ConfigError::EmptyUrl;
        let message = error.to_string();
        assert!(message.contains("URL cannot be empty"));
    }

    #[test]
    fn test_invalid_url_error_message() {
        let error = ConfigError::InvalidUrl {
            url: "ftp://example.com".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp://example.com"));
        assert!(message.contains("http://"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "auth" };
        let message = error.to_string();
        assert!(message.contains("auth"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyUrl;
        let _: &dyn std::error::Error = &error;
    }
}
