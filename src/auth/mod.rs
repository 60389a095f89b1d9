//! Authentication contexts for the Distribution API.
//!
//! The central seam here is the [`DistributionAuth`] trait: it owns the
//! service endpoint and credentials, mints per-request header sets, and is
//! consulted after every response to decide whether the authentication token
//! has expired and could be refreshed. The HTTP layer never refreshes tokens
//! itself; it only invokes this trait.
//!
//! Two ready-made contexts are provided: [`AccessTokenAuth`] (bearer token)
//! and [`BasicAuth`] (username/password). Callers with refreshable
//! credentials implement [`DistributionAuth`] themselves and perform the
//! refresh inside [`DistributionAuth::handle_token_expiry`].

use std::collections::HashMap;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::error::ConfigError;

/// Per-request client details minted by an authentication context.
///
/// Holds the headers to send with one logical request. When a token refresh
/// happens mid-request, the refreshed credentials are written back into this
/// value so the retry attempt carries them.
#[derive(Clone, Debug, Default)]
pub struct ClientDetails {
    /// Headers to include in the request.
    pub headers: HashMap<String, String>,
}

impl ClientDetails {
    /// Sets the `Content-Type` header.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.headers
            .insert("Content-Type".to_string(), content_type.into());
    }
}

/// Errors that can occur while refreshing expired credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The refresh attempt itself failed.
    #[error("failed to refresh the authentication token: {reason}")]
    RefreshFailed {
        /// Why the refresh failed.
        reason: String,
    },

    /// Network error while talking to the authentication endpoint.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Credential and endpoint state for a Distribution service.
///
/// # Concurrency
///
/// Implementations must be safe for concurrent use: when multiple in-flight
/// requests detect expiry at once, `handle_token_expiry` may be called
/// concurrently and must refresh idempotently (typically by checking under a
/// lock whether another caller already installed a fresh token).
#[async_trait]
pub trait DistributionAuth: Send + Sync {
    /// Returns the base endpoint of the service, always with a trailing
    /// slash.
    fn url(&self) -> &str;

    /// Mints the header set for one logical request.
    fn create_client_details(&self) -> ClientDetails;

    /// Inspects a response status code for token expiry.
    ///
    /// Returns `Ok(true)` when the token had expired and a fresh one was
    /// obtained and written into `details`; the caller then retries the
    /// request once. Returns `Ok(false)` when the status does not indicate
    /// expiry (or this context has nothing to refresh).
    ///
    /// The default implementation never refreshes, which is correct for
    /// static credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the refresh attempt itself failed.
    async fn handle_token_expiry(
        &self,
        _status: u16,
        _details: &mut ClientDetails,
    ) -> Result<bool, AuthError> {
        Ok(false)
    }
}

/// Validates a base URL and normalizes it to end with a trailing slash.
fn normalize_url(url: &str) -> Result<String, ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::EmptyUrl);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::InvalidUrl {
            url: url.to_string(),
        });
    }
    if url.ends_with('/') {
        Ok(url.to_string())
    } else {
        Ok(format!("{url}/"))
    }
}

/// Bearer-token authentication context.
///
/// # Example
///
/// ```rust
/// use distribution_api::auth::{AccessTokenAuth, DistributionAuth};
///
/// let auth = AccessTokenAuth::new("https://distribution.example.com", "my-token").unwrap();
/// assert_eq!(auth.url(), "https://distribution.example.com/");
/// ```
#[derive(Clone, Debug)]
pub struct AccessTokenAuth {
    url: String,
    access_token: String,
}

impl AccessTokenAuth {
    /// Creates a bearer-token context for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the URL is empty or not http(s), or the
    /// token is empty.
    pub fn new(url: impl AsRef<str>, access_token: impl Into<String>) -> Result<Self, ConfigError> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self {
            url: normalize_url(url.as_ref())?,
            access_token,
        })
    }
}

#[async_trait]
impl DistributionAuth for AccessTokenAuth {
    fn url(&self) -> &str {
        &self.url
    }

    fn create_client_details(&self) -> ClientDetails {
        let mut details = ClientDetails::default();
        details.headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.access_token),
        );
        details
    }
}

/// Username/password authentication context (HTTP Basic).
#[derive(Clone, Debug)]
pub struct BasicAuth {
    url: String,
    user: String,
    password: String,
}

impl BasicAuth {
    /// Creates a basic-auth context for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the URL is empty or not http(s), or the
    /// username is empty.
    pub fn new(
        url: impl AsRef<str>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let user = user.into();
        if user.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        Ok(Self {
            url: normalize_url(url.as_ref())?,
            user,
            password: password.into(),
        })
    }
}

#[async_trait]
impl DistributionAuth for BasicAuth {
    fn url(&self) -> &str {
        &self.url
    }

    fn create_client_details(&self) -> ClientDetails {
        let credentials = STANDARD.encode(format!("{}:{}", self.user, self.password));
        let mut details = ClientDetails::default();
        details
            .headers
            .insert("Authorization".to_string(), format!("Basic {credentials}"));
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_auth_appends_trailing_slash() {
        let auth = AccessTokenAuth::new("https://dist.example.com", "token").unwrap();
        assert_eq!(auth.url(), "https://dist.example.com/");
    }

    #[test]
    fn test_access_token_auth_keeps_existing_trailing_slash() {
        let auth = AccessTokenAuth::new("https://dist.example.com/", "token").unwrap();
        assert_eq!(auth.url(), "https://dist.example.com/");
    }

    #[test]
    fn test_access_token_auth_rejects_empty_url() {
        assert!(matches!(
            AccessTokenAuth::new("", "token"),
            Err(ConfigError::EmptyUrl)
        ));
    }

    #[test]
    fn test_access_token_auth_rejects_non_http_url() {
        assert!(matches!(
            AccessTokenAuth::new("ftp://dist.example.com", "token"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_access_token_auth_rejects_empty_token() {
        assert!(matches!(
            AccessTokenAuth::new("https://dist.example.com", ""),
            Err(ConfigError::EmptyAccessToken)
        ));
    }

    #[test]
    fn test_access_token_auth_sets_bearer_header() {
        let auth = AccessTokenAuth::new("https://dist.example.com", "my-token").unwrap();
        let details = auth.create_client_details();
        assert_eq!(
            details.headers.get("Authorization"),
            Some(&"Bearer my-token".to_string())
        );
    }

    #[test]
    fn test_basic_auth_sets_encoded_header() {
        let auth = BasicAuth::new("https://dist.example.com", "admin", "password").unwrap();
        let details = auth.create_client_details();
        // base64("admin:password")
        assert_eq!(
            details.headers.get("Authorization"),
            Some(&"Basic YWRtaW46cGFzc3dvcmQ=".to_string())
        );
    }

    #[test]
    fn test_basic_auth_rejects_empty_user() {
        assert!(matches!(
            BasicAuth::new("https://dist.example.com", "", "password"),
            Err(ConfigError::EmptyUsername)
        ));
    }

    #[tokio::test]
    async fn test_default_token_expiry_handling_never_refreshes() {
        let auth = AccessTokenAuth::new("https://dist.example.com", "token").unwrap();
        let mut details = auth.create_client_details();
        let refreshed = auth.handle_token_expiry(401, &mut details).await.unwrap();
        assert!(!refreshed);
    }

    #[test]
    fn test_client_details_set_content_type() {
        let mut details = ClientDetails::default();
        details.set_content_type("application/json");
        assert_eq!(
            details.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }
}
