//! Authenticated request execution with transparent token-refresh retry.
//!
//! [`DistributionHttpClient`] wraps the transport [`HttpClient`] and a
//! shared [`DistributionAuth`] context. Every verb funnels through one
//! generic [`execute_with_auth_retry`](DistributionHttpClient::execute_with_auth_retry)
//! loop: attempt the call, ask the auth context whether the response means
//! the token expired, and retry exactly once when a fresh token was
//! obtained.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::auth::{ClientDetails, DistributionAuth};
use crate::clients::errors::{AuthTokenExpiredError, HttpError};
use crate::clients::http_client::{HttpClient, HttpOutcome, Method};

/// Maximum HTTP attempts per logical request: the original call plus one
/// retry after a token refresh.
pub const MAX_AUTH_ATTEMPTS: u32 = 2;

/// HTTP client bound to an authentication context.
///
/// # Thread Safety
///
/// `DistributionHttpClient` is `Send + Sync`; independent operations may run
/// concurrently on separate tasks. The auth context is shared and must
/// refresh idempotently under concurrent expiry detection (see
/// [`DistributionAuth`]).
pub struct DistributionHttpClient {
    http: HttpClient,
    auth: Arc<dyn DistributionAuth>,
}

impl std::fmt::Debug for DistributionHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributionHttpClient")
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl DistributionHttpClient {
    /// Creates an authenticated client from a transport and an auth context.
    #[must_use]
    pub fn new(http: HttpClient, auth: Arc<dyn DistributionAuth>) -> Self {
        Self { http, auth }
    }

    /// Returns the authentication context this client is bound to.
    #[must_use]
    pub fn auth(&self) -> &Arc<dyn DistributionAuth> {
        &self.auth
    }

    /// Executes one logical request with transparent token-refresh retry.
    ///
    /// `attempt` performs a single transport call with the given header set.
    /// The loop runs at most [`MAX_AUTH_ATTEMPTS`] times:
    ///
    /// - a transport error returns immediately (transport retry is the
    ///   [`HttpClient`]'s own concern)
    /// - when the auth context reports no expiry, the response is returned
    ///   as-is, whatever its status code
    /// - when a fresh token was obtained, `details` now carries it and the
    ///   call is attempted once more
    ///
    /// # Errors
    ///
    /// Returns [`AuthTokenExpiredError`] carrying the last status line when
    /// the token is still reported expired after the final attempt, or any
    /// error from the attempt or the refresh itself.
    pub async fn execute_with_auth_retry<F, Fut>(
        &self,
        details: &mut ClientDetails,
        attempt: F,
    ) -> Result<HttpOutcome, HttpError>
    where
        F: Fn(HashMap<String, String>) -> Fut,
        Fut: Future<Output = Result<HttpOutcome, HttpError>>,
    {
        let mut last_status = String::new();
        for _ in 0..MAX_AUTH_ATTEMPTS {
            let outcome = attempt(details.headers.clone()).await?;
            let refreshed = self
                .auth
                .handle_token_expiry(outcome.status, details)
                .await
                .map_err(HttpError::Auth)?;
            if !refreshed {
                return Ok(outcome);
            }
            last_status = outcome.status_line;
        }
        Err(AuthTokenExpiredError {
            status: last_status,
        }
        .into())
    }

    /// Sends a request with the given method, wrapped in auth retry.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure, refresh failure, or an
    /// exhausted token-refresh retry.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        details: &mut ClientDetails,
    ) -> Result<HttpOutcome, HttpError> {
        let http = &self.http;
        self.execute_with_auth_retry(details, |headers| {
            let body = body.clone();
            async move { http.send(method, url, body, &headers).await }
        })
        .await
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn get(
        &self,
        url: &str,
        details: &mut ClientDetails,
    ) -> Result<HttpOutcome, HttpError> {
        self.send(Method::Get, url, None, details).await
    }

    /// Sends a POST request with a body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn post(
        &self,
        url: &str,
        content: Vec<u8>,
        details: &mut ClientDetails,
    ) -> Result<HttpOutcome, HttpError> {
        self.send(Method::Post, url, Some(content), details).await
    }

    /// Sends a PUT request with a body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn put(
        &self,
        url: &str,
        content: Vec<u8>,
        details: &mut ClientDetails,
    ) -> Result<HttpOutcome, HttpError> {
        self.send(Method::Put, url, Some(content), details).await
    }

    /// Sends a PATCH request with a body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn patch(
        &self,
        url: &str,
        content: Vec<u8>,
        details: &mut ClientDetails,
    ) -> Result<HttpOutcome, HttpError> {
        self.send(Method::Patch, url, Some(content), details).await
    }

    /// Sends a DELETE request with an optional body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn delete(
        &self,
        url: &str,
        content: Option<Vec<u8>>,
        details: &mut ClientDetails,
    ) -> Result<HttpOutcome, HttpError> {
        self.send(Method::Delete, url, content, details).await
    }

    /// Sends a HEAD request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn head(
        &self,
        url: &str,
        details: &mut ClientDetails,
    ) -> Result<HttpOutcome, HttpError> {
        self.send(Method::Head, url, None, details).await
    }
}
