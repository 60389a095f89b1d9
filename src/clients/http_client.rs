//! HTTP transport for the Distribution API.
//!
//! [`HttpClient`] is a thin wrapper over `reqwest` producing one
//! [`HttpOutcome`] per attempt. It retries timed-out or refused connections
//! up to a configured number of tries; status-code interpretation (including
//! token expiry) belongs to the layers above.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::clients::errors::{HttpError, UnexpectedStatusError};
use crate::utils::indent_json;

/// Fixed wait between transport-level retries, in seconds.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Default number of transport attempts per call.
pub const DEFAULT_HTTP_TRIES: u32 = 3;

/// HTTP methods used by the Distribution API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// HTTP GET for status and version queries.
    Get,
    /// HTTP POST for submits (create, sign, distribute, delete).
    Post,
    /// HTTP PUT for updates and key uploads.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE for local deletion.
    Delete,
    /// HTTP HEAD for existence checks.
    Head,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
            Self::Head => write!(f, "HEAD"),
        }
    }
}

/// The result of one HTTP attempt.
///
/// Produced per attempt and never persisted beyond the call that consumed
/// it.
#[derive(Clone, Debug)]
pub struct HttpOutcome {
    /// The HTTP status code.
    pub status: u16,
    /// The HTTP status line (e.g. `202 Accepted`).
    pub status_line: String,
    /// Response headers, keys lowercased.
    pub headers: HashMap<String, Vec<String>>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpOutcome {
    /// Returns whether the status code is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the first value of a response header, looked up
    /// case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the body decoded as UTF-8 text (lossily).
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Verifies that the status code is one of the accepted codes.
    ///
    /// # Errors
    ///
    /// Returns [`UnexpectedStatusError`] carrying the status line and the
    /// indented response body otherwise.
    pub fn verify_status(&self, accepted: &[u16]) -> Result<(), HttpError> {
        if accepted.contains(&self.status) {
            return Ok(());
        }
        Err(UnexpectedStatusError {
            code: self.status,
            status: self.status_line.clone(),
            body: indent_json(&self.body),
        }
        .into())
    }
}

/// HTTP transport client.
///
/// Holds the connection pool and the transport retry policy. Auth-aware
/// request execution lives in
/// [`DistributionHttpClient`](crate::clients::DistributionHttpClient).
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and cheap to share across async tasks.
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    tries: u32,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a transport client.
    ///
    /// # Arguments
    ///
    /// * `tries` - number of transport attempts per call (minimum 1)
    /// * `timeout` - optional per-request timeout
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This
    /// should only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(tries: u32, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("Failed to create HTTP client");
        Self {
            client,
            tries: tries.max(1),
        }
    }

    /// Returns the configured number of transport attempts.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    /// Sends one request and returns the raw outcome.
    ///
    /// Timed-out or refused connections are retried up to the configured
    /// number of tries with a fixed wait in between. Any response, whatever
    /// its status code, is returned as an [`HttpOutcome`]; this layer never
    /// interprets status codes.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] when every attempt failed at the
    /// transport level.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HashMap<String, String>,
    ) -> Result<HttpOutcome, HttpError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let mut builder = self.client.request(method.as_reqwest(), url);
            for (key, value) in headers {
                builder = builder.header(key, value);
            }
            if let Some(body) = &body {
                builder = builder.body(body.clone());
            }

            match builder.send().await {
                Ok(response) => return Ok(Self::into_outcome(response).await?),
                Err(err) => {
                    let retryable = err.is_timeout() || err.is_connect();
                    if !retryable || attempt >= self.tries {
                        return Err(HttpError::Network(err));
                    }
                    tracing::debug!(
                        "Attempt {attempt} of {method} {url} failed ({err}), retrying"
                    );
                    tokio::time::sleep(Duration::from_secs(RETRY_WAIT_TIME)).await;
                }
            }
        }
    }

    async fn into_outcome(response: reqwest::Response) -> Result<HttpOutcome, reqwest::Error> {
        let status = response.status();
        let status_line = format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        );

        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in response.headers() {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            headers.entry(key).or_default().push(value);
        }

        let body = response.bytes().await?.to_vec();
        Ok(HttpOutcome {
            status: status.as_u16(),
            status_line,
            headers,
            body,
        })
    }
}
