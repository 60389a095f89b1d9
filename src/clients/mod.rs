//! HTTP client functionality for the Distribution API.
//!
//! Two layers:
//!
//! - [`HttpClient`]: the raw transport (connection pool, transport-level
//!   retry of timed-out or refused connections)
//! - [`DistributionHttpClient`]: the authenticated executor wrapping every
//!   verb in transparent token-refresh retry
//!
//! Services in [`crate::services`] only ever talk to the authenticated
//! layer.

pub mod auth_client;
pub mod errors;
pub mod http_client;

pub use auth_client::{DistributionHttpClient, MAX_AUTH_ATTEMPTS};
pub use errors::{AuthTokenExpiredError, HttpError, UnexpectedStatusError};
pub use http_client::{HttpClient, HttpOutcome, Method, DEFAULT_HTTP_TRIES, RETRY_WAIT_TIME};
