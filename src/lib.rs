//! Async client for the JFrog Distribution REST API.
//!
//! Distribution manages signed, immutable release bundles and pushes them to
//! edge nodes. This crate covers the bundle lifecycle end to end: create,
//! update, sign, upload the signing key pair, distribute, query distribution
//! status, and delete, both from the edges and from the distribution service
//! itself.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use distribution_api::auth::AccessTokenAuth;
//! use distribution_api::services::{DistributionClient, DistributionParams, ReleaseBundleParams};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = AccessTokenAuth::new("https://distribution.example.com", "my-token")?;
//! let client = DistributionClient::builder().auth(Arc::new(auth)).build()?;
//!
//! // Create and sign a bundle, then push it to the edges.
//! let mut bundle = ReleaseBundleParams::new("my-bundle", "1.0.0");
//! bundle.sign_immediately = Some(true);
//! client.create_release_bundle(&bundle).await?;
//!
//! let distribute = DistributionParams::new("my-bundle", "1.0.0");
//! let tracker_id = client
//!     .distribute_release_bundle_sync(&distribute, 10, false)
//!     .await?;
//! println!("distributed under tracker {tracker_id}");
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//!
//! - Authentication is a trait seam ([`auth::DistributionAuth`]): the HTTP
//!   layer asks it once per response whether the token expired, and retries
//!   the request a single time after a successful refresh. The bundled
//!   bearer and basic contexts never refresh; callers with refreshable
//!   credentials implement the trait themselves.
//! - Distribute and delete are background jobs on the server. Their `sync`
//!   variants share one poll loop ([`sync::poll_until_complete`]) and differ
//!   only in how a poll interprets the status resource.
//! - Configuration is validated at construction; operations validate their
//!   coordinates before touching the network.

pub mod auth;
pub mod clients;
pub mod error;
pub mod services;
pub mod sync;
pub mod utils;

pub use error::ConfigError;
pub use services::{DistributionClient, DistributionError};

// The client must be usable from multiple tasks at once.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DistributionClient>();
    assert_send_sync::<clients::DistributionHttpClient>();
};
