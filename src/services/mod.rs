//! Release-bundle services and the [`DistributionClient`] facade.
//!
//! Each operation lives in its own service struct over a shared
//! [`DistributionHttpClient`]; [`DistributionClient`] wires them together
//! behind one builder-constructed entry point.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ClientDetails, DistributionAuth};
use crate::clients::{DistributionHttpClient, HttpClient, DEFAULT_HTTP_TRIES};
use crate::error::ConfigError;
use crate::utils::Sha256Summary;

pub mod create;
pub mod delete;
pub mod distribute;
pub mod errors;
pub mod sign;
pub mod set_signing_key;
pub mod status;
pub mod types;
pub mod update;
pub mod version;

pub use create::CreateReleaseBundleService;
pub use delete::{
    DeleteDistributionParams, DeleteLocalDistributionParams, DeleteLocalDistributionService,
    DeleteReleaseBundleService,
};
pub use distribute::{DistributeReleaseBundleService, DistributionParams};
pub use errors::DistributionError;
pub use sign::{SignBundleParams, SignBundleService};
pub use set_signing_key::{SetSigningKeyParams, SetSigningKeyService};
pub use status::{
    build_status_url, DistributionStatus, DistributionStatusParams, DistributionStatusResponse,
    DistributionStatusService,
};
pub use types::{
    AddedProps, BundleQuery, BundleSpec, DistributionRule, PathMapping, ReleaseBundleParams,
    ReleaseNotes, ReleaseNotesSyntax,
};
pub use update::UpdateReleaseBundleService;
pub use version::VersionService;

/// Header carrying the signing-key passphrase.
const GPG_PASSPHRASE_HEADER: &str = "X-GPG-PASSPHRASE";

/// Adds the `X-GPG-PASSPHRASE` header when a passphrase is set.
pub(crate) fn add_gpg_passphrase_header(passphrase: Option<&str>, details: &mut ClientDetails) {
    if let Some(passphrase) = passphrase {
        if !passphrase.is_empty() {
            details
                .headers
                .insert(GPG_PASSPHRASE_HEADER.to_string(), passphrase.to_string());
        }
    }
}

/// High-level client for the JFrog Distribution REST API.
///
/// Construct through [`DistributionClient::builder`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use distribution_api::auth::AccessTokenAuth;
/// use distribution_api::services::{DistributionClient, ReleaseBundleParams};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let auth = AccessTokenAuth::new("https://distribution.example.com", "my-token")?;
/// let client = DistributionClient::builder().auth(Arc::new(auth)).build()?;
///
/// let params = ReleaseBundleParams::new("my-bundle", "1.0.0");
/// client.create_release_bundle(&params).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DistributionClient {
    client: DistributionHttpClient,
    dry_run: bool,
}

impl DistributionClient {
    /// Returns a builder for a [`DistributionClient`].
    #[must_use]
    pub fn builder() -> DistributionClientBuilder {
        DistributionClientBuilder::default()
    }

    /// Returns the underlying authenticated HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &DistributionHttpClient {
        &self.client
    }

    /// Creates a release bundle.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the server rejects the bundle.
    pub async fn create_release_bundle(
        &self,
        params: &ReleaseBundleParams,
    ) -> Result<(), DistributionError> {
        let mut service = CreateReleaseBundleService::new(&self.client);
        service.dry_run = self.dry_run;
        service.create_release_bundle(params).await
    }

    /// Updates an unsigned release bundle.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the server rejects the update.
    pub async fn update_release_bundle(
        &self,
        params: &ReleaseBundleParams,
    ) -> Result<(), DistributionError> {
        let mut service = UpdateReleaseBundleService::new(&self.client);
        service.dry_run = self.dry_run;
        service.update_release_bundle(params).await
    }

    /// Signs a release bundle and returns its SHA-256 checksum summary.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the server rejects the signing.
    pub async fn sign_release_bundle(
        &self,
        params: &SignBundleParams,
    ) -> Result<Sha256Summary, DistributionError> {
        SignBundleService::new(&self.client)
            .sign_release_bundle(params)
            .await
    }

    /// Uploads the GPG key pair the distribution service signs with.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the server rejects the keys.
    pub async fn set_signing_key(
        &self,
        params: &SetSigningKeyParams,
    ) -> Result<(), DistributionError> {
        SetSigningKeyService::new(&self.client)
            .set_signing_key(params)
            .await
    }

    /// Distributes a release bundle and returns its tracker id without
    /// waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the submit fails.
    pub async fn distribute_release_bundle(
        &self,
        params: &DistributionParams,
        auto_create_repo: bool,
    ) -> Result<String, DistributionError> {
        let mut service = DistributeReleaseBundleService::new(&self.client);
        service.dry_run = self.dry_run;
        service.auto_create_repo = auto_create_repo;
        service.distribute(params).await
    }

    /// Distributes a release bundle and blocks until it completes, fails,
    /// or `max_wait_minutes` elapse (0 uses the default wait).
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] on submit failure, server-reported
    /// distribution failure, or wait timeout.
    pub async fn distribute_release_bundle_sync(
        &self,
        params: &DistributionParams,
        max_wait_minutes: u64,
        auto_create_repo: bool,
    ) -> Result<String, DistributionError> {
        let mut service = DistributeReleaseBundleService::new(&self.client);
        service.dry_run = self.dry_run;
        service.sync = true;
        service.max_wait_minutes = max_wait_minutes;
        service.auto_create_repo = auto_create_repo;
        service.distribute(params).await
    }

    /// Queries distribution status.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] on inconsistent coordinates or a
    /// failed query.
    pub async fn get_distribution_status(
        &self,
        params: &DistributionStatusParams,
    ) -> Result<Vec<DistributionStatusResponse>, DistributionError> {
        DistributionStatusService::new(&self.client)
            .get_status(params)
            .await
    }

    /// Deletes a release bundle from its edge nodes without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the submit fails.
    pub async fn delete_release_bundle(
        &self,
        params: &DeleteDistributionParams,
    ) -> Result<(), DistributionError> {
        let mut service = DeleteReleaseBundleService::new(&self.client);
        service.dry_run = self.dry_run;
        service.delete_distribution(params).await
    }

    /// Deletes a release bundle from its edge nodes and blocks until the
    /// deletion completes or `max_wait_minutes` elapse (0 uses the default
    /// wait).
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] on submit failure, an unexpected
    /// status while waiting, or wait timeout.
    pub async fn delete_release_bundle_sync(
        &self,
        params: &DeleteDistributionParams,
        max_wait_minutes: u64,
    ) -> Result<(), DistributionError> {
        let mut service = DeleteReleaseBundleService::new(&self.client);
        service.dry_run = self.dry_run;
        service.sync = true;
        service.max_wait_minutes = max_wait_minutes;
        service.delete_distribution(params).await
    }

    /// Deletes a release bundle from the distribution service only.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the server rejects the deletion.
    pub async fn delete_local_release_bundle(
        &self,
        params: &DeleteLocalDistributionParams,
    ) -> Result<(), DistributionError> {
        let mut service = DeleteLocalDistributionService::new(&self.client);
        service.dry_run = self.dry_run;
        service.delete_distribution(params).await
    }

    /// Returns the distribution server's version.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the query fails.
    pub async fn get_distribution_version(&self) -> Result<String, DistributionError> {
        VersionService::new(&self.client)
            .get_distribution_version()
            .await
    }
}

/// Builder for [`DistributionClient`].
#[derive(Default)]
pub struct DistributionClientBuilder {
    auth: Option<Arc<dyn DistributionAuth>>,
    timeout: Option<Duration>,
    tries: Option<u32>,
    dry_run: bool,
}

impl std::fmt::Debug for DistributionClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributionClientBuilder")
            .field("auth", &self.auth.as_ref().map(|_| "..."))
            .field("timeout", &self.timeout)
            .field("tries", &self.tries)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DistributionClientBuilder {
    /// Sets the authentication context (required).
    #[must_use]
    pub fn auth(mut self, auth: Arc<dyn DistributionAuth>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the transport retry count.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Makes every mutating operation a validation-only dry run.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] when no authentication
    /// context was set.
    pub fn build(self) -> Result<DistributionClient, ConfigError> {
        let auth = self
            .auth
            .ok_or(ConfigError::MissingRequiredField { field: "auth" })?;
        let http = HttpClient::new(self.tries.unwrap_or(DEFAULT_HTTP_TRIES), self.timeout);
        Ok(DistributionClient {
            client: DistributionHttpClient::new(http, auth),
            dry_run: self.dry_run,
        })
    }
}
